//! Entry point tying the pipeline together: Load -> Plan -> Assemble -> Build.

use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Timelike, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::assembler::{assemble_orders, effective_max_items};
use crate::buyers::{AccountRow, CustomerRow, load_buyers};
use crate::catalog::{ProductRow, load_products};
use crate::errors::GenerationError;
use crate::model::{
    ConstraintSummary, GenerationParameters, OrderConstraints, OrderPayload,
};
use crate::payload::build_payload;
use crate::planner::{plan_orders, resolve_order_goal};

pub use crate::model::SeedPaths;

/// Options for one generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Requested order count; defaults to five per buyer, clamped to pool
    /// capacity.
    pub order_goal: Option<u64>,
    /// Seed for deterministic reruns. Unseeded runs draw from OS entropy.
    pub seed: Option<u64>,
    /// Item-count and per-buyer constraints.
    pub constraints: OrderConstraints,
    /// Pins the run timestamp; defaults to the current time.
    pub processed_at: Option<DateTime<Utc>>,
}

/// Synchronous single-pass order generator.
///
/// The run owns a single sequential RNG stream; planner and assembler draw
/// from it strictly in order, which is what makes seeded reruns
/// byte-identical.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn run(&self, seeds: &SeedPaths) -> Result<OrderPayload, GenerationError> {
        let start = Instant::now();
        let constraints = self.options.constraints;
        let processed_at = self
            .options
            .processed_at
            .unwrap_or_else(Utc::now);
        let processed_at = processed_at.with_nanosecond(0).unwrap_or(processed_at);

        let products = load_products(
            read_seed_rows::<ProductRow>(&seeds.products)?,
            &constraints,
        )?;
        let buyers = load_buyers(
            read_seed_rows::<CustomerRow>(&seeds.customers)?,
            read_seed_rows::<AccountRow>(&seeds.accounts)?,
        )?;

        let order_goal = resolve_order_goal(self.options.order_goal, buyers.len(), &constraints)?;

        info!(
            products = products.len(),
            buyers = buyers.len(),
            order_goal,
            seed = ?self.options.seed,
            "order generation started"
        );

        let mut rng = match self.options.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };

        let plan = plan_orders(&buyers, order_goal, &constraints, &mut rng);
        let rows = assemble_orders(&plan, &products, processed_at, &constraints, &mut rng)?;

        let payload = build_payload(
            rows,
            seeds.clone(),
            processed_at,
            ConstraintSummary {
                max_orders_per_customer: constraints.max_orders_per_customer,
                item_count_range: [
                    constraints.min_items,
                    effective_max_items(&products, &constraints),
                ],
            },
            GenerationParameters {
                order_goal,
                seed: self.options.seed,
            },
        );

        info!(
            record_count = payload.metadata.record_count,
            unique_orders = payload.metadata.unique_orders,
            duration_ms = start.elapsed().as_millis() as u64,
            "order generation completed"
        );

        Ok(payload)
    }
}

/// Read one seed file into typed rows, surfacing a missing file as
/// `SourceNotFound` with the resolved path.
fn read_seed_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, GenerationError> {
    if !path.exists() {
        return Err(GenerationError::SourceNotFound(path.to_path_buf()));
    }
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader.deserialize().collect::<Result<Vec<T>, _>>()?;
    Ok(rows)
}
