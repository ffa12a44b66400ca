//! Payload assembly: wraps line rows with provenance metadata.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::model::{
    ConstraintSummary, GenerationParameters, ORDER_COLUMNS, OrderLine, OrderPayload,
    PayloadMetadata, SeedPaths,
};

/// Aggregate generated rows into the final payload. Pure; no I/O.
pub fn build_payload(
    rows: Vec<OrderLine>,
    sources: SeedPaths,
    generated_at: DateTime<Utc>,
    constraints: ConstraintSummary,
    parameters: GenerationParameters,
) -> OrderPayload {
    let unique_orders = rows.iter().map(|row| row.order_id).collect::<HashSet<_>>().len();
    let metadata = PayloadMetadata {
        sources,
        generated_at,
        record_count: rows.len(),
        unique_orders,
        columns: ORDER_COLUMNS.iter().map(|name| name.to_string()).collect(),
        constraints,
        parameters,
    };

    OrderPayload {
        metadata,
        data: rows,
    }
}
