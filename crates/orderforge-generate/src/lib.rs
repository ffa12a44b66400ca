//! Deterministic mock order generation from dbt-style seed files.
//!
//! This crate reads product, customer and account seeds (CSV) and produces a
//! reproducible set of multi-line orders honoring per-order item-count bounds,
//! a per-buyer order cap and exact monetary rounding. All randomness flows
//! through one seeded generator owned by the run.

pub mod assembler;
pub mod buyers;
pub mod catalog;
pub mod engine;
pub mod errors;
pub mod model;
pub mod output;
pub mod payload;
pub mod planner;

pub use engine::{GenerateOptions, GenerationEngine, SeedPaths};
pub use errors::GenerationError;
pub use model::{
    Buyer, OrderConstraints, OrderLine, OrderPayload, PayloadMetadata, Product,
};
