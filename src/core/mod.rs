/// Error taxonomy shared across the crate
pub mod error;

/// The pipeline orchestrator and chain linking
pub mod pipeline;

/// Ordered, identity-deduplicated storage for (stage, fallback) pairs
pub mod stage_collection;
