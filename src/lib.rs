//! Pipe Chains - A sequential stage pipeline with failure recovery
//!
//! This library provides a small system for composing unary transformation
//! stages into pipelines, pairing each stage with an optional fallback that
//! rescues it on failure, and linking pipelines into longer chains.
//!
//! How a stage's result is accepted, rejected, or substituted is decided by a
//! pluggable [`Invoker`]: the default [`Direct`] strategy rescues failed
//! stages with their fallbacks, while the [`Loyal`] decorator additionally
//! validates every processed payload and can either interrupt on a mismatch or
//! reset to the pre-stage payload.
//!
//! # Quick Start
//!
//! ```ignore
//! use pipe_chains::{Pipeline, StageError};
//!
//! let pipeline = Pipeline::new()
//!     .pipe(|n: &i32| -> Result<i32, StageError> { Ok(n * 2) })
//!     .pipe(|n: &i32| -> Result<i32, StageError> { Ok(-n) });
//!
//! assert_eq!(pipeline.process(3).unwrap(), -6);
//! ```
//!
//! # Threading
//!
//! Pipelines are single-threaded and synchronous: `process` is a straight
//! fold over the registered stages with no suspension points. Piping new
//! stages while a `process` call is running is unrepresentable, since
//! `process` borrows the pipeline. No cancellation or timeout exists; a stage
//! that never returns blocks the pipeline, which is the caller's
//! responsibility to avoid.

pub mod core;
pub mod stages;
pub mod strategy;

// Convenience re-exports
pub use crate::core::error::{LoyaltyViolation, StageError, UnknownMode};
pub use crate::core::pipeline::Pipeline;
pub use crate::core::stage_collection::{StageCollection, StageEntry};
pub use crate::stages::Stage;
pub use crate::strategy::Invoker;
pub use crate::strategy::direct::Direct;
pub use crate::strategy::loyal::{Loyal, LoyaltyMode, typed};
pub use crate::strategy::naive::Naive;
