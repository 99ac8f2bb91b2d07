//! Pull-based auto-assignment for queued orders.
//!
//! Workers ask for their next order (start-next); the engine ranks
//! the stage queue and enforces the per-worker WIP cap. The atomic
//! claim itself happens in the persistence layer; this module decides
//! what to claim and in which order.
//!
//! # Modules
//!
//! - `types` - Candidate and worker context types
//! - `error` - Assignment-specific error types
//! - `engine` - Ranking and capacity rules

pub mod engine;
pub mod error;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use engine::AssignmentEngine;
pub use error::AssignmentError;
pub use types::{CandidateOrder, WorkerContext};
