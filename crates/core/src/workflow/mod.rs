//! Order workflow management for Benchmark.
//!
//! This module implements the order lifecycle state machine for the
//! two fixed pipeline topologies, including rejection routing,
//! hold/resume and cancellation.
//!
//! # Modules
//!
//! - `types` - Workflow domain types (WorkflowState, Stage, WorkflowAction)
//! - `error` - Workflow-specific error types
//! - `service` - State transition logic
//!
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::WorkflowError;
pub use service::{MIN_REJECTION_REASON_LEN, WorkflowService};
pub use types::{
    Priority, RejectionCode, Stage, UserRole, WorkflowAction, WorkflowState, WorkflowType,
};
