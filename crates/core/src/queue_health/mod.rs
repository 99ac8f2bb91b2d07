//! Queue health and dashboard aggregates.
//!
//! Everything here is computed per request from live order data; the
//! persistence layer gathers the raw rows and these types shape the
//! response.
//!
//! # Modules
//!
//! - `types` - Aggregate response types
//! - `sla` - SLA breach predicate and integer progress math

pub mod sla;
pub mod types;

pub use types::{
    ProjectTotals, QueueHealth, StageHealth, StaffingEntry, WorkerDashboard, WorkerLoad,
};
