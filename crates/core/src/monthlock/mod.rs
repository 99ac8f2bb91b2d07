//! Month locking for billing periods.
//!
//! Locking a month computes a production-count snapshot and freezes
//! it; count reads for a locked period serve the snapshot, never live
//! data.
//!
//! # Modules
//!
//! - `types` - Period keys and frozen count snapshots
//! - `service` - Lock/unlock validation

pub mod service;
pub mod types;

pub use service::MonthLockService;
pub use types::{MonthLockError, Period, ProductionCounts};
