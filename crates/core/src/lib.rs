//! Core business logic for Benchmark.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, transition rules, and selection logic live here.
//!
//! # Modules
//!
//! - `workflow` - Order lifecycle state machine (two fixed topologies)
//! - `assignment` - Pull-based auto-assignment (start-next) selection
//! - `invoice` - Invoice approval state machine
//! - `queue_health` - Queue/staffing aggregate types and SLA rules
//! - `monthlock` - Frozen production-count snapshots for billing periods

pub mod assignment;
pub mod invoice;
pub mod monthlock;
pub mod queue_health;
pub mod workflow;
