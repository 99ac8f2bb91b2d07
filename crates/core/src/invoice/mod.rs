//! Invoice lifecycle management.
//!
//! Invoices move through a strictly linear, role-gated pipeline from
//! draft to sent. No state is ever skipped and nothing moves
//! backwards.
//!
//! # Modules
//!
//! - `types` - Invoice status and action types
//! - `error` - Invoice-specific error types
//! - `service` - Transition logic and role gates

pub mod error;
pub mod service;
pub mod types;

pub use error::InvoiceError;
pub use service::InvoiceService;
pub use types::{InvoiceAction, InvoiceStatus};
