//! Invoice error types.

use thiserror::Error;
use uuid::Uuid;

use crate::invoice::types::InvoiceStatus;

/// Errors that can occur during invoice operations.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// Attempted a non-adjacent or backwards transition.
    #[error("Invalid invoice transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: InvoiceStatus,
        /// The attempted target status.
        to: InvoiceStatus,
    },

    /// The actor's role cannot perform this transition.
    #[error("Role {role} cannot move an invoice to {to}")]
    RoleNotAllowed {
        /// The actor's role.
        role: String,
        /// The attempted target status.
        to: InvoiceStatus,
    },

    /// Attempted to delete a non-draft invoice.
    #[error("Only draft invoices can be deleted; this one is {status}")]
    NotDeletable {
        /// The current status.
        status: InvoiceStatus,
    },

    /// Invoice not found.
    #[error("Invoice {0} not found")]
    InvoiceNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl InvoiceError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. } | Self::NotDeletable { .. } => 400,
            Self::RoleNotAllowed { .. } => 403,
            Self::InvoiceNotFound(_) => 404,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::RoleNotAllowed { .. } => "ROLE_NOT_ALLOWED",
            Self::NotDeletable { .. } => "NOT_DELETABLE",
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_error() {
        let err = InvoiceError::InvalidTransition {
            from: InvoiceStatus::Draft,
            to: InvoiceStatus::Issued,
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert!(err.to_string().contains("draft"));
        assert!(err.to_string().contains("issued"));
    }

    #[test]
    fn test_role_not_allowed_error() {
        let err = InvoiceError::RoleNotAllowed {
            role: "drawer".to_string(),
            to: InvoiceStatus::Approved,
        };
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "ROLE_NOT_ALLOWED");
    }

    #[test]
    fn test_not_deletable_error() {
        let err = InvoiceError::NotDeletable {
            status: InvoiceStatus::Issued,
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "NOT_DELETABLE");
    }

    #[test]
    fn test_not_found_error() {
        let err = InvoiceError::InvoiceNotFound(Uuid::nil());
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "INVOICE_NOT_FOUND");
    }
}
