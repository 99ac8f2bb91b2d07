//! Assignment error types.

use thiserror::Error;

/// Errors that can occur when a worker requests their next order.
#[derive(Debug, Error)]
pub enum AssignmentError {
    /// Only production roles pull from queues.
    #[error("Role {0} has no stage queue")]
    NotAProductionRole(String),

    /// The worker is at their WIP cap.
    #[error("WIP cap reached: {wip_count} of {wip_cap} orders in progress")]
    WipCapExceeded {
        /// Orders currently in progress.
        wip_count: u32,
        /// The project's per-worker cap.
        wip_cap: u32,
    },

    /// The stage queue is empty.
    #[error("No order available in the queue")]
    NoOrderAvailable,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl AssignmentError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotAProductionRole(_) => 403,
            Self::NoOrderAvailable => 404,
            Self::WipCapExceeded { .. } => 409,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotAProductionRole(_) => "NOT_A_PRODUCTION_ROLE",
            Self::WipCapExceeded { .. } => "WIP_CAP_EXCEEDED",
            Self::NoOrderAvailable => "NO_ORDER_AVAILABLE",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wip_cap_error() {
        let err = AssignmentError::WipCapExceeded {
            wip_count: 3,
            wip_cap: 3,
        };
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "WIP_CAP_EXCEEDED");
        assert!(err.to_string().contains("3 of 3"));
    }

    #[test]
    fn test_no_order_error() {
        let err = AssignmentError::NoOrderAvailable;
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "NO_ORDER_AVAILABLE");
    }

    #[test]
    fn test_not_production_role_error() {
        let err = AssignmentError::NotAProductionRole("admin".to_string());
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "NOT_A_PRODUCTION_ROLE");
    }
}
