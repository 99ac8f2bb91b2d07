//! Workflow error types for the order lifecycle.
//!
//! This module defines all error types that can occur during
//! workflow operations such as transitions, holds, and rejections.

use thiserror::Error;
use uuid::Uuid;

use crate::workflow::types::{Stage, WorkflowState};

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The requested action is not valid from the current state.
    #[error("Cannot {action} an order in state {from}")]
    InvalidTransition {
        /// The current state.
        from: WorkflowState,
        /// The attempted action.
        action: &'static str,
    },

    /// The actor's role is not permitted to perform the action.
    #[error("Role {role} is not allowed to {action}")]
    RoleNotAllowed {
        /// The actor's role.
        role: String,
        /// The attempted action.
        action: &'static str,
    },

    /// The actor is not the worker assigned to the order.
    #[error("Order is assigned to a different user")]
    NotAssignedToActor,

    /// The order is on hold; it must be resumed first.
    #[error("Order is on hold")]
    OrderOnHold,

    /// Resume was attempted on an order that is not on hold.
    #[error("Order is not on hold")]
    NotOnHold,

    /// The order is in a terminal state.
    #[error("Order in terminal state {state} cannot be modified")]
    TerminalState {
        /// The terminal state.
        state: WorkflowState,
    },

    /// A reason is required for this action.
    #[error("A reason is required to {action}")]
    ReasonRequired {
        /// The attempted action.
        action: &'static str,
    },

    /// The rejection reason is below the minimum length.
    #[error("Rejection reason must be at least {min} characters")]
    ReasonTooShort {
        /// Minimum reason length in characters.
        min: usize,
    },

    /// The rejection code is not in the fixed vocabulary.
    #[error("Unknown rejection code: {0}")]
    InvalidRejectionCode(String),

    /// The rejection route target is not an earlier production stage.
    #[error("Cannot route rejected work to stage {stage}")]
    InvalidRouteTarget {
        /// The requested target stage.
        stage: Stage,
    },

    /// The state does not belong to the order's topology.
    #[error("State {state} is not part of workflow {workflow}")]
    StateOutsideTopology {
        /// The offending state.
        state: WorkflowState,
        /// The order's workflow type.
        workflow: String,
    },

    /// Order not found.
    #[error("Order {0} not found")]
    OrderNotFound(Uuid),

    /// User not found.
    #[error("User {0} not found")]
    UserNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. }
            | Self::OrderOnHold
            | Self::NotOnHold
            | Self::TerminalState { .. }
            | Self::ReasonRequired { .. }
            | Self::ReasonTooShort { .. }
            | Self::InvalidRejectionCode(_)
            | Self::InvalidRouteTarget { .. }
            | Self::StateOutsideTopology { .. } => 400,

            Self::RoleNotAllowed { .. } | Self::NotAssignedToActor => 403,

            Self::OrderNotFound(_) | Self::UserNotFound(_) => 404,

            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::RoleNotAllowed { .. } => "ROLE_NOT_ALLOWED",
            Self::NotAssignedToActor => "NOT_ASSIGNED_TO_ACTOR",
            Self::OrderOnHold => "ORDER_ON_HOLD",
            Self::NotOnHold => "NOT_ON_HOLD",
            Self::TerminalState { .. } => "TERMINAL_STATE",
            Self::ReasonRequired { .. } => "REASON_REQUIRED",
            Self::ReasonTooShort { .. } => "REASON_TOO_SHORT",
            Self::InvalidRejectionCode(_) => "INVALID_REJECTION_CODE",
            Self::InvalidRouteTarget { .. } => "INVALID_ROUTE_TARGET",
            Self::StateOutsideTopology { .. } => "STATE_OUTSIDE_TOPOLOGY",
            Self::OrderNotFound(_) => "ORDER_NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_error() {
        let err = WorkflowError::InvalidTransition {
            from: WorkflowState::Delivered,
            action: "submit",
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert!(err.to_string().contains("DELIVERED"));
        assert!(err.to_string().contains("submit"));
    }

    #[test]
    fn test_role_not_allowed_error() {
        let err = WorkflowError::RoleNotAllowed {
            role: "drawer".to_string(),
            action: "deliver",
        };
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "ROLE_NOT_ALLOWED");
    }

    #[test]
    fn test_on_hold_error() {
        let err = WorkflowError::OrderOnHold;
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "ORDER_ON_HOLD");
    }

    #[test]
    fn test_reason_too_short_error() {
        let err = WorkflowError::ReasonTooShort { min: 10 };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "REASON_TOO_SHORT");
        assert!(err.to_string().contains("10"));
    }

    #[test]
    fn test_invalid_route_target_error() {
        let err = WorkflowError::InvalidRouteTarget { stage: Stage::Qa };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_ROUTE_TARGET");
    }

    #[test]
    fn test_order_not_found_error() {
        let err = WorkflowError::OrderNotFound(Uuid::nil());
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "ORDER_NOT_FOUND");
    }

    #[test]
    fn test_user_not_found_error() {
        let err = WorkflowError::UserNotFound(Uuid::nil());
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "USER_NOT_FOUND");
        assert!(err.to_string().starts_with("User"));
    }

    #[test]
    fn test_not_assigned_error() {
        let err = WorkflowError::NotAssignedToActor;
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "NOT_ASSIGNED_TO_ACTOR");
    }
}
