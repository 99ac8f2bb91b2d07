//! Invoice transition logic and role gates.
//!
//! Preparing an invoice is an operations task; everything after that
//! needs a senior signature.

use chrono::Utc;
use uuid::Uuid;

use crate::invoice::error::InvoiceError;
use crate::invoice::types::{InvoiceAction, InvoiceStatus};
use crate::workflow::types::UserRole;

/// Stateless service for invoice transitions.
pub struct InvoiceService;

impl InvoiceService {
    /// Move an invoice to the requested status.
    ///
    /// Transitions are only valid between adjacent statuses of the
    /// linear pipeline. Draft→prepared is gated to operations roles
    /// (plus seniors); every later transition needs a senior role.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::InvalidTransition` for non-adjacent
    /// targets and `InvoiceError::RoleNotAllowed` when the actor's
    /// role fails the gate.
    pub fn transition(
        current_status: InvoiceStatus,
        target_status: InvoiceStatus,
        actor_role: UserRole,
        actor_id: Uuid,
    ) -> Result<InvoiceAction, InvoiceError> {
        if current_status.next() != Some(target_status) {
            return Err(InvoiceError::InvalidTransition {
                from: current_status,
                to: target_status,
            });
        }

        let allowed = match target_status {
            InvoiceStatus::Prepared => Self::can_prepare(actor_role),
            _ => Self::is_senior(actor_role),
        };
        if !allowed {
            return Err(InvoiceError::RoleNotAllowed {
                role: actor_role.to_string(),
                to: target_status,
            });
        }

        Ok(InvoiceAction {
            new_status: target_status,
            transitioned_by: actor_id,
            transitioned_at: Utc::now(),
        })
    }

    /// Validate that an invoice may be deleted.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::NotDeletable` for any non-draft status.
    pub fn check_delete(current_status: InvoiceStatus) -> Result<(), InvoiceError> {
        if current_status.is_deletable() {
            Ok(())
        } else {
            Err(InvoiceError::NotDeletable {
                status: current_status,
            })
        }
    }

    /// Roles that can finalize a draft into a prepared invoice.
    #[must_use]
    pub const fn can_prepare(role: UserRole) -> bool {
        matches!(
            role,
            UserRole::OperationsManager | UserRole::Admin | UserRole::AccountsManager
        ) || Self::is_senior(role)
    }

    /// Roles whose signature moves an invoice past prepared.
    #[must_use]
    pub const fn is_senior(role: UserRole) -> bool {
        matches!(role, UserRole::Ceo | UserRole::Director)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> Uuid {
        Uuid::new_v4()
    }

    #[test]
    fn test_ops_can_prepare() {
        for role in [
            UserRole::OperationsManager,
            UserRole::Admin,
            UserRole::AccountsManager,
        ] {
            let action = InvoiceService::transition(
                InvoiceStatus::Draft,
                InvoiceStatus::Prepared,
                role,
                actor(),
            )
            .unwrap();
            assert_eq!(action.new_status, InvoiceStatus::Prepared);
        }
    }

    #[test]
    fn test_senior_can_prepare_too() {
        let result = InvoiceService::transition(
            InvoiceStatus::Draft,
            InvoiceStatus::Prepared,
            UserRole::Ceo,
            actor(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_production_role_cannot_prepare() {
        let result = InvoiceService::transition(
            InvoiceStatus::Draft,
            InvoiceStatus::Prepared,
            UserRole::Qa,
            actor(),
        );
        assert!(matches!(result, Err(InvoiceError::RoleNotAllowed { .. })));
    }

    #[test]
    fn test_senior_gates_after_prepared() {
        for (from, to) in [
            (InvoiceStatus::Prepared, InvoiceStatus::Approved),
            (InvoiceStatus::Approved, InvoiceStatus::Issued),
            (InvoiceStatus::Issued, InvoiceStatus::Sent),
        ] {
            assert!(InvoiceService::transition(from, to, UserRole::Director, actor()).is_ok());
            assert!(InvoiceService::transition(from, to, UserRole::Ceo, actor()).is_ok());
            assert!(matches!(
                InvoiceService::transition(from, to, UserRole::OperationsManager, actor()),
                Err(InvoiceError::RoleNotAllowed { .. })
            ));
            assert!(matches!(
                InvoiceService::transition(from, to, UserRole::AccountsManager, actor()),
                Err(InvoiceError::RoleNotAllowed { .. })
            ));
        }
    }

    #[test]
    fn test_skipping_a_status_fails() {
        let result = InvoiceService::transition(
            InvoiceStatus::Draft,
            InvoiceStatus::Approved,
            UserRole::Ceo,
            actor(),
        );
        assert!(matches!(
            result,
            Err(InvoiceError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_backwards_transition_fails() {
        let result = InvoiceService::transition(
            InvoiceStatus::Approved,
            InvoiceStatus::Prepared,
            UserRole::Ceo,
            actor(),
        );
        assert!(matches!(
            result,
            Err(InvoiceError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_sent_is_terminal() {
        for to in [
            InvoiceStatus::Draft,
            InvoiceStatus::Prepared,
            InvoiceStatus::Approved,
            InvoiceStatus::Issued,
            InvoiceStatus::Sent,
        ] {
            assert!(InvoiceService::transition(
                InvoiceStatus::Sent,
                to,
                UserRole::Ceo,
                actor()
            )
            .is_err());
        }
    }

    #[test]
    fn test_delete_only_draft() {
        assert!(InvoiceService::check_delete(InvoiceStatus::Draft).is_ok());
        assert!(matches!(
            InvoiceService::check_delete(InvoiceStatus::Prepared),
            Err(InvoiceError::NotDeletable { .. })
        ));
    }
}
