//! Lock/unlock validation for billing periods.

use crate::monthlock::types::{MonthLockError, Period};
use crate::workflow::types::UserRole;

/// Stateless service for month-lock decisions.
pub struct MonthLockService;

impl MonthLockService {
    /// Validate a lock request.
    ///
    /// # Errors
    ///
    /// Returns `MonthLockError::AlreadyLocked` if the period is
    /// locked and `MonthLockError::RoleNotAllowed` for non-management
    /// actors.
    pub fn check_lock(
        period: Period,
        currently_locked: bool,
        actor_role: UserRole,
    ) -> Result<(), MonthLockError> {
        Self::check_role(actor_role)?;
        if currently_locked {
            return Err(MonthLockError::AlreadyLocked(period));
        }
        Ok(())
    }

    /// Validate an unlock request.
    ///
    /// # Errors
    ///
    /// Returns `MonthLockError::NotLocked` if the period is not
    /// locked and `MonthLockError::RoleNotAllowed` for non-management
    /// actors.
    pub fn check_unlock(
        period: Period,
        currently_locked: bool,
        actor_role: UserRole,
    ) -> Result<(), MonthLockError> {
        Self::check_role(actor_role)?;
        if !currently_locked {
            return Err(MonthLockError::NotLocked(period));
        }
        Ok(())
    }

    /// Roles allowed to manage month locks. Accounts management is
    /// included because locking is a billing step.
    #[must_use]
    pub const fn can_manage(role: UserRole) -> bool {
        role.is_management() || matches!(role, UserRole::AccountsManager)
    }

    fn check_role(role: UserRole) -> Result<(), MonthLockError> {
        if Self::can_manage(role) {
            Ok(())
        } else {
            Err(MonthLockError::RoleNotAllowed(role.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period() -> Period {
        "2026-07".parse().unwrap()
    }

    #[test]
    fn test_lock_unlocked_period() {
        assert!(MonthLockService::check_lock(period(), false, UserRole::AccountsManager).is_ok());
    }

    #[test]
    fn test_lock_locked_period_fails() {
        let result = MonthLockService::check_lock(period(), true, UserRole::Director);
        assert!(matches!(result, Err(MonthLockError::AlreadyLocked(_))));
    }

    #[test]
    fn test_unlock_locked_period() {
        assert!(MonthLockService::check_unlock(period(), true, UserRole::OperationsManager).is_ok());
    }

    #[test]
    fn test_unlock_unlocked_period_fails() {
        let result = MonthLockService::check_unlock(period(), false, UserRole::Ceo);
        assert!(matches!(result, Err(MonthLockError::NotLocked(_))));
    }

    #[test]
    fn test_production_roles_cannot_manage() {
        for role in [
            UserRole::Drawer,
            UserRole::Checker,
            UserRole::Qa,
            UserRole::Designer,
        ] {
            let result = MonthLockService::check_lock(period(), false, role);
            assert!(matches!(result, Err(MonthLockError::RoleNotAllowed(_))));
        }
    }
}
