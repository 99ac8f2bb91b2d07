//! Ranking and capacity rules for start-next.
//!
//! The engine is pure: it takes the queue snapshot and the worker's
//! context and returns the candidates in claim order. The repository
//! walks that list with conditional updates until one claim sticks.

use std::cmp::Ordering;

use crate::assignment::error::AssignmentError;
use crate::assignment::types::{CandidateOrder, WorkerContext};
use crate::workflow::types::Stage;

/// Stateless assignment decision engine.
pub struct AssignmentEngine;

impl AssignmentEngine {
    /// Validates that the worker may pull at all and returns the
    /// stage queue they pull from.
    ///
    /// # Errors
    ///
    /// Returns `AssignmentError::NotAProductionRole` for roles
    /// without a stage and `AssignmentError::WipCapExceeded` when
    /// the worker is at capacity.
    pub fn admit(worker: &WorkerContext) -> Result<Stage, AssignmentError> {
        let stage = worker
            .stage()
            .ok_or_else(|| AssignmentError::NotAProductionRole(worker.role.to_string()))?;
        if !worker.has_capacity() {
            return Err(AssignmentError::WipCapExceeded {
                wip_count: worker.wip_count,
                wip_cap: worker.wip_cap,
            });
        }
        Ok(stage)
    }

    /// Orders the queue snapshot into claim order: priority
    /// descending, then oldest in queue first, then order id as the
    /// deterministic tie-breaker.
    #[must_use]
    pub fn rank(mut candidates: Vec<CandidateOrder>) -> Vec<CandidateOrder> {
        candidates.sort_by(Self::claim_order);
        candidates
    }

    /// Full decision: admit the worker and rank the queue.
    ///
    /// # Errors
    ///
    /// Returns `AssignmentError::NoOrderAvailable` when the queue
    /// snapshot is empty, plus the admission errors of
    /// [`AssignmentEngine::admit`].
    pub fn decide(
        worker: &WorkerContext,
        candidates: Vec<CandidateOrder>,
    ) -> Result<Vec<CandidateOrder>, AssignmentError> {
        Self::admit(worker)?;
        if candidates.is_empty() {
            return Err(AssignmentError::NoOrderAvailable);
        }
        Ok(Self::rank(candidates))
    }

    fn claim_order(a: &CandidateOrder, b: &CandidateOrder) -> Ordering {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.queued_at.cmp(&b.queued_at))
            .then_with(|| a.id.cmp(&b.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::types::{Priority, UserRole};
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn worker(role: UserRole, wip_count: u32, wip_cap: u32) -> WorkerContext {
        WorkerContext {
            user_id: Uuid::new_v4(),
            role,
            wip_count,
            wip_cap,
        }
    }

    fn candidate(priority: Priority, age_minutes: i64) -> CandidateOrder {
        CandidateOrder {
            id: Uuid::new_v4(),
            priority,
            queued_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[test]
    fn test_admit_maps_role_to_stage() {
        let stage = AssignmentEngine::admit(&worker(UserRole::Checker, 0, 3)).unwrap();
        assert_eq!(stage, Stage::Check);
    }

    #[test]
    fn test_admit_rejects_management() {
        let result = AssignmentEngine::admit(&worker(UserRole::OperationsManager, 0, 3));
        assert!(matches!(
            result,
            Err(AssignmentError::NotAProductionRole(_))
        ));
    }

    #[test]
    fn test_admit_rejects_at_cap() {
        let result = AssignmentEngine::admit(&worker(UserRole::Drawer, 3, 3));
        assert!(matches!(
            result,
            Err(AssignmentError::WipCapExceeded {
                wip_count: 3,
                wip_cap: 3
            })
        ));
    }

    #[test]
    fn test_priority_beats_age() {
        let old_normal = candidate(Priority::Normal, 120);
        let fresh_urgent = candidate(Priority::Urgent, 1);
        let ranked = AssignmentEngine::rank(vec![old_normal.clone(), fresh_urgent.clone()]);
        assert_eq!(ranked[0].id, fresh_urgent.id);
        assert_eq!(ranked[1].id, old_normal.id);
    }

    #[test]
    fn test_same_priority_oldest_first() {
        let older = candidate(Priority::High, 60);
        let newer = candidate(Priority::High, 5);
        let ranked = AssignmentEngine::rank(vec![newer.clone(), older.clone()]);
        assert_eq!(ranked[0].id, older.id);
    }

    #[test]
    fn test_id_breaks_exact_ties() {
        let queued_at = Utc::now();
        let mut a = candidate(Priority::Normal, 0);
        let mut b = candidate(Priority::Normal, 0);
        a.queued_at = queued_at;
        b.queued_at = queued_at;
        let expected_first = a.id.min(b.id);
        let ranked = AssignmentEngine::rank(vec![a, b]);
        assert_eq!(ranked[0].id, expected_first);
    }

    #[test]
    fn test_decide_empty_queue() {
        let result = AssignmentEngine::decide(&worker(UserRole::Qa, 0, 3), vec![]);
        assert!(matches!(result, Err(AssignmentError::NoOrderAvailable)));
    }

    #[test]
    fn test_decide_checks_cap_before_queue() {
        // A capped worker gets the cap error even with work waiting.
        let result = AssignmentEngine::decide(
            &worker(UserRole::Qa, 5, 3),
            vec![candidate(Priority::Urgent, 10)],
        );
        assert!(matches!(result, Err(AssignmentError::WipCapExceeded { .. })));
    }
}
