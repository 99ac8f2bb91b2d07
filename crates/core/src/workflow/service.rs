//! Workflow service for order state transitions.
//!
//! This module implements the order lifecycle state machine for both
//! pipeline topologies. All methods are stateless associated
//! functions: they validate a requested transition against the
//! current state and actor, and return a `WorkflowAction` carrying
//! the audit fields the persistence layer writes.

use chrono::Utc;
use uuid::Uuid;

use crate::workflow::error::WorkflowError;
use crate::workflow::types::{
    RejectionCode, Stage, UserRole, WorkflowAction, WorkflowState, WorkflowType,
};

/// Minimum length of a rejection reason, in characters.
pub const MIN_REJECTION_REASON_LEN: usize = 10;

/// Stateless service for order workflow transitions.
pub struct WorkflowService;

impl WorkflowService {
    /// Accept a received order into production.
    ///
    /// The order moves from `RECEIVED` to the queue of the topology's
    /// first stage.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidTransition` if the order is not
    /// in `RECEIVED`.
    pub fn receive(
        workflow: WorkflowType,
        current_state: WorkflowState,
    ) -> Result<WorkflowAction, WorkflowError> {
        Self::check_not_terminal(current_state)?;
        match current_state {
            WorkflowState::Received => Ok(WorkflowAction::Receive {
                new_state: workflow.first_stage().queued_state(),
                queued_at: Utc::now(),
            }),
            _ => Err(WorkflowError::InvalidTransition {
                from: current_state,
                action: "queue",
            }),
        }
    }

    /// Claim a queued order for the actor's stage.
    ///
    /// The order moves from `QUEUED_X` to `IN_X`; the actor's
    /// production role must match the queued stage.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidTransition` if the order is not
    /// queued, and `WorkflowError::RoleNotAllowed` if the actor does
    /// not work the queued stage.
    pub fn assign(
        workflow: WorkflowType,
        current_state: WorkflowState,
        actor_role: UserRole,
        actor_id: Uuid,
    ) -> Result<WorkflowAction, WorkflowError> {
        Self::check_not_terminal(current_state)?;
        Self::check_not_on_hold(current_state)?;

        let Some(stage) = current_state.queued_stage() else {
            return Err(WorkflowError::InvalidTransition {
                from: current_state,
                action: "assign",
            });
        };
        Self::check_stage_in_topology(workflow, stage, current_state)?;

        if actor_role.stage() != Some(stage) {
            return Err(WorkflowError::RoleNotAllowed {
                role: actor_role.to_string(),
                action: "assign",
            });
        }

        Ok(WorkflowAction::Assign {
            new_state: stage.in_state(),
            stage,
            assigned_to: actor_id,
            assigned_at: Utc::now(),
        })
    }

    /// Submit the actor's finished work for their stage.
    ///
    /// The order routes through the stage's pass-through submitted
    /// state and lands on the next stage's queue, or on `APPROVED_QA`
    /// when QA submits.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::NotAssignedToActor` if the actor does
    /// not hold the order, and `WorkflowError::InvalidTransition` if
    /// the order is not in progress.
    pub fn submit(
        workflow: WorkflowType,
        current_state: WorkflowState,
        actor_role: UserRole,
        actor_id: Uuid,
        assigned_to: Option<Uuid>,
    ) -> Result<WorkflowAction, WorkflowError> {
        Self::check_not_terminal(current_state)?;
        Self::check_not_on_hold(current_state)?;

        let Some(stage) = current_state.in_stage() else {
            return Err(WorkflowError::InvalidTransition {
                from: current_state,
                action: "submit",
            });
        };
        Self::check_stage_in_topology(workflow, stage, current_state)?;

        if actor_role.stage() != Some(stage) {
            return Err(WorkflowError::RoleNotAllowed {
                role: actor_role.to_string(),
                action: "submit",
            });
        }
        if assigned_to != Some(actor_id) {
            return Err(WorkflowError::NotAssignedToActor);
        }

        let via = stage.submitted_state();
        let (new_state, queued_at) = match workflow.next_stage(stage) {
            Some(next) => (next.queued_state(), Some(Utc::now())),
            // QA is always the last stage; its submit approves.
            None => (WorkflowState::ApprovedQa, None),
        };

        Ok(WorkflowAction::Submit {
            new_state,
            via,
            stage,
            queued_at,
            submitted_at: Utc::now(),
        })
    }

    /// Deliver a QA-approved order to the client.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::RoleNotAllowed` unless the actor is QA
    /// or a management role, and `WorkflowError::InvalidTransition` if
    /// the order is not in `APPROVED_QA`.
    pub fn deliver(
        current_state: WorkflowState,
        actor_role: UserRole,
        actor_id: Uuid,
    ) -> Result<WorkflowAction, WorkflowError> {
        Self::check_not_terminal(current_state)?;
        Self::check_not_on_hold(current_state)?;

        if !actor_role.is_management() && actor_role != UserRole::Qa {
            return Err(WorkflowError::RoleNotAllowed {
                role: actor_role.to_string(),
                action: "deliver",
            });
        }

        match current_state {
            WorkflowState::ApprovedQa => Ok(WorkflowAction::Deliver {
                new_state: WorkflowState::Delivered,
                delivered_by: actor_id,
                delivered_at: Utc::now(),
            }),
            _ => Err(WorkflowError::InvalidTransition {
                from: current_state,
                action: "deliver",
            }),
        }
    }

    /// Reject in-progress work back to an earlier production stage.
    ///
    /// Only verification stages (check, QA) can reject. The work
    /// routes through the stage's `REJECTED_BY_*` pass-through state
    /// and lands on the target stage's queue. When `route_to` is
    /// `None` the work goes to the stage immediately before the
    /// rejecting one.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::ReasonTooShort` if the trimmed reason
    /// is under [`MIN_REJECTION_REASON_LEN`] characters,
    /// `WorkflowError::InvalidRejectionCode` for an unknown code, and
    /// `WorkflowError::InvalidRouteTarget` if the target is not an
    /// earlier production stage of the order's topology.
    #[allow(clippy::too_many_arguments)]
    pub fn reject(
        workflow: WorkflowType,
        current_state: WorkflowState,
        actor_role: UserRole,
        actor_id: Uuid,
        assigned_to: Option<Uuid>,
        reason: String,
        code: &str,
        route_to: Option<Stage>,
    ) -> Result<WorkflowAction, WorkflowError> {
        Self::check_not_terminal(current_state)?;
        Self::check_not_on_hold(current_state)?;

        if reason.trim().is_empty() {
            return Err(WorkflowError::ReasonRequired { action: "reject" });
        }
        if reason.trim().chars().count() < MIN_REJECTION_REASON_LEN {
            return Err(WorkflowError::ReasonTooShort {
                min: MIN_REJECTION_REASON_LEN,
            });
        }
        let code = RejectionCode::parse(code)
            .ok_or_else(|| WorkflowError::InvalidRejectionCode(code.to_string()))?;

        let Some(from_stage) = current_state.in_stage() else {
            return Err(WorkflowError::InvalidTransition {
                from: current_state,
                action: "reject",
            });
        };
        Self::check_stage_in_topology(workflow, from_stage, current_state)?;

        let Some(via) = from_stage.rejected_state() else {
            return Err(WorkflowError::RoleNotAllowed {
                role: actor_role.to_string(),
                action: "reject",
            });
        };

        if actor_role.stage() != Some(from_stage) {
            return Err(WorkflowError::RoleNotAllowed {
                role: actor_role.to_string(),
                action: "reject",
            });
        }
        if assigned_to != Some(actor_id) {
            return Err(WorkflowError::NotAssignedToActor);
        }

        let default_target =
            workflow
                .prev_stage(from_stage)
                .ok_or(WorkflowError::InvalidTransition {
                    from: current_state,
                    action: "reject",
                })?;
        let target_stage = route_to.unwrap_or(default_target);

        // The target must be strictly earlier in the pipeline.
        let stages = workflow.stages();
        let from_idx = stages.iter().position(|s| *s == from_stage);
        let target_idx = stages.iter().position(|s| *s == target_stage);
        match (from_idx, target_idx) {
            (Some(f), Some(t)) if t < f => {}
            _ => return Err(WorkflowError::InvalidRouteTarget { stage: target_stage }),
        }

        Ok(WorkflowAction::Reject {
            new_state: target_stage.queued_state(),
            via,
            from_stage,
            target_stage,
            code,
            reason,
            rejected_by: actor_id,
            rejected_at: Utc::now(),
        })
    }

    /// Place an order on hold.
    ///
    /// Management can hold any non-terminal order; a production role
    /// can only hold an order they are currently working.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::ReasonRequired` if the reason is empty
    /// and `WorkflowError::OrderOnHold` if already held.
    pub fn hold(
        current_state: WorkflowState,
        actor_role: UserRole,
        actor_id: Uuid,
        assigned_to: Option<Uuid>,
        reason: String,
    ) -> Result<WorkflowAction, WorkflowError> {
        Self::check_not_terminal(current_state)?;
        if current_state == WorkflowState::OnHold {
            return Err(WorkflowError::OrderOnHold);
        }
        if reason.trim().is_empty() {
            return Err(WorkflowError::ReasonRequired { action: "hold" });
        }

        if !actor_role.is_management() {
            let working_own_order = current_state
                .in_stage()
                .is_some_and(|stage| actor_role.stage() == Some(stage))
                && assigned_to == Some(actor_id);
            if !working_own_order {
                return Err(WorkflowError::RoleNotAllowed {
                    role: actor_role.to_string(),
                    action: "hold",
                });
            }
        }

        Ok(WorkflowAction::Hold {
            new_state: WorkflowState::OnHold,
            previous_state: current_state,
            reason,
            held_by: actor_id,
            held_at: Utc::now(),
        })
    }

    /// Lift a hold, restoring the order to its pre-hold state.
    ///
    /// Management only.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::NotOnHold` if the order is not held and
    /// `WorkflowError::StateOutsideTopology` if the stored pre-hold
    /// state does not belong to the order's topology.
    pub fn resume(
        workflow: WorkflowType,
        current_state: WorkflowState,
        previous_state: WorkflowState,
        actor_role: UserRole,
        actor_id: Uuid,
    ) -> Result<WorkflowAction, WorkflowError> {
        if current_state != WorkflowState::OnHold {
            return Err(WorkflowError::NotOnHold);
        }
        if !actor_role.is_management() {
            return Err(WorkflowError::RoleNotAllowed {
                role: actor_role.to_string(),
                action: "resume",
            });
        }
        if !workflow.contains_state(previous_state) || previous_state == WorkflowState::OnHold {
            return Err(WorkflowError::StateOutsideTopology {
                state: previous_state,
                workflow: workflow.to_string(),
            });
        }

        Ok(WorkflowAction::Resume {
            new_state: previous_state,
            resumed_by: actor_id,
            resumed_at: Utc::now(),
        })
    }

    /// Give an in-progress order back to its stage queue.
    ///
    /// The assigned worker can release their own order; management
    /// can release anyone's.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidTransition` if the order is not
    /// in progress.
    pub fn release(
        workflow: WorkflowType,
        current_state: WorkflowState,
        actor_role: UserRole,
        actor_id: Uuid,
        assigned_to: Option<Uuid>,
    ) -> Result<WorkflowAction, WorkflowError> {
        Self::check_not_terminal(current_state)?;
        Self::check_not_on_hold(current_state)?;

        let Some(stage) = current_state.in_stage() else {
            return Err(WorkflowError::InvalidTransition {
                from: current_state,
                action: "release",
            });
        };
        Self::check_stage_in_topology(workflow, stage, current_state)?;

        if !actor_role.is_management() && assigned_to != Some(actor_id) {
            return Err(WorkflowError::NotAssignedToActor);
        }

        Ok(WorkflowAction::Release {
            new_state: stage.queued_state(),
            stage,
            queued_at: Utc::now(),
        })
    }

    /// Move an in-progress order to a different worker.
    ///
    /// Management only; the target user's role must work the order's
    /// current stage.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::RoleNotAllowed` if the actor is not
    /// management or the target role does not match the stage.
    pub fn reassign(
        workflow: WorkflowType,
        current_state: WorkflowState,
        actor_role: UserRole,
        target_user: Uuid,
        target_role: UserRole,
    ) -> Result<WorkflowAction, WorkflowError> {
        Self::check_not_terminal(current_state)?;
        Self::check_not_on_hold(current_state)?;

        if !actor_role.is_management() {
            return Err(WorkflowError::RoleNotAllowed {
                role: actor_role.to_string(),
                action: "reassign",
            });
        }

        let Some(stage) = current_state.in_stage() else {
            return Err(WorkflowError::InvalidTransition {
                from: current_state,
                action: "reassign",
            });
        };
        Self::check_stage_in_topology(workflow, stage, current_state)?;

        if target_role.stage() != Some(stage) {
            return Err(WorkflowError::RoleNotAllowed {
                role: target_role.to_string(),
                action: "reassign",
            });
        }

        Ok(WorkflowAction::Reassign {
            new_state: current_state,
            stage,
            assigned_to: target_user,
            assigned_at: Utc::now(),
        })
    }

    /// Cancel an order. Management only; any non-terminal state.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::ReasonRequired` if the reason is empty.
    pub fn cancel(
        current_state: WorkflowState,
        actor_role: UserRole,
        actor_id: Uuid,
        reason: String,
    ) -> Result<WorkflowAction, WorkflowError> {
        Self::check_not_terminal(current_state)?;
        if reason.trim().is_empty() {
            return Err(WorkflowError::ReasonRequired { action: "cancel" });
        }
        if !actor_role.is_management() {
            return Err(WorkflowError::RoleNotAllowed {
                role: actor_role.to_string(),
                action: "cancel",
            });
        }

        Ok(WorkflowAction::Cancel {
            new_state: WorkflowState::Cancelled,
            reason,
            cancelled_by: actor_id,
            cancelled_at: Utc::now(),
        })
    }

    fn check_not_terminal(state: WorkflowState) -> Result<(), WorkflowError> {
        if state.is_terminal() {
            return Err(WorkflowError::TerminalState { state });
        }
        Ok(())
    }

    fn check_not_on_hold(state: WorkflowState) -> Result<(), WorkflowError> {
        if state == WorkflowState::OnHold {
            return Err(WorkflowError::OrderOnHold);
        }
        Ok(())
    }

    fn check_stage_in_topology(
        workflow: WorkflowType,
        stage: Stage,
        state: WorkflowState,
    ) -> Result<(), WorkflowError> {
        if workflow.has_stage(stage) {
            Ok(())
        } else {
            Err(WorkflowError::StateOutsideTopology {
                state,
                workflow: workflow.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FP: WorkflowType = WorkflowType::Fp3Layer;
    const PH: WorkflowType = WorkflowType::Ph2Layer;

    fn reason() -> String {
        "Walls missing on the second floor".to_string()
    }

    #[test]
    fn test_receive_queues_first_stage() {
        let action = WorkflowService::receive(FP, WorkflowState::Received).unwrap();
        assert_eq!(action.new_state(), WorkflowState::QueuedDraw);

        let action = WorkflowService::receive(PH, WorkflowState::Received).unwrap();
        assert_eq!(action.new_state(), WorkflowState::QueuedDesign);
    }

    #[test]
    fn test_receive_from_queued_fails() {
        let result = WorkflowService::receive(FP, WorkflowState::QueuedDraw);
        assert!(matches!(
            result,
            Err(WorkflowError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_assign_matching_role() {
        let worker = Uuid::new_v4();
        let action =
            WorkflowService::assign(FP, WorkflowState::QueuedDraw, UserRole::Drawer, worker)
                .unwrap();
        assert_eq!(action.new_state(), WorkflowState::InDraw);
        assert_eq!(action.assigned_to(), Some(worker));
    }

    #[test]
    fn test_assign_wrong_role_fails() {
        let result = WorkflowService::assign(
            FP,
            WorkflowState::QueuedDraw,
            UserRole::Checker,
            Uuid::new_v4(),
        );
        assert!(matches!(result, Err(WorkflowError::RoleNotAllowed { .. })));
    }

    #[test]
    fn test_assign_non_queued_fails() {
        let result =
            WorkflowService::assign(FP, WorkflowState::InDraw, UserRole::Drawer, Uuid::new_v4());
        assert!(matches!(
            result,
            Err(WorkflowError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_submit_advances_to_next_queue() {
        let worker = Uuid::new_v4();
        let action = WorkflowService::submit(
            FP,
            WorkflowState::InDraw,
            UserRole::Drawer,
            worker,
            Some(worker),
        )
        .unwrap();
        assert_eq!(action.new_state(), WorkflowState::QueuedCheck);
        if let WorkflowAction::Submit { via, queued_at, .. } = action {
            assert_eq!(via, WorkflowState::SubmittedDraw);
            assert!(queued_at.is_some());
        } else {
            panic!("expected submit action");
        }
    }

    #[test]
    fn test_qa_submit_approves() {
        let worker = Uuid::new_v4();
        let action =
            WorkflowService::submit(FP, WorkflowState::InQa, UserRole::Qa, worker, Some(worker))
                .unwrap();
        assert_eq!(action.new_state(), WorkflowState::ApprovedQa);
        if let WorkflowAction::Submit { via, queued_at, .. } = action {
            assert_eq!(via, WorkflowState::ApprovedQa);
            assert!(queued_at.is_none());
        } else {
            panic!("expected submit action");
        }
    }

    #[test]
    fn test_ph_design_submit_goes_to_qa() {
        let worker = Uuid::new_v4();
        let action = WorkflowService::submit(
            PH,
            WorkflowState::InDesign,
            UserRole::Designer,
            worker,
            Some(worker),
        )
        .unwrap();
        assert_eq!(action.new_state(), WorkflowState::QueuedQa);
    }

    #[test]
    fn test_submit_by_non_assignee_fails() {
        let result = WorkflowService::submit(
            FP,
            WorkflowState::InDraw,
            UserRole::Drawer,
            Uuid::new_v4(),
            Some(Uuid::new_v4()),
        );
        assert!(matches!(result, Err(WorkflowError::NotAssignedToActor)));
    }

    #[test]
    fn test_deliver_approved_order() {
        let action = WorkflowService::deliver(
            WorkflowState::ApprovedQa,
            UserRole::OperationsManager,
            Uuid::new_v4(),
        )
        .unwrap();
        assert_eq!(action.new_state(), WorkflowState::Delivered);
    }

    #[test]
    fn test_qa_can_deliver() {
        let result =
            WorkflowService::deliver(WorkflowState::ApprovedQa, UserRole::Qa, Uuid::new_v4());
        assert!(result.is_ok());
    }

    #[test]
    fn test_deliver_by_drawer_fails() {
        let result =
            WorkflowService::deliver(WorkflowState::ApprovedQa, UserRole::Drawer, Uuid::new_v4());
        assert!(matches!(result, Err(WorkflowError::RoleNotAllowed { .. })));
    }

    #[test]
    fn test_deliver_unapproved_fails() {
        let result = WorkflowService::deliver(
            WorkflowState::QueuedQa,
            UserRole::OperationsManager,
            Uuid::new_v4(),
        );
        assert!(matches!(
            result,
            Err(WorkflowError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_check_reject_routes_to_draw() {
        let worker = Uuid::new_v4();
        let action = WorkflowService::reject(
            FP,
            WorkflowState::InCheck,
            UserRole::Checker,
            worker,
            Some(worker),
            reason(),
            "quality",
            None,
        )
        .unwrap();
        assert_eq!(action.new_state(), WorkflowState::QueuedDraw);
        if let WorkflowAction::Reject {
            via, target_stage, ..
        } = action
        {
            assert_eq!(via, WorkflowState::RejectedByCheck);
            assert_eq!(target_stage, Stage::Draw);
        } else {
            panic!("expected reject action");
        }
    }

    #[test]
    fn test_qa_reject_defaults_to_check() {
        let worker = Uuid::new_v4();
        let action = WorkflowService::reject(
            FP,
            WorkflowState::InQa,
            UserRole::Qa,
            worker,
            Some(worker),
            reason(),
            "wrong_specs",
            None,
        )
        .unwrap();
        assert_eq!(action.new_state(), WorkflowState::QueuedCheck);
    }

    #[test]
    fn test_qa_reject_can_route_to_draw() {
        let worker = Uuid::new_v4();
        let action = WorkflowService::reject(
            FP,
            WorkflowState::InQa,
            UserRole::Qa,
            worker,
            Some(worker),
            reason(),
            "rework",
            Some(Stage::Draw),
        )
        .unwrap();
        assert_eq!(action.new_state(), WorkflowState::QueuedDraw);
    }

    #[test]
    fn test_ph_qa_reject_goes_to_design() {
        let worker = Uuid::new_v4();
        let action = WorkflowService::reject(
            PH,
            WorkflowState::InQa,
            UserRole::Qa,
            worker,
            Some(worker),
            reason(),
            "incomplete",
            None,
        )
        .unwrap();
        assert_eq!(action.new_state(), WorkflowState::QueuedDesign);
    }

    #[test]
    fn test_reject_route_to_later_stage_fails() {
        let worker = Uuid::new_v4();
        let result = WorkflowService::reject(
            FP,
            WorkflowState::InCheck,
            UserRole::Checker,
            worker,
            Some(worker),
            reason(),
            "quality",
            Some(Stage::Qa),
        );
        assert!(matches!(
            result,
            Err(WorkflowError::InvalidRouteTarget { .. })
        ));
    }

    #[test]
    fn test_drawer_cannot_reject() {
        let worker = Uuid::new_v4();
        let result = WorkflowService::reject(
            FP,
            WorkflowState::InDraw,
            UserRole::Drawer,
            worker,
            Some(worker),
            reason(),
            "quality",
            None,
        );
        assert!(matches!(result, Err(WorkflowError::RoleNotAllowed { .. })));
    }

    #[test]
    fn test_reject_short_reason_fails() {
        let worker = Uuid::new_v4();
        let result = WorkflowService::reject(
            FP,
            WorkflowState::InCheck,
            UserRole::Checker,
            worker,
            Some(worker),
            "bad".to_string(),
            "quality",
            None,
        );
        assert!(matches!(result, Err(WorkflowError::ReasonTooShort { .. })));
    }

    #[test]
    fn test_reject_unknown_code_fails() {
        let worker = Uuid::new_v4();
        let result = WorkflowService::reject(
            FP,
            WorkflowState::InCheck,
            UserRole::Checker,
            worker,
            Some(worker),
            reason(),
            "ugly",
            None,
        );
        assert!(matches!(
            result,
            Err(WorkflowError::InvalidRejectionCode(_))
        ));
    }

    #[test]
    fn test_management_can_hold_queued_order() {
        let action = WorkflowService::hold(
            WorkflowState::QueuedCheck,
            UserRole::OperationsManager,
            Uuid::new_v4(),
            None,
            "Client requested changes to the brief".to_string(),
        )
        .unwrap();
        assert_eq!(action.new_state(), WorkflowState::OnHold);
        if let WorkflowAction::Hold { previous_state, .. } = action {
            assert_eq!(previous_state, WorkflowState::QueuedCheck);
        } else {
            panic!("expected hold action");
        }
    }

    #[test]
    fn test_worker_can_hold_own_order() {
        let worker = Uuid::new_v4();
        let action = WorkflowService::hold(
            WorkflowState::InDraw,
            UserRole::Drawer,
            worker,
            Some(worker),
            "Waiting for missing source photos".to_string(),
        )
        .unwrap();
        assert_eq!(action.new_state(), WorkflowState::OnHold);
    }

    #[test]
    fn test_worker_cannot_hold_queued_order() {
        let result = WorkflowService::hold(
            WorkflowState::QueuedDraw,
            UserRole::Drawer,
            Uuid::new_v4(),
            None,
            "Waiting for missing source photos".to_string(),
        );
        assert!(matches!(result, Err(WorkflowError::RoleNotAllowed { .. })));
    }

    #[test]
    fn test_hold_without_reason_fails() {
        let result = WorkflowService::hold(
            WorkflowState::InDraw,
            UserRole::OperationsManager,
            Uuid::new_v4(),
            None,
            "  ".to_string(),
        );
        assert!(matches!(result, Err(WorkflowError::ReasonRequired { .. })));
    }

    #[test]
    fn test_hold_already_held_fails() {
        let result = WorkflowService::hold(
            WorkflowState::OnHold,
            UserRole::OperationsManager,
            Uuid::new_v4(),
            None,
            "Another hold".to_string(),
        );
        assert!(matches!(result, Err(WorkflowError::OrderOnHold)));
    }

    #[test]
    fn test_resume_restores_previous_state() {
        let action = WorkflowService::resume(
            FP,
            WorkflowState::OnHold,
            WorkflowState::InCheck,
            UserRole::Director,
            Uuid::new_v4(),
        )
        .unwrap();
        assert_eq!(action.new_state(), WorkflowState::InCheck);
    }

    #[test]
    fn test_resume_not_held_fails() {
        let result = WorkflowService::resume(
            FP,
            WorkflowState::InCheck,
            WorkflowState::InCheck,
            UserRole::Director,
            Uuid::new_v4(),
        );
        assert!(matches!(result, Err(WorkflowError::NotOnHold)));
    }

    #[test]
    fn test_resume_by_production_role_fails() {
        let result = WorkflowService::resume(
            FP,
            WorkflowState::OnHold,
            WorkflowState::InDraw,
            UserRole::Drawer,
            Uuid::new_v4(),
        );
        assert!(matches!(result, Err(WorkflowError::RoleNotAllowed { .. })));
    }

    #[test]
    fn test_resume_foreign_state_fails() {
        let result = WorkflowService::resume(
            PH,
            WorkflowState::OnHold,
            WorkflowState::InDraw,
            UserRole::Director,
            Uuid::new_v4(),
        );
        assert!(matches!(
            result,
            Err(WorkflowError::StateOutsideTopology { .. })
        ));
    }

    #[test]
    fn test_release_returns_to_queue() {
        let worker = Uuid::new_v4();
        let action = WorkflowService::release(
            FP,
            WorkflowState::InDraw,
            UserRole::Drawer,
            worker,
            Some(worker),
        )
        .unwrap();
        assert_eq!(action.new_state(), WorkflowState::QueuedDraw);
        assert_eq!(action.assigned_to(), None);
    }

    #[test]
    fn test_release_foreign_order_fails() {
        let result = WorkflowService::release(
            FP,
            WorkflowState::InDraw,
            UserRole::Drawer,
            Uuid::new_v4(),
            Some(Uuid::new_v4()),
        );
        assert!(matches!(result, Err(WorkflowError::NotAssignedToActor)));
    }

    #[test]
    fn test_management_can_release_any_order() {
        let result = WorkflowService::release(
            FP,
            WorkflowState::InQa,
            UserRole::OperationsManager,
            Uuid::new_v4(),
            Some(Uuid::new_v4()),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_reassign_to_matching_role() {
        let target = Uuid::new_v4();
        let action = WorkflowService::reassign(
            FP,
            WorkflowState::InCheck,
            UserRole::OperationsManager,
            target,
            UserRole::Checker,
        )
        .unwrap();
        assert_eq!(action.new_state(), WorkflowState::InCheck);
        assert_eq!(action.assigned_to(), Some(target));
    }

    #[test]
    fn test_reassign_to_wrong_role_fails() {
        let result = WorkflowService::reassign(
            FP,
            WorkflowState::InCheck,
            UserRole::OperationsManager,
            Uuid::new_v4(),
            UserRole::Drawer,
        );
        assert!(matches!(result, Err(WorkflowError::RoleNotAllowed { .. })));
    }

    #[test]
    fn test_reassign_by_worker_fails() {
        let result = WorkflowService::reassign(
            FP,
            WorkflowState::InCheck,
            UserRole::Checker,
            Uuid::new_v4(),
            UserRole::Checker,
        );
        assert!(matches!(result, Err(WorkflowError::RoleNotAllowed { .. })));
    }

    #[test]
    fn test_cancel_any_active_state() {
        for state in [
            WorkflowState::Received,
            WorkflowState::QueuedDraw,
            WorkflowState::InQa,
            WorkflowState::OnHold,
            WorkflowState::ApprovedQa,
        ] {
            let action = WorkflowService::cancel(
                state,
                UserRole::Admin,
                Uuid::new_v4(),
                "Client withdrew the order".to_string(),
            )
            .unwrap();
            assert_eq!(action.new_state(), WorkflowState::Cancelled);
        }
    }

    #[test]
    fn test_cancel_terminal_fails() {
        let result = WorkflowService::cancel(
            WorkflowState::Delivered,
            UserRole::Admin,
            Uuid::new_v4(),
            "Too late".to_string(),
        );
        assert!(matches!(result, Err(WorkflowError::TerminalState { .. })));
    }

    #[test]
    fn test_actions_on_held_order_fail() {
        let worker = Uuid::new_v4();
        assert!(matches!(
            WorkflowService::assign(FP, WorkflowState::OnHold, UserRole::Drawer, worker),
            Err(WorkflowError::OrderOnHold)
        ));
        assert!(matches!(
            WorkflowService::submit(
                FP,
                WorkflowState::OnHold,
                UserRole::Drawer,
                worker,
                Some(worker)
            ),
            Err(WorkflowError::OrderOnHold)
        ));
        assert!(matches!(
            WorkflowService::deliver(WorkflowState::OnHold, UserRole::Admin, worker),
            Err(WorkflowError::OrderOnHold)
        ));
    }

    #[test]
    fn test_fp_order_lifecycle_with_check_rejection() {
        let drawer = Uuid::new_v4();
        let checker = Uuid::new_v4();
        let qa = Uuid::new_v4();

        let action = WorkflowService::receive(FP, WorkflowState::Received).unwrap();
        assert_eq!(action.new_state(), WorkflowState::QueuedDraw);

        let action =
            WorkflowService::assign(FP, WorkflowState::QueuedDraw, UserRole::Drawer, drawer)
                .unwrap();
        assert_eq!(action.new_state(), WorkflowState::InDraw);

        let action =
            WorkflowService::submit(FP, WorkflowState::InDraw, UserRole::Drawer, drawer, Some(drawer))
                .unwrap();
        assert_eq!(action.new_state(), WorkflowState::QueuedCheck);

        let action =
            WorkflowService::assign(FP, WorkflowState::QueuedCheck, UserRole::Checker, checker)
                .unwrap();
        assert_eq!(action.new_state(), WorkflowState::InCheck);

        // The checker sends the drawing back; rework targets draw.
        let action = WorkflowService::reject(
            FP,
            WorkflowState::InCheck,
            UserRole::Checker,
            checker,
            Some(checker),
            reason(),
            "quality",
            None,
        )
        .unwrap();
        assert_eq!(action.new_state(), WorkflowState::QueuedDraw);
        let WorkflowAction::Reject { target_stage, .. } = action else {
            panic!("expected reject action");
        };
        assert_eq!(target_stage, Stage::Draw);

        // Rework round: draw again, then check and QA both pass.
        for (queued, role, worker) in [
            (WorkflowState::QueuedDraw, UserRole::Drawer, drawer),
            (WorkflowState::QueuedCheck, UserRole::Checker, checker),
            (WorkflowState::QueuedQa, UserRole::Qa, qa),
        ] {
            let action = WorkflowService::assign(FP, queued, role, worker).unwrap();
            let action = WorkflowService::submit(
                FP,
                action.new_state(),
                role,
                worker,
                Some(worker),
            )
            .unwrap();
            assert!(FP.states().contains(&action.new_state()));
        }

        let action =
            WorkflowService::deliver(WorkflowState::ApprovedQa, UserRole::Qa, qa).unwrap();
        assert_eq!(action.new_state(), WorkflowState::Delivered);
    }

    #[test]
    fn test_actions_on_terminal_order_fail() {
        let worker = Uuid::new_v4();
        for state in [WorkflowState::Delivered, WorkflowState::Cancelled] {
            assert!(matches!(
                WorkflowService::assign(FP, state, UserRole::Drawer, worker),
                Err(WorkflowError::TerminalState { .. })
            ));
            assert!(matches!(
                WorkflowService::hold(
                    state,
                    UserRole::Admin,
                    worker,
                    None,
                    "Hold it".to_string()
                ),
                Err(WorkflowError::TerminalState { .. })
            ));
        }
    }
}
