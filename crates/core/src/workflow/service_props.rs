//! Property-based tests for WorkflowService.
//!
//! These tests drive the state machine with randomized inputs and
//! check that every reachable state stays inside the order's topology
//! and that transitions preserve their invariants.

use proptest::prelude::*;
use uuid::Uuid;

use crate::workflow::error::WorkflowError;
use crate::workflow::service::WorkflowService;
use crate::workflow::types::{Stage, UserRole, WorkflowAction, WorkflowState, WorkflowType};

/// Strategy for generating a workflow topology.
fn arb_workflow() -> impl Strategy<Value = WorkflowType> {
    prop_oneof![Just(WorkflowType::Fp3Layer), Just(WorkflowType::Ph2Layer)]
}

/// Strategy for generating random UUIDs.
fn arb_uuid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

/// Strategy for generating a state from the given topology.
fn arb_state_of(workflow: WorkflowType) -> impl Strategy<Value = WorkflowState> {
    let states = workflow.states().to_vec();
    (0..states.len()).prop_map(move |i| states[i])
}

/// Strategy for generating any state at all.
fn arb_any_state() -> impl Strategy<Value = WorkflowState> {
    arb_workflow().prop_flat_map(arb_state_of)
}

/// Strategy for a rejection reason long enough to be accepted.
fn arb_long_reason() -> impl Strategy<Value = String> {
    "[a-zA-Z ]{12,80}".prop_map(|s| format!("rework: {s}"))
}

/// Strategy for a user role.
fn arb_role() -> impl Strategy<Value = UserRole> {
    prop_oneof![
        Just(UserRole::Ceo),
        Just(UserRole::Director),
        Just(UserRole::OperationsManager),
        Just(UserRole::Qa),
        Just(UserRole::Checker),
        Just(UserRole::Drawer),
        Just(UserRole::Designer),
        Just(UserRole::Admin),
        Just(UserRole::AccountsManager),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every accepted assign lands on a state inside the topology
    /// and records the claiming worker.
    #[test]
    fn prop_assign_stays_in_topology(
        workflow in arb_workflow(),
        role in arb_role(),
        worker in arb_uuid(),
    ) {
        for state in workflow.states() {
            if let Ok(action) = WorkflowService::assign(workflow, *state, role, worker) {
                prop_assert!(workflow.contains_state(action.new_state()));
                prop_assert_eq!(action.assigned_to(), Some(worker));
                // Only a matching production role can claim.
                prop_assert_eq!(role.stage(), state.queued_stage());
            }
        }
    }

    /// A submit always advances to the next queue of the same
    /// topology, or to APPROVED_QA from the last stage.
    #[test]
    fn prop_submit_advances_pipeline(
        workflow in arb_workflow(),
        worker in arb_uuid(),
    ) {
        for stage in workflow.stages() {
            let action = WorkflowService::submit(
                workflow,
                stage.in_state(),
                stage.role(),
                worker,
                Some(worker),
            );
            prop_assert!(action.is_ok());
            let action = action.unwrap();
            prop_assert!(workflow.contains_state(action.new_state()));
            match workflow.next_stage(*stage) {
                Some(next) => prop_assert_eq!(action.new_state(), next.queued_state()),
                None => prop_assert_eq!(action.new_state(), WorkflowState::ApprovedQa),
            }
        }
    }

    /// A rejection always routes to a strictly earlier stage of the
    /// same topology, never forward and never sideways.
    #[test]
    fn prop_reject_routes_backwards(
        workflow in arb_workflow(),
        worker in arb_uuid(),
        reason in arb_long_reason(),
        route_choice in prop::option::of(0usize..4),
    ) {
        let stages = workflow.stages();
        for (idx, stage) in stages.iter().enumerate() {
            if stage.rejected_state().is_none() {
                continue;
            }
            let route_to = route_choice.map(|i| {
                [Stage::Draw, Stage::Check, Stage::Qa, Stage::Design][i]
            });
            let result = WorkflowService::reject(
                workflow,
                stage.in_state(),
                stage.role(),
                worker,
                Some(worker),
                reason.clone(),
                "quality",
                route_to,
            );
            if let Ok(WorkflowAction::Reject { target_stage, new_state, .. }) = result {
                let target_idx = stages.iter().position(|s| *s == target_stage);
                prop_assert!(target_idx.is_some());
                prop_assert!(target_idx.unwrap() < idx);
                prop_assert_eq!(new_state, target_stage.queued_state());
            }
        }
    }

    /// Hold then resume restores exactly the pre-hold state.
    #[test]
    fn prop_hold_resume_round_trip(
        workflow in arb_workflow(),
        manager in arb_uuid(),
        reason in arb_long_reason(),
    ) {
        for state in workflow.states() {
            let held = WorkflowService::hold(
                *state,
                UserRole::OperationsManager,
                manager,
                None,
                reason.clone(),
            );
            let Ok(WorkflowAction::Hold { previous_state, .. }) = held else {
                // Terminal states and ON_HOLD itself refuse the hold.
                prop_assert!(
                    state.is_terminal() || *state == WorkflowState::OnHold
                );
                continue;
            };
            prop_assert_eq!(previous_state, *state);

            let resumed = WorkflowService::resume(
                workflow,
                WorkflowState::OnHold,
                previous_state,
                UserRole::Director,
                manager,
            );
            prop_assert!(resumed.is_ok());
            prop_assert_eq!(resumed.unwrap().new_state(), *state);
        }
    }

    /// Terminal states admit no action from anyone.
    #[test]
    fn prop_terminal_states_are_final(
        workflow in arb_workflow(),
        role in arb_role(),
        user in arb_uuid(),
        reason in arb_long_reason(),
    ) {
        for state in [WorkflowState::Delivered, WorkflowState::Cancelled] {
            prop_assert!(WorkflowService::assign(workflow, state, role, user).is_err());
            prop_assert!(
                WorkflowService::submit(workflow, state, role, user, Some(user)).is_err()
            );
            prop_assert!(WorkflowService::deliver(state, role, user).is_err());
            prop_assert!(
                WorkflowService::hold(state, role, user, None, reason.clone()).is_err()
            );
            prop_assert!(
                WorkflowService::cancel(state, role, user, reason.clone()).is_err()
            );
        }
    }

    /// Non-management roles can never deliver, resume, reassign or cancel.
    #[test]
    fn prop_management_gates_hold_for_workers(
        workflow in arb_workflow(),
        state in arb_any_state(),
        user in arb_uuid(),
        reason in arb_long_reason(),
    ) {
        for role in [UserRole::Drawer, UserRole::Checker, UserRole::Qa, UserRole::Designer, UserRole::AccountsManager] {
            prop_assert!(
                matches!(
                    WorkflowService::deliver(WorkflowState::ApprovedQa, role, user),
                    Err(WorkflowError::RoleNotAllowed { .. })
                ),
                "deliver must fail with RoleNotAllowed for role {:?}",
                role
            );
            prop_assert!(
                matches!(
                    WorkflowService::resume(workflow, WorkflowState::OnHold, WorkflowState::QueuedQa, role, user),
                    Err(WorkflowError::RoleNotAllowed { .. })
                ),
                "resume must fail with RoleNotAllowed for role {:?}",
                role
            );
            prop_assert!(
                matches!(
                    WorkflowService::reassign(workflow, state, role, user, role),
                    Err(WorkflowError::RoleNotAllowed { .. })
                        | Err(WorkflowError::TerminalState { .. })
                        | Err(WorkflowError::OrderOnHold)
                ),
                "reassign must fail with RoleNotAllowed/TerminalState/OrderOnHold for role {:?}",
                role
            );
            prop_assert!(
                matches!(
                    WorkflowService::cancel(state, role, user, reason.clone()),
                    Err(WorkflowError::RoleNotAllowed { .. })
                        | Err(WorkflowError::TerminalState { .. })
                ),
                "cancel must fail with RoleNotAllowed/TerminalState for role {:?}",
                role
            );
        }
    }
}
