//! Conversions between database enums and core domain enums.
//!
//! The two sets share string values, so the mappings are mechanical;
//! keeping them in one place stops each repository growing its own
//! copy.

use benchmark_core::workflow::types as core;

use crate::entities::sea_orm_active_enums as db;

/// Converts a database workflow type to the core type.
#[must_use]
pub fn workflow_type_to_core(wt: &db::WorkflowType) -> core::WorkflowType {
    match wt {
        db::WorkflowType::Fp3Layer => core::WorkflowType::Fp3Layer,
        db::WorkflowType::Ph2Layer => core::WorkflowType::Ph2Layer,
    }
}

/// Converts a core workflow type to the database type.
#[must_use]
pub fn workflow_type_to_db(wt: core::WorkflowType) -> db::WorkflowType {
    match wt {
        core::WorkflowType::Fp3Layer => db::WorkflowType::Fp3Layer,
        core::WorkflowType::Ph2Layer => db::WorkflowType::Ph2Layer,
    }
}

/// Converts a database workflow state to the core state.
#[must_use]
pub fn state_to_core(state: &db::WorkflowState) -> core::WorkflowState {
    match state {
        db::WorkflowState::Received => core::WorkflowState::Received,
        db::WorkflowState::QueuedDraw => core::WorkflowState::QueuedDraw,
        db::WorkflowState::InDraw => core::WorkflowState::InDraw,
        db::WorkflowState::SubmittedDraw => core::WorkflowState::SubmittedDraw,
        db::WorkflowState::QueuedCheck => core::WorkflowState::QueuedCheck,
        db::WorkflowState::InCheck => core::WorkflowState::InCheck,
        db::WorkflowState::RejectedByCheck => core::WorkflowState::RejectedByCheck,
        db::WorkflowState::SubmittedCheck => core::WorkflowState::SubmittedCheck,
        db::WorkflowState::QueuedQa => core::WorkflowState::QueuedQa,
        db::WorkflowState::InQa => core::WorkflowState::InQa,
        db::WorkflowState::RejectedByQa => core::WorkflowState::RejectedByQa,
        db::WorkflowState::ApprovedQa => core::WorkflowState::ApprovedQa,
        db::WorkflowState::QueuedDesign => core::WorkflowState::QueuedDesign,
        db::WorkflowState::InDesign => core::WorkflowState::InDesign,
        db::WorkflowState::SubmittedDesign => core::WorkflowState::SubmittedDesign,
        db::WorkflowState::Delivered => core::WorkflowState::Delivered,
        db::WorkflowState::OnHold => core::WorkflowState::OnHold,
        db::WorkflowState::Cancelled => core::WorkflowState::Cancelled,
    }
}

/// Converts a core workflow state to the database state.
#[must_use]
pub fn state_to_db(state: core::WorkflowState) -> db::WorkflowState {
    match state {
        core::WorkflowState::Received => db::WorkflowState::Received,
        core::WorkflowState::QueuedDraw => db::WorkflowState::QueuedDraw,
        core::WorkflowState::InDraw => db::WorkflowState::InDraw,
        core::WorkflowState::SubmittedDraw => db::WorkflowState::SubmittedDraw,
        core::WorkflowState::QueuedCheck => db::WorkflowState::QueuedCheck,
        core::WorkflowState::InCheck => db::WorkflowState::InCheck,
        core::WorkflowState::RejectedByCheck => db::WorkflowState::RejectedByCheck,
        core::WorkflowState::SubmittedCheck => db::WorkflowState::SubmittedCheck,
        core::WorkflowState::QueuedQa => db::WorkflowState::QueuedQa,
        core::WorkflowState::InQa => db::WorkflowState::InQa,
        core::WorkflowState::RejectedByQa => db::WorkflowState::RejectedByQa,
        core::WorkflowState::ApprovedQa => db::WorkflowState::ApprovedQa,
        core::WorkflowState::QueuedDesign => db::WorkflowState::QueuedDesign,
        core::WorkflowState::InDesign => db::WorkflowState::InDesign,
        core::WorkflowState::SubmittedDesign => db::WorkflowState::SubmittedDesign,
        core::WorkflowState::Delivered => db::WorkflowState::Delivered,
        core::WorkflowState::OnHold => db::WorkflowState::OnHold,
        core::WorkflowState::Cancelled => db::WorkflowState::Cancelled,
    }
}

/// Converts a database priority to the core priority.
#[must_use]
pub fn priority_to_core(p: &db::OrderPriority) -> core::Priority {
    match p {
        db::OrderPriority::Low => core::Priority::Low,
        db::OrderPriority::Normal => core::Priority::Normal,
        db::OrderPriority::High => core::Priority::High,
        db::OrderPriority::Urgent => core::Priority::Urgent,
    }
}

/// Converts a core priority to the database priority.
#[must_use]
pub fn priority_to_db(p: core::Priority) -> db::OrderPriority {
    match p {
        core::Priority::Low => db::OrderPriority::Low,
        core::Priority::Normal => db::OrderPriority::Normal,
        core::Priority::High => db::OrderPriority::High,
        core::Priority::Urgent => db::OrderPriority::Urgent,
    }
}

/// Converts a database role to the core role.
#[must_use]
pub fn role_to_core(role: &db::UserRole) -> core::UserRole {
    match role {
        db::UserRole::Ceo => core::UserRole::Ceo,
        db::UserRole::Director => core::UserRole::Director,
        db::UserRole::OperationsManager => core::UserRole::OperationsManager,
        db::UserRole::Qa => core::UserRole::Qa,
        db::UserRole::Checker => core::UserRole::Checker,
        db::UserRole::Drawer => core::UserRole::Drawer,
        db::UserRole::Designer => core::UserRole::Designer,
        db::UserRole::Admin => core::UserRole::Admin,
        db::UserRole::AccountsManager => core::UserRole::AccountsManager,
    }
}

/// Converts a core role to the database role.
#[must_use]
pub fn role_to_db(role: core::UserRole) -> db::UserRole {
    match role {
        core::UserRole::Ceo => db::UserRole::Ceo,
        core::UserRole::Director => db::UserRole::Director,
        core::UserRole::OperationsManager => db::UserRole::OperationsManager,
        core::UserRole::Qa => db::UserRole::Qa,
        core::UserRole::Checker => db::UserRole::Checker,
        core::UserRole::Drawer => db::UserRole::Drawer,
        core::UserRole::Designer => db::UserRole::Designer,
        core::UserRole::Admin => db::UserRole::Admin,
        core::UserRole::AccountsManager => db::UserRole::AccountsManager,
    }
}

/// Converts a database invoice status to the core status.
#[must_use]
pub fn invoice_status_to_core(
    status: &db::InvoiceStatus,
) -> benchmark_core::invoice::InvoiceStatus {
    use benchmark_core::invoice::InvoiceStatus as Core;
    match status {
        db::InvoiceStatus::Draft => Core::Draft,
        db::InvoiceStatus::Prepared => Core::Prepared,
        db::InvoiceStatus::Approved => Core::Approved,
        db::InvoiceStatus::Issued => Core::Issued,
        db::InvoiceStatus::Sent => Core::Sent,
    }
}

/// Converts a core invoice status to the database status.
#[must_use]
pub fn invoice_status_to_db(
    status: benchmark_core::invoice::InvoiceStatus,
) -> db::InvoiceStatus {
    use benchmark_core::invoice::InvoiceStatus as Core;
    match status {
        Core::Draft => db::InvoiceStatus::Draft,
        Core::Prepared => db::InvoiceStatus::Prepared,
        Core::Approved => db::InvoiceStatus::Approved,
        Core::Issued => db::InvoiceStatus::Issued,
        Core::Sent => db::InvoiceStatus::Sent,
    }
}

/// Reads the order's attempt counter for one stage.
#[must_use]
pub fn stage_attempt(order: &crate::entities::orders::Model, stage: core::Stage) -> i32 {
    match stage {
        core::Stage::Draw => order.attempt_draw,
        core::Stage::Check => order.attempt_check,
        core::Stage::Qa => order.attempt_qa,
        core::Stage::Design => order.attempt_design,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trip() {
        for wt in [core::WorkflowType::Fp3Layer, core::WorkflowType::Ph2Layer] {
            for state in wt.states() {
                assert_eq!(state_to_core(&state_to_db(*state)), *state);
            }
        }
    }

    #[test]
    fn test_workflow_type_round_trip() {
        for wt in [core::WorkflowType::Fp3Layer, core::WorkflowType::Ph2Layer] {
            assert_eq!(workflow_type_to_core(&workflow_type_to_db(wt)), wt);
        }
    }

    #[test]
    fn test_priority_round_trip() {
        for p in [
            core::Priority::Low,
            core::Priority::Normal,
            core::Priority::High,
            core::Priority::Urgent,
        ] {
            assert_eq!(priority_to_core(&priority_to_db(p)), p);
        }
    }
}
