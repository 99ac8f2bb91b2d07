//! Postgres enum types shared by the entities.
//!
//! String values match the wire forms used by `benchmark-core`; the
//! repositories convert between the two at the boundary.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Pipeline topology of a project.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "workflow_type")]
pub enum WorkflowType {
    /// Floor plans, three production stages.
    #[sea_orm(string_value = "FP_3_LAYER")]
    Fp3Layer,
    /// Photo enhancement, two production stages.
    #[sea_orm(string_value = "PH_2_LAYER")]
    Ph2Layer,
}

/// Order state in the workflow.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "workflow_state")]
pub enum WorkflowState {
    /// Not yet queued for production.
    #[sea_orm(string_value = "RECEIVED")]
    Received,
    /// Waiting for a drawer.
    #[sea_orm(string_value = "QUEUED_DRAW")]
    QueuedDraw,
    /// Being drawn.
    #[sea_orm(string_value = "IN_DRAW")]
    InDraw,
    /// Drawing submitted (recorded on work items).
    #[sea_orm(string_value = "SUBMITTED_DRAW")]
    SubmittedDraw,
    /// Waiting for a checker.
    #[sea_orm(string_value = "QUEUED_CHECK")]
    QueuedCheck,
    /// Being checked.
    #[sea_orm(string_value = "IN_CHECK")]
    InCheck,
    /// Rejected by check (recorded on work items).
    #[sea_orm(string_value = "REJECTED_BY_CHECK")]
    RejectedByCheck,
    /// Check submitted (recorded on work items).
    #[sea_orm(string_value = "SUBMITTED_CHECK")]
    SubmittedCheck,
    /// Waiting for QA.
    #[sea_orm(string_value = "QUEUED_QA")]
    QueuedQa,
    /// In QA.
    #[sea_orm(string_value = "IN_QA")]
    InQa,
    /// Rejected by QA (recorded on work items).
    #[sea_orm(string_value = "REJECTED_BY_QA")]
    RejectedByQa,
    /// QA approved, awaiting delivery.
    #[sea_orm(string_value = "APPROVED_QA")]
    ApprovedQa,
    /// Waiting for a designer.
    #[sea_orm(string_value = "QUEUED_DESIGN")]
    QueuedDesign,
    /// Being designed.
    #[sea_orm(string_value = "IN_DESIGN")]
    InDesign,
    /// Design submitted (recorded on work items).
    #[sea_orm(string_value = "SUBMITTED_DESIGN")]
    SubmittedDesign,
    /// Delivered. Terminal.
    #[sea_orm(string_value = "DELIVERED")]
    Delivered,
    /// Paused.
    #[sea_orm(string_value = "ON_HOLD")]
    OnHold,
    /// Cancelled. Terminal.
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

/// Order priority.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "order_priority")]
pub enum OrderPriority {
    /// Lowest.
    #[sea_orm(string_value = "low")]
    Low,
    /// Default.
    #[sea_orm(string_value = "normal")]
    Normal,
    /// Elevated.
    #[sea_orm(string_value = "high")]
    High,
    /// Jumps every queue.
    #[sea_orm(string_value = "urgent")]
    Urgent,
}

/// User role.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
pub enum UserRole {
    /// Chief executive.
    #[sea_orm(string_value = "ceo")]
    Ceo,
    /// Director.
    #[sea_orm(string_value = "director")]
    Director,
    /// Operations manager.
    #[sea_orm(string_value = "operations_manager")]
    OperationsManager,
    /// QA worker.
    #[sea_orm(string_value = "qa")]
    Qa,
    /// Drawing checker.
    #[sea_orm(string_value = "checker")]
    Checker,
    /// Floor-plan drawer.
    #[sea_orm(string_value = "drawer")]
    Drawer,
    /// Photo-enhancement designer.
    #[sea_orm(string_value = "designer")]
    Designer,
    /// Administrator.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Accounts manager.
    #[sea_orm(string_value = "accounts_manager")]
    AccountsManager,
}

/// Invoice status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_status")]
pub enum InvoiceStatus {
    /// Being drafted.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Finalized by operations.
    #[sea_orm(string_value = "prepared")]
    Prepared,
    /// Signed off by a senior role.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Issued with an invoice number.
    #[sea_orm(string_value = "issued")]
    Issued,
    /// Sent to the client.
    #[sea_orm(string_value = "sent")]
    Sent,
}

/// Outcome of one work item (one worker attempt at one stage).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "work_item_status")]
pub enum WorkItemStatus {
    /// Currently being worked.
    #[sea_orm(string_value = "assigned")]
    Assigned,
    /// Finished and submitted.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// The worker's output was rejected downstream.
    #[sea_orm(string_value = "rejected")]
    Rejected,
    /// Given back to the queue unfinished.
    #[sea_orm(string_value = "released")]
    Released,
}
