//! Workflow domain types for the order lifecycle.
//!
//! This module defines the two fixed pipeline topologies and the
//! enumerations shared by the state machine, the assignment engine
//! and the HTTP layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Pipeline topology of a project, fixed at order creation.
///
/// There are exactly two shapes; they are not user-definable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowType {
    /// Floor plans: three production stages (draw, check, qa).
    #[serde(rename = "FP_3_LAYER")]
    Fp3Layer,
    /// Photo enhancement: two production stages (design, qa).
    #[serde(rename = "PH_2_LAYER")]
    Ph2Layer,
}

impl WorkflowType {
    /// Returns the string representation used on the wire and in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fp3Layer => "FP_3_LAYER",
            Self::Ph2Layer => "PH_2_LAYER",
        }
    }

    /// Parses a workflow type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "FP_3_LAYER" => Some(Self::Fp3Layer),
            "PH_2_LAYER" => Some(Self::Ph2Layer),
            _ => None,
        }
    }

    /// The production stages of this topology, in pipeline order.
    #[must_use]
    pub const fn stages(&self) -> &'static [Stage] {
        match self {
            Self::Fp3Layer => &[Stage::Draw, Stage::Check, Stage::Qa],
            Self::Ph2Layer => &[Stage::Design, Stage::Qa],
        }
    }

    /// The stage a freshly received order is queued for.
    #[must_use]
    pub const fn first_stage(&self) -> Stage {
        match self {
            Self::Fp3Layer => Stage::Draw,
            Self::Ph2Layer => Stage::Design,
        }
    }

    /// The stage following `stage` in this topology, if any.
    #[must_use]
    pub fn next_stage(&self, stage: Stage) -> Option<Stage> {
        let stages = self.stages();
        let idx = stages.iter().position(|s| *s == stage)?;
        stages.get(idx + 1).copied()
    }

    /// The stage preceding `stage` in this topology, if any.
    #[must_use]
    pub fn prev_stage(&self, stage: Stage) -> Option<Stage> {
        let stages = self.stages();
        let idx = stages.iter().position(|s| *s == stage)?;
        idx.checked_sub(1).map(|i| stages[i])
    }

    /// Whether `stage` belongs to this topology.
    #[must_use]
    pub fn has_stage(&self, stage: Stage) -> bool {
        self.stages().contains(&stage)
    }

    /// All states reachable by orders of this topology.
    #[must_use]
    pub const fn states(&self) -> &'static [WorkflowState] {
        match self {
            Self::Fp3Layer => &[
                WorkflowState::Received,
                WorkflowState::QueuedDraw,
                WorkflowState::InDraw,
                WorkflowState::SubmittedDraw,
                WorkflowState::QueuedCheck,
                WorkflowState::InCheck,
                WorkflowState::RejectedByCheck,
                WorkflowState::SubmittedCheck,
                WorkflowState::QueuedQa,
                WorkflowState::InQa,
                WorkflowState::RejectedByQa,
                WorkflowState::ApprovedQa,
                WorkflowState::Delivered,
                WorkflowState::OnHold,
                WorkflowState::Cancelled,
            ],
            Self::Ph2Layer => &[
                WorkflowState::Received,
                WorkflowState::QueuedDesign,
                WorkflowState::InDesign,
                WorkflowState::SubmittedDesign,
                WorkflowState::QueuedQa,
                WorkflowState::InQa,
                WorkflowState::RejectedByQa,
                WorkflowState::ApprovedQa,
                WorkflowState::Delivered,
                WorkflowState::OnHold,
                WorkflowState::Cancelled,
            ],
        }
    }

    /// Whether `state` belongs to this topology's state set.
    #[must_use]
    pub fn contains_state(&self, state: WorkflowState) -> bool {
        self.states().contains(&state)
    }
}

impl fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One production role-step of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Floor-plan drawing.
    Draw,
    /// Drawing verification.
    Check,
    /// Final quality assurance (both topologies).
    Qa,
    /// Photo-enhancement design (PH topology only).
    Design,
}

impl Stage {
    /// Returns the string representation of the stage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draw => "draw",
            Self::Check => "check",
            Self::Qa => "qa",
            Self::Design => "design",
        }
    }

    /// Parses a stage from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draw" => Some(Self::Draw),
            "check" => Some(Self::Check),
            "qa" => Some(Self::Qa),
            "design" => Some(Self::Design),
            _ => None,
        }
    }

    /// The queue state for this stage.
    #[must_use]
    pub const fn queued_state(&self) -> WorkflowState {
        match self {
            Self::Draw => WorkflowState::QueuedDraw,
            Self::Check => WorkflowState::QueuedCheck,
            Self::Qa => WorkflowState::QueuedQa,
            Self::Design => WorkflowState::QueuedDesign,
        }
    }

    /// The in-progress state for this stage.
    #[must_use]
    pub const fn in_state(&self) -> WorkflowState {
        match self {
            Self::Draw => WorkflowState::InDraw,
            Self::Check => WorkflowState::InCheck,
            Self::Qa => WorkflowState::InQa,
            Self::Design => WorkflowState::InDesign,
        }
    }

    /// The pass-through state recorded when work at this stage is submitted.
    ///
    /// QA has no `SUBMITTED_QA`; a QA submit lands on `APPROVED_QA`.
    #[must_use]
    pub const fn submitted_state(&self) -> WorkflowState {
        match self {
            Self::Draw => WorkflowState::SubmittedDraw,
            Self::Check => WorkflowState::SubmittedCheck,
            Self::Qa => WorkflowState::ApprovedQa,
            Self::Design => WorkflowState::SubmittedDesign,
        }
    }

    /// The pass-through state recorded when work at this stage is rejected,
    /// if this stage can reject.
    #[must_use]
    pub const fn rejected_state(&self) -> Option<WorkflowState> {
        match self {
            Self::Check => Some(WorkflowState::RejectedByCheck),
            Self::Qa => Some(WorkflowState::RejectedByQa),
            Self::Draw | Self::Design => None,
        }
    }

    /// The production role that works this stage.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        match self {
            Self::Draw => UserRole::Drawer,
            Self::Check => UserRole::Checker,
            Self::Qa => UserRole::Qa,
            Self::Design => UserRole::Designer,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Order state in the workflow.
///
/// `SUBMITTED_*` and `REJECTED_BY_*` are pass-through states: the
/// state machine routes through them in a single transition and the
/// persisted state lands on the resulting queue state, while the
/// pass-through state is recorded on the work item ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowState {
    /// Order exists but is not yet queued for production.
    Received,
    /// Waiting for a drawer.
    QueuedDraw,
    /// A drawer is working the order.
    InDraw,
    /// Drawing submitted (pass-through).
    SubmittedDraw,
    /// Waiting for a checker.
    QueuedCheck,
    /// A checker is working the order.
    InCheck,
    /// Checker rejected the drawing (pass-through).
    RejectedByCheck,
    /// Check submitted (pass-through).
    SubmittedCheck,
    /// Waiting for QA.
    QueuedQa,
    /// QA is working the order.
    InQa,
    /// QA rejected the order (pass-through).
    RejectedByQa,
    /// QA approved the order; awaiting delivery.
    ApprovedQa,
    /// Waiting for a designer (PH topology).
    QueuedDesign,
    /// A designer is working the order.
    InDesign,
    /// Design submitted (pass-through).
    SubmittedDesign,
    /// Delivered to the client. Terminal.
    Delivered,
    /// Paused; the pre-hold state is kept for resume.
    OnHold,
    /// Cancelled. Terminal.
    Cancelled,
}

impl WorkflowState {
    /// Returns the string representation of the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "RECEIVED",
            Self::QueuedDraw => "QUEUED_DRAW",
            Self::InDraw => "IN_DRAW",
            Self::SubmittedDraw => "SUBMITTED_DRAW",
            Self::QueuedCheck => "QUEUED_CHECK",
            Self::InCheck => "IN_CHECK",
            Self::RejectedByCheck => "REJECTED_BY_CHECK",
            Self::SubmittedCheck => "SUBMITTED_CHECK",
            Self::QueuedQa => "QUEUED_QA",
            Self::InQa => "IN_QA",
            Self::RejectedByQa => "REJECTED_BY_QA",
            Self::ApprovedQa => "APPROVED_QA",
            Self::QueuedDesign => "QUEUED_DESIGN",
            Self::InDesign => "IN_DESIGN",
            Self::SubmittedDesign => "SUBMITTED_DESIGN",
            Self::Delivered => "DELIVERED",
            Self::OnHold => "ON_HOLD",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Parses a state from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "RECEIVED" => Some(Self::Received),
            "QUEUED_DRAW" => Some(Self::QueuedDraw),
            "IN_DRAW" => Some(Self::InDraw),
            "SUBMITTED_DRAW" => Some(Self::SubmittedDraw),
            "QUEUED_CHECK" => Some(Self::QueuedCheck),
            "IN_CHECK" => Some(Self::InCheck),
            "REJECTED_BY_CHECK" => Some(Self::RejectedByCheck),
            "SUBMITTED_CHECK" => Some(Self::SubmittedCheck),
            "QUEUED_QA" => Some(Self::QueuedQa),
            "IN_QA" => Some(Self::InQa),
            "REJECTED_BY_QA" => Some(Self::RejectedByQa),
            "APPROVED_QA" => Some(Self::ApprovedQa),
            "QUEUED_DESIGN" => Some(Self::QueuedDesign),
            "IN_DESIGN" => Some(Self::InDesign),
            "SUBMITTED_DESIGN" => Some(Self::SubmittedDesign),
            "DELIVERED" => Some(Self::Delivered),
            "ON_HOLD" => Some(Self::OnHold),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if no further transitions are permitted.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// The stage this state queues for, if it is a queue state.
    #[must_use]
    pub const fn queued_stage(&self) -> Option<Stage> {
        match self {
            Self::QueuedDraw => Some(Stage::Draw),
            Self::QueuedCheck => Some(Stage::Check),
            Self::QueuedQa => Some(Stage::Qa),
            Self::QueuedDesign => Some(Stage::Design),
            _ => None,
        }
    }

    /// The stage being worked, if this is an in-progress state.
    #[must_use]
    pub const fn in_stage(&self) -> Option<Stage> {
        match self {
            Self::InDraw => Some(Stage::Draw),
            Self::InCheck => Some(Stage::Check),
            Self::InQa => Some(Stage::Qa),
            Self::InDesign => Some(Stage::Design),
            _ => None,
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Order priority. Ordering is significant: assignment picks the
/// highest priority first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Lowest priority.
    Low,
    /// Default priority.
    #[default]
    Normal,
    /// Elevated priority.
    High,
    /// Jumps every queue.
    Urgent,
}

impl Priority {
    /// Returns the string representation of the priority.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// Parses a priority from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "normal" => Some(Self::Normal),
            "high" => Some(Self::High),
            "urgent" => Some(Self::Urgent),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fixed vocabulary of rejection codes. A rejection must carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionCode {
    /// Output quality below standard.
    Quality,
    /// Work is incomplete.
    Incomplete,
    /// Does not match the order specification.
    WrongSpecs,
    /// Needs rework for other reasons.
    Rework,
    /// Formatting or presentation problems.
    Formatting,
    /// Required information missing from the submission.
    MissingInfo,
}

impl RejectionCode {
    /// Returns the string representation of the code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Incomplete => "incomplete",
            Self::WrongSpecs => "wrong_specs",
            Self::Rework => "rework",
            Self::Formatting => "formatting",
            Self::MissingInfo => "missing_info",
        }
    }

    /// Parses a rejection code from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "quality" => Some(Self::Quality),
            "incomplete" => Some(Self::Incomplete),
            "wrong_specs" => Some(Self::WrongSpecs),
            "rework" => Some(Self::Rework),
            "formatting" => Some(Self::Formatting),
            "missing_info" => Some(Self::MissingInfo),
            _ => None,
        }
    }
}

impl fmt::Display for RejectionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User role. Production roles work one stage; management roles
/// operate on orders across stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Chief executive; read-heavy plus senior approvals.
    Ceo,
    /// Director; senior approvals.
    Director,
    /// Runs day-to-day operations.
    OperationsManager,
    /// Quality assurance worker.
    Qa,
    /// Drawing checker.
    Checker,
    /// Floor-plan drawer.
    Drawer,
    /// Photo-enhancement designer.
    Designer,
    /// System administration.
    Admin,
    /// Invoicing and billing.
    AccountsManager,
}

impl UserRole {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ceo => "ceo",
            Self::Director => "director",
            Self::OperationsManager => "operations_manager",
            Self::Qa => "qa",
            Self::Checker => "checker",
            Self::Drawer => "drawer",
            Self::Designer => "designer",
            Self::Admin => "admin",
            Self::AccountsManager => "accounts_manager",
        }
    }

    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ceo" => Some(Self::Ceo),
            "director" => Some(Self::Director),
            "operations_manager" => Some(Self::OperationsManager),
            "qa" => Some(Self::Qa),
            "checker" => Some(Self::Checker),
            "drawer" => Some(Self::Drawer),
            "designer" => Some(Self::Designer),
            "admin" => Some(Self::Admin),
            "accounts_manager" => Some(Self::AccountsManager),
            _ => None,
        }
    }

    /// Returns true for roles that work a production stage.
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Drawer | Self::Checker | Self::Qa | Self::Designer)
    }

    /// Returns true for roles that manage orders across stages.
    #[must_use]
    pub const fn is_management(&self) -> bool {
        matches!(
            self,
            Self::Ceo | Self::Director | Self::OperationsManager | Self::Admin
        )
    }

    /// The production stage this role works, if any.
    #[must_use]
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            Self::Drawer => Some(Stage::Draw),
            Self::Checker => Some(Stage::Check),
            Self::Qa => Some(Stage::Qa),
            Self::Designer => Some(Stage::Design),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated workflow transition, carrying everything the
/// persistence layer needs to apply it.
///
/// `via` fields record the pass-through state that the transition
/// routed through; it lands on the work item ledger, not the order.
#[derive(Debug, Clone)]
pub enum WorkflowAction {
    /// Order accepted into production and queued for the first stage.
    Receive {
        /// The queue state of the topology's first stage.
        new_state: WorkflowState,
        /// When the order entered the queue.
        queued_at: DateTime<Utc>,
    },
    /// A worker claimed the order for their stage.
    Assign {
        /// The in-progress state of the claimed stage.
        new_state: WorkflowState,
        /// The stage being worked.
        stage: Stage,
        /// The worker now holding the order.
        assigned_to: Uuid,
        /// When the claim happened.
        assigned_at: DateTime<Utc>,
    },
    /// The assigned worker finished their stage.
    Submit {
        /// The resulting state (next queue, or `APPROVED_QA`).
        new_state: WorkflowState,
        /// The pass-through state recorded on the work item.
        via: WorkflowState,
        /// The stage that was completed.
        stage: Stage,
        /// When the work entered the next queue, if there is one.
        queued_at: Option<DateTime<Utc>>,
        /// When the submission happened.
        submitted_at: DateTime<Utc>,
    },
    /// An approved order was delivered to the client.
    Deliver {
        /// Always `DELIVERED`.
        new_state: WorkflowState,
        /// The user who delivered.
        delivered_by: Uuid,
        /// When the delivery happened.
        delivered_at: DateTime<Utc>,
    },
    /// A verification stage sent the order back for rework.
    Reject {
        /// The queue state of the rework target stage.
        new_state: WorkflowState,
        /// The pass-through state recorded on the work item.
        via: WorkflowState,
        /// The stage that rejected.
        from_stage: Stage,
        /// The earlier stage the work was routed to.
        target_stage: Stage,
        /// The rejection code.
        code: RejectionCode,
        /// The rejection reason.
        reason: String,
        /// The user who rejected.
        rejected_by: Uuid,
        /// When the rejection happened.
        rejected_at: DateTime<Utc>,
    },
    /// Order paused.
    Hold {
        /// Always `ON_HOLD`.
        new_state: WorkflowState,
        /// The state to restore on resume.
        previous_state: WorkflowState,
        /// The hold reason.
        reason: String,
        /// The user who placed the hold.
        held_by: Uuid,
        /// When the hold was placed.
        held_at: DateTime<Utc>,
    },
    /// Hold lifted; order restored to its pre-hold state.
    Resume {
        /// The restored state.
        new_state: WorkflowState,
        /// The user who lifted the hold.
        resumed_by: Uuid,
        /// When the hold was lifted.
        resumed_at: DateTime<Utc>,
    },
    /// The assigned worker gave the order back to its queue.
    Release {
        /// The queue state of the released stage.
        new_state: WorkflowState,
        /// The stage whose queue receives the order.
        stage: Stage,
        /// When the order re-entered the queue.
        queued_at: DateTime<Utc>,
    },
    /// Management moved an in-progress order to another worker.
    Reassign {
        /// Unchanged in-progress state.
        new_state: WorkflowState,
        /// The stage being worked.
        stage: Stage,
        /// The new assignee.
        assigned_to: Uuid,
        /// When the reassignment happened.
        assigned_at: DateTime<Utc>,
    },
    /// Order cancelled.
    Cancel {
        /// Always `CANCELLED`.
        new_state: WorkflowState,
        /// The cancellation reason.
        reason: String,
        /// The user who cancelled.
        cancelled_by: Uuid,
        /// When the cancellation happened.
        cancelled_at: DateTime<Utc>,
    },
}

impl WorkflowAction {
    /// Returns the state the order lands on after this action.
    #[must_use]
    pub const fn new_state(&self) -> WorkflowState {
        match self {
            Self::Receive { new_state, .. }
            | Self::Assign { new_state, .. }
            | Self::Submit { new_state, .. }
            | Self::Deliver { new_state, .. }
            | Self::Reject { new_state, .. }
            | Self::Hold { new_state, .. }
            | Self::Resume { new_state, .. }
            | Self::Release { new_state, .. }
            | Self::Reassign { new_state, .. }
            | Self::Cancel { new_state, .. } => *new_state,
        }
    }

    /// Returns the worker the order is assigned to after this action,
    /// or `None` when the action leaves it unassigned.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<Uuid> {
        match self {
            Self::Assign { assigned_to, .. } | Self::Reassign { assigned_to, .. } => {
                Some(*assigned_to)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_type_round_trip() {
        for wt in [WorkflowType::Fp3Layer, WorkflowType::Ph2Layer] {
            assert_eq!(WorkflowType::parse(wt.as_str()), Some(wt));
        }
        assert_eq!(WorkflowType::parse("FP_4_LAYER"), None);
    }

    #[test]
    fn test_fp_stage_order() {
        let wt = WorkflowType::Fp3Layer;
        assert_eq!(wt.first_stage(), Stage::Draw);
        assert_eq!(wt.next_stage(Stage::Draw), Some(Stage::Check));
        assert_eq!(wt.next_stage(Stage::Check), Some(Stage::Qa));
        assert_eq!(wt.next_stage(Stage::Qa), None);
        assert_eq!(wt.prev_stage(Stage::Qa), Some(Stage::Check));
        assert_eq!(wt.prev_stage(Stage::Draw), None);
    }

    #[test]
    fn test_ph_stage_order() {
        let wt = WorkflowType::Ph2Layer;
        assert_eq!(wt.first_stage(), Stage::Design);
        assert_eq!(wt.next_stage(Stage::Design), Some(Stage::Qa));
        assert_eq!(wt.next_stage(Stage::Qa), None);
        assert!(!wt.has_stage(Stage::Draw));
        assert!(!wt.has_stage(Stage::Check));
    }

    #[test]
    fn test_ph_topology_excludes_draw_states() {
        let wt = WorkflowType::Ph2Layer;
        assert!(!wt.contains_state(WorkflowState::QueuedDraw));
        assert!(!wt.contains_state(WorkflowState::InCheck));
        assert!(wt.contains_state(WorkflowState::InDesign));
        assert!(wt.contains_state(WorkflowState::OnHold));
    }

    #[test]
    fn test_state_round_trip() {
        for wt in [WorkflowType::Fp3Layer, WorkflowType::Ph2Layer] {
            for state in wt.states() {
                assert_eq!(WorkflowState::parse(state.as_str()), Some(*state));
            }
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(WorkflowState::Delivered.is_terminal());
        assert!(WorkflowState::Cancelled.is_terminal());
        assert!(!WorkflowState::OnHold.is_terminal());
        assert!(!WorkflowState::ApprovedQa.is_terminal());
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Urgent > Priority::High);
        assert!(Priority::High > Priority::Normal);
        assert!(Priority::Normal > Priority::Low);
    }

    #[test]
    fn test_stage_state_mapping() {
        assert_eq!(Stage::Draw.queued_state(), WorkflowState::QueuedDraw);
        assert_eq!(Stage::Qa.in_state(), WorkflowState::InQa);
        assert_eq!(Stage::Qa.submitted_state(), WorkflowState::ApprovedQa);
        assert_eq!(
            Stage::Design.submitted_state(),
            WorkflowState::SubmittedDesign
        );
        assert_eq!(Stage::Draw.rejected_state(), None);
        assert_eq!(
            Stage::Check.rejected_state(),
            Some(WorkflowState::RejectedByCheck)
        );
    }

    #[test]
    fn test_role_classification() {
        assert!(UserRole::Drawer.is_production());
        assert!(!UserRole::Drawer.is_management());
        assert!(UserRole::OperationsManager.is_management());
        assert!(!UserRole::AccountsManager.is_management());
        assert_eq!(UserRole::Checker.stage(), Some(Stage::Check));
        assert_eq!(UserRole::Ceo.stage(), None);
    }

    #[test]
    fn test_rejection_code_round_trip() {
        for code in [
            RejectionCode::Quality,
            RejectionCode::Incomplete,
            RejectionCode::WrongSpecs,
            RejectionCode::Rework,
            RejectionCode::Formatting,
            RejectionCode::MissingInfo,
        ] {
            assert_eq!(RejectionCode::parse(code.as_str()), Some(code));
        }
        assert_eq!(RejectionCode::parse("vibes"), None);
    }
}
