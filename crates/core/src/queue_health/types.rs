//! Aggregate types for queue health and dashboards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workflow::types::{Stage, UserRole};

/// Health of one stage queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageHealth {
    /// The stage.
    pub stage: Stage,
    /// Orders waiting in the queue.
    pub queued: u64,
    /// Orders currently being worked.
    pub in_progress: u64,
    /// When the oldest queued order entered the queue.
    pub oldest_queued_at: Option<DateTime<Utc>>,
    /// Queued orders older than the project's max wait.
    pub sla_breaches: u64,
}

impl StageHealth {
    /// An empty stage entry, used when an aggregation branch fails.
    #[must_use]
    pub const fn empty(stage: Stage) -> Self {
        Self {
            stage,
            queued: 0,
            in_progress: 0,
            oldest_queued_at: None,
            sla_breaches: 0,
        }
    }
}

/// One worker's current load, listed under their role's staffing entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerLoad {
    /// The worker's user id.
    pub user_id: Uuid,
    /// Display name.
    pub name: String,
    /// Orders currently in progress.
    pub wip_count: u64,
    /// Orders completed since midnight.
    pub completed_today: u64,
}

/// Staffing summary for one production role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffingEntry {
    /// The production role.
    pub role: UserRole,
    /// Workers with this role on the project.
    pub total: u64,
    /// Workers marked present today.
    pub active: u64,
    /// Workers marked absent today.
    pub absent: u64,
    /// Per-worker load.
    pub workers: Vec<WorkerLoad>,
}

/// Project-level order totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectTotals {
    /// Orders not yet delivered or cancelled.
    pub pending: u64,
    /// Orders delivered since midnight.
    pub delivered_today: u64,
    /// Orders currently on hold.
    pub on_hold: u64,
}

/// The full queue-health response for a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueHealth {
    /// The project.
    pub project_id: Uuid,
    /// Per-stage queue health, in pipeline order.
    pub stages: Vec<StageHealth>,
    /// Per-role staffing.
    pub staffing: Vec<StaffingEntry>,
    /// Project totals.
    pub totals: ProjectTotals,
    /// When this snapshot was computed.
    pub generated_at: DateTime<Utc>,
}

/// A worker's personal dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerDashboard {
    /// The order the worker currently holds, if any.
    pub current_order_id: Option<Uuid>,
    /// Orders completed since midnight.
    pub completed_today: u64,
    /// The worker's daily target.
    pub daily_target: u64,
    /// Completed-versus-target progress, 0 to 100.
    pub progress_percent: u8,
    /// Orders waiting in the worker's stage queue.
    pub queue_depth: u64,
    /// Orders currently in progress.
    pub wip_count: u64,
    /// The project's per-worker WIP cap.
    pub wip_cap: u64,
}
