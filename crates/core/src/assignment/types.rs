//! Assignment domain types.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::workflow::types::{Priority, Stage, UserRole};

/// A queued order competing for assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateOrder {
    /// The order id.
    pub id: Uuid,
    /// The order priority.
    pub priority: Priority,
    /// When the order entered its current queue.
    pub queued_at: DateTime<Utc>,
}

/// The worker requesting their next order.
#[derive(Debug, Clone)]
pub struct WorkerContext {
    /// The worker's user id.
    pub user_id: Uuid,
    /// The worker's role.
    pub role: UserRole,
    /// Orders the worker currently has in progress.
    pub wip_count: u32,
    /// The project's per-worker WIP cap.
    pub wip_cap: u32,
}

impl WorkerContext {
    /// The stage whose queue this worker pulls from, if they are a
    /// production role.
    #[must_use]
    pub const fn stage(&self) -> Option<Stage> {
        self.role.stage()
    }

    /// Whether the worker has capacity for another order.
    #[must_use]
    pub const fn has_capacity(&self) -> bool {
        self.wip_count < self.wip_cap
    }
}
