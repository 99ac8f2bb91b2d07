//! Month-lock repository: freezing production counts per period.
//!
//! Counts are computed live from orders and work items until the
//! period is locked; locking freezes the snapshot into the lock row
//! and later reads serve the frozen copy. Unlocking keeps the
//! snapshot for audit.

use chrono::{DateTime, NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use benchmark_core::monthlock::{MonthLockError, MonthLockService, Period, ProductionCounts};
use benchmark_core::workflow::{Stage, UserRole, WorkflowState};

use crate::entities::sea_orm_active_enums::WorkItemStatus;
use crate::entities::{month_locks, orders, work_items};
use crate::repositories::convert;

/// Month-lock repository.
#[derive(Debug, Clone)]
pub struct MonthLockRepository {
    db: DatabaseConnection,
}

impl MonthLockRepository {
    /// Creates a new month-lock repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetches the lock record for a period, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `MonthLockError::Database` on query failure.
    pub async fn get(
        &self,
        project_id: Uuid,
        period: Period,
    ) -> Result<Option<month_locks::Model>, MonthLockError> {
        month_locks::Entity::find()
            .filter(month_locks::Column::ProjectId.eq(project_id))
            .filter(month_locks::Column::Period.eq(period.to_string()))
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    /// Lists a project's lock records.
    ///
    /// # Errors
    ///
    /// Returns `MonthLockError::Database` on query failure.
    pub async fn list(&self, project_id: Uuid) -> Result<Vec<month_locks::Model>, MonthLockError> {
        month_locks::Entity::find()
            .filter(month_locks::Column::ProjectId.eq(project_id))
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Locks a period, freezing its production counts.
    ///
    /// # Errors
    ///
    /// Returns `MonthLockError::AlreadyLocked`,
    /// `MonthLockError::RoleNotAllowed` or `MonthLockError::Database`.
    pub async fn lock(
        &self,
        project_id: Uuid,
        period: Period,
        actor_id: Uuid,
        actor_role: UserRole,
    ) -> Result<month_locks::Model, MonthLockError> {
        let existing = self.get(project_id, period).await?;
        let currently_locked = existing.as_ref().is_some_and(|l| l.is_locked);
        MonthLockService::check_lock(period, currently_locked, actor_role)?;

        let snapshot = self.compute_counts(project_id, period).await?;
        let counts =
            serde_json::to_value(&snapshot).map_err(|e| MonthLockError::Database(e.to_string()))?;
        let now = Utc::now().into();

        match existing {
            Some(lock) => {
                let mut active: month_locks::ActiveModel = lock.into();
                active.is_locked = Set(true);
                active.counts = Set(counts);
                active.locked_by = Set(Some(actor_id));
                active.locked_at = Set(Some(now));
                active.updated_at = Set(now);
                active.update(&self.db).await.map_err(db_err)
            }
            None => {
                let lock = month_locks::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    project_id: Set(project_id),
                    period: Set(period.to_string()),
                    is_locked: Set(true),
                    counts: Set(counts),
                    locked_by: Set(Some(actor_id)),
                    locked_at: Set(Some(now)),
                    unlocked_by: Set(None),
                    unlocked_at: Set(None),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                lock.insert(&self.db).await.map_err(db_err)
            }
        }
    }

    /// Unlocks a period. The frozen snapshot stays on the record.
    ///
    /// # Errors
    ///
    /// Returns `MonthLockError::NotLocked`,
    /// `MonthLockError::RoleNotAllowed` or `MonthLockError::Database`.
    pub async fn unlock(
        &self,
        project_id: Uuid,
        period: Period,
        actor_id: Uuid,
        actor_role: UserRole,
    ) -> Result<month_locks::Model, MonthLockError> {
        let existing = self.get(project_id, period).await?;
        let currently_locked = existing.as_ref().is_some_and(|l| l.is_locked);
        MonthLockService::check_unlock(period, currently_locked, actor_role)?;

        // check_unlock guarantees a locked record exists.
        let lock = existing.ok_or(MonthLockError::LockNotFound(period))?;
        let now = Utc::now().into();

        let mut active: month_locks::ActiveModel = lock.into();
        active.is_locked = Set(false);
        active.unlocked_by = Set(Some(actor_id));
        active.unlocked_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(&self.db).await.map_err(db_err)
    }

    /// Production counts for a period: the frozen snapshot when the
    /// period is locked, computed live otherwise.
    ///
    /// # Errors
    ///
    /// Returns `MonthLockError::Database` on query failure.
    pub async fn counts(
        &self,
        project_id: Uuid,
        period: Period,
    ) -> Result<ProductionCounts, MonthLockError> {
        if let Some(lock) = self.get(project_id, period).await? {
            if lock.is_locked {
                return serde_json::from_value(lock.counts)
                    .map_err(|e| MonthLockError::Database(e.to_string()));
            }
        }
        self.compute_counts(project_id, period).await
    }

    async fn compute_counts(
        &self,
        project_id: Uuid,
        period: Period,
    ) -> Result<ProductionCounts, MonthLockError> {
        let (start, end) = period_bounds(period);

        let received = orders::Entity::find()
            .filter(orders::Column::ProjectId.eq(project_id))
            .filter(orders::Column::ReceivedAt.gte(start))
            .filter(orders::Column::ReceivedAt.lt(end))
            .count(&self.db)
            .await
            .map_err(db_err)?;

        let delivered = orders::Entity::find()
            .filter(orders::Column::ProjectId.eq(project_id))
            .filter(orders::Column::DeliveredAt.gte(start))
            .filter(orders::Column::DeliveredAt.lt(end))
            .count(&self.db)
            .await
            .map_err(db_err)?;

        let cancelled = orders::Entity::find()
            .filter(orders::Column::ProjectId.eq(project_id))
            .filter(
                orders::Column::WorkflowState
                    .eq(convert::state_to_db(WorkflowState::Cancelled)),
            )
            .filter(orders::Column::UpdatedAt.gte(start))
            .filter(orders::Column::UpdatedAt.lt(end))
            .count(&self.db)
            .await
            .map_err(db_err)?;

        let pending = orders::Entity::find()
            .filter(orders::Column::ProjectId.eq(project_id))
            .filter(
                orders::Column::WorkflowState
                    .is_not_in([
                        convert::state_to_db(WorkflowState::Delivered),
                        convert::state_to_db(WorkflowState::Cancelled),
                    ]),
            )
            .count(&self.db)
            .await
            .map_err(db_err)?;

        let mut stage_completions = std::collections::BTreeMap::new();
        for stage in [Stage::Draw, Stage::Check, Stage::Qa, Stage::Design] {
            let completed = work_items::Entity::find()
                .join(JoinType::InnerJoin, work_items::Relation::Orders.def())
                .filter(orders::Column::ProjectId.eq(project_id))
                .filter(work_items::Column::Stage.eq(stage.as_str()))
                .filter(work_items::Column::Status.eq(WorkItemStatus::Completed))
                .filter(work_items::Column::FinishedAt.gte(start))
                .filter(work_items::Column::FinishedAt.lt(end))
                .count(&self.db)
                .await
                .map_err(db_err)?;
            if completed > 0 {
                stage_completions
                    .insert(stage.as_str().to_string(), i64::try_from(completed).unwrap_or(i64::MAX));
            }
        }

        Ok(ProductionCounts {
            received: i64::try_from(received).unwrap_or(i64::MAX),
            delivered: i64::try_from(delivered).unwrap_or(i64::MAX),
            pending: i64::try_from(pending).unwrap_or(i64::MAX),
            cancelled: i64::try_from(cancelled).unwrap_or(i64::MAX),
            stage_completions,
            computed_at: Utc::now(),
        })
    }
}

/// Half-open UTC bounds of a period, `[first day, next first day)`.
fn period_bounds(period: Period) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = period.first_day().and_time(NaiveTime::MIN).and_utc();
    let end = period.next_first_day().and_time(NaiveTime::MIN).and_utc();
    (start, end)
}

fn db_err(e: DbErr) -> MonthLockError {
    MonthLockError::Database(e.to_string())
}
