//! Dashboard aggregations: queue health, staffing and the worker view.

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use tracing::error;
use uuid::Uuid;

use benchmark_core::queue_health::{
    sla, ProjectTotals, QueueHealth, StaffingEntry, StageHealth, WorkerDashboard, WorkerLoad,
};
use benchmark_core::workflow::{Stage, WorkflowError, WorkflowState};

use crate::entities::sea_orm_active_enums::WorkItemStatus;
use crate::entities::{orders, projects, users, work_items};
use crate::repositories::convert;

/// Read-only dashboard repository.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The full queue-health snapshot for a project.
    ///
    /// A failed per-stage branch degrades to an empty entry rather
    /// than failing the whole snapshot.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::OrderNotFound` for an unknown project
    /// and `WorkflowError::Database` when the totals query fails.
    pub async fn queue_health(&self, project_id: Uuid) -> Result<QueueHealth, WorkflowError> {
        let project = self.get_project(project_id).await?;
        let workflow = convert::workflow_type_to_core(&project.workflow_type);
        let now = Utc::now();

        let mut stages = Vec::with_capacity(workflow.stages().len());
        for stage in workflow.stages() {
            match self
                .stage_health(project_id, *stage, project.sla_hours, now)
                .await
            {
                Ok(health) => stages.push(health),
                Err(e) => {
                    error!(stage = %stage, error = %e, "stage health aggregation failed");
                    stages.push(StageHealth::empty(*stage));
                }
            }
        }

        let staffing = self.staffing(project_id).await?;
        let totals = self.totals(project_id).await.map_err(db_err)?;

        Ok(QueueHealth {
            project_id,
            stages,
            staffing,
            totals,
            generated_at: now,
        })
    }

    /// Per-role staffing for the project's production roles.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::OrderNotFound` for an unknown project
    /// and `WorkflowError::Database` on query failure.
    pub async fn staffing(&self, project_id: Uuid) -> Result<Vec<StaffingEntry>, WorkflowError> {
        let project = self.get_project(project_id).await?;
        let workflow = convert::workflow_type_to_core(&project.workflow_type);
        let midnight = midnight_utc();

        let mut entries = Vec::new();
        for stage in workflow.stages() {
            let role = stage.role();
            let staff = users::Entity::find()
                .filter(users::Column::ProjectId.eq(project_id))
                .filter(users::Column::Role.eq(convert::role_to_db(role)))
                .filter(users::Column::IsActive.eq(true))
                .all(&self.db)
                .await
                .map_err(db_err)?;

            let mut workers = Vec::with_capacity(staff.len());
            for user in &staff {
                let wip_count = work_items::Entity::find()
                    .filter(work_items::Column::UserId.eq(user.id))
                    .filter(work_items::Column::Status.eq(WorkItemStatus::Assigned))
                    .count(&self.db)
                    .await
                    .map_err(db_err)?;
                let completed_today = work_items::Entity::find()
                    .filter(work_items::Column::UserId.eq(user.id))
                    .filter(work_items::Column::Status.eq(WorkItemStatus::Completed))
                    .filter(work_items::Column::FinishedAt.gte(midnight))
                    .count(&self.db)
                    .await
                    .map_err(db_err)?;
                workers.push(WorkerLoad {
                    user_id: user.id,
                    name: user.name.clone(),
                    wip_count,
                    completed_today,
                });
            }

            let total = staff.len() as u64;
            let active = staff.iter().filter(|u| !u.is_absent).count() as u64;
            entries.push(StaffingEntry {
                role,
                total,
                active,
                absent: total - active,
                workers,
            });
        }

        Ok(entries)
    }

    /// The personal dashboard for one worker.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::RoleNotAllowed` for non-production
    /// roles and `WorkflowError::Database` on query failure.
    pub async fn worker_dashboard(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<WorkerDashboard, WorkflowError> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(WorkflowError::UserNotFound(user_id))?;
        let role = convert::role_to_core(&user.role);
        let stage = role.stage().ok_or(WorkflowError::RoleNotAllowed {
            role: role.to_string(),
            action: "worker dashboard",
        })?;

        let project = self.get_project(project_id).await?;
        let midnight = midnight_utc();

        let current = orders::Entity::find()
            .filter(orders::Column::AssignedTo.eq(user_id))
            .order_by_desc(orders::Column::UpdatedAt)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let wip_count = work_items::Entity::find()
            .filter(work_items::Column::UserId.eq(user_id))
            .filter(work_items::Column::Status.eq(WorkItemStatus::Assigned))
            .count(&self.db)
            .await
            .map_err(db_err)?;

        let completed_today = work_items::Entity::find()
            .filter(work_items::Column::UserId.eq(user_id))
            .filter(work_items::Column::Status.eq(WorkItemStatus::Completed))
            .filter(work_items::Column::FinishedAt.gte(midnight))
            .count(&self.db)
            .await
            .map_err(db_err)?;

        let queue_depth = orders::Entity::find()
            .filter(orders::Column::ProjectId.eq(project_id))
            .filter(orders::Column::WorkflowState.eq(convert::state_to_db(stage.queued_state())))
            .filter(orders::Column::AssignedTo.is_null())
            .count(&self.db)
            .await
            .map_err(db_err)?;

        let daily_target = u64::try_from(user.daily_target).unwrap_or(0);
        Ok(WorkerDashboard {
            current_order_id: current.map(|o| o.id),
            completed_today,
            daily_target,
            progress_percent: sla::progress_percent(completed_today, daily_target),
            queue_depth,
            wip_count,
            wip_cap: u64::try_from(project.wip_cap).unwrap_or(0),
        })
    }

    async fn stage_health(
        &self,
        project_id: Uuid,
        stage: Stage,
        sla_hours: i32,
        now: DateTime<Utc>,
    ) -> Result<StageHealth, DbErr> {
        let queued_rows = orders::Entity::find()
            .filter(orders::Column::ProjectId.eq(project_id))
            .filter(orders::Column::WorkflowState.eq(convert::state_to_db(stage.queued_state())))
            .order_by_asc(orders::Column::QueuedAt)
            .all(&self.db)
            .await?;

        let in_progress = orders::Entity::find()
            .filter(orders::Column::ProjectId.eq(project_id))
            .filter(orders::Column::WorkflowState.eq(convert::state_to_db(stage.in_state())))
            .count(&self.db)
            .await?;

        let queued_times: Vec<DateTime<Utc>> = queued_rows
            .iter()
            .filter_map(|o| o.queued_at.map(Into::into))
            .collect();

        Ok(StageHealth {
            stage,
            queued: queued_rows.len() as u64,
            in_progress,
            oldest_queued_at: queued_times.first().copied(),
            sla_breaches: sla::breach_count(queued_times, now, i64::from(sla_hours)),
        })
    }

    async fn totals(&self, project_id: Uuid) -> Result<ProjectTotals, DbErr> {
        let pending = orders::Entity::find()
            .filter(orders::Column::ProjectId.eq(project_id))
            .filter(orders::Column::WorkflowState.is_not_in([
                convert::state_to_db(WorkflowState::Delivered),
                convert::state_to_db(WorkflowState::Cancelled),
            ]))
            .count(&self.db)
            .await?;

        let delivered_today = orders::Entity::find()
            .filter(orders::Column::ProjectId.eq(project_id))
            .filter(orders::Column::DeliveredAt.gte(midnight_utc()))
            .count(&self.db)
            .await?;

        let on_hold = orders::Entity::find()
            .filter(orders::Column::ProjectId.eq(project_id))
            .filter(orders::Column::WorkflowState.eq(convert::state_to_db(WorkflowState::OnHold)))
            .count(&self.db)
            .await?;

        Ok(ProjectTotals {
            pending,
            delivered_today,
            on_hold,
        })
    }

    async fn get_project(&self, project_id: Uuid) -> Result<projects::Model, WorkflowError> {
        projects::Entity::find_by_id(project_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(WorkflowError::OrderNotFound(project_id))
    }
}

fn midnight_utc() -> DateTime<Utc> {
    Utc::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|t| t.and_utc())
        .unwrap_or_else(Utc::now)
}

fn db_err(e: DbErr) -> WorkflowError {
    WorkflowError::Database(e.to_string())
}
