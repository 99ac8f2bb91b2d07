//! Pull-based assignment: start-next and the worker's own views.
//!
//! The claim itself is a conditional update gated on the order still
//! being queued and unassigned, retried down the ranked candidate
//! list so two workers pulling at once never receive the same order.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use benchmark_core::assignment::{
    AssignmentEngine, AssignmentError, CandidateOrder, WorkerContext,
};
use benchmark_core::workflow::{Stage, WorkflowState};

use crate::entities::sea_orm_active_enums::WorkItemStatus;
use crate::entities::{orders, projects, users, work_items};
use crate::repositories::convert;

/// Queue snapshot size per claim round. Large enough that a burst of
/// simultaneous pulls still finds an unclaimed candidate.
const CLAIM_BATCH: u64 = 20;

/// Fresh-snapshot rounds before the pull reports an empty queue.
const CLAIM_ROUNDS: usize = 3;

/// A successful start-next claim.
#[derive(Debug, Clone)]
pub struct StartNextResult {
    /// The claimed order, now in progress.
    pub order: orders::Model,
    /// The ledger entry opened for this attempt.
    pub work_item: work_items::Model,
}

/// A worker's personal production counters.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MyStats {
    /// Orders currently in progress.
    pub wip_count: u64,
    /// Work items completed since midnight UTC.
    pub completed_today: u64,
    /// The worker's own attempts that came back rejected, lifetime.
    pub rejected_total: u64,
    /// The worker's configured daily target.
    pub daily_target: i32,
}

/// Repository for the start-next flow and worker self-service views.
#[derive(Debug, Clone)]
pub struct AssignmentRepository {
    db: DatabaseConnection,
}

impl AssignmentRepository {
    /// Creates a new assignment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Claims the worker's next order from their stage queue.
    ///
    /// A lost claim race is handled here: when every candidate in a
    /// snapshot was taken by other workers first, the loop takes a
    /// fresh snapshot and keeps pulling, so callers only ever see an
    /// assignment or an empty queue.
    ///
    /// # Errors
    ///
    /// Returns `NotAProductionRole`, `WipCapExceeded`,
    /// `NoOrderAvailable`, or `Database`.
    pub async fn start_next(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<StartNextResult, AssignmentError> {
        let (worker, _) = self.load_worker(project_id, user_id).await?;
        let stage = AssignmentEngine::admit(&worker)?;
        let queued_state = convert::state_to_db(stage.queued_state());

        for _ in 0..CLAIM_ROUNDS {
            let snapshot = orders::Entity::find()
                .filter(orders::Column::ProjectId.eq(project_id))
                .filter(orders::Column::WorkflowState.eq(queued_state.clone()))
                .filter(orders::Column::AssignedTo.is_null())
                .order_by_desc(orders::Column::Priority)
                .order_by_asc(orders::Column::QueuedAt)
                .order_by_asc(orders::Column::Id)
                .limit(CLAIM_BATCH)
                .all(&self.db)
                .await
                .map_err(db_err)?;

            let candidates: Vec<CandidateOrder> = snapshot
                .iter()
                .filter_map(|o| {
                    o.queued_at.map(|queued_at| CandidateOrder {
                        id: o.id,
                        priority: convert::priority_to_core(&o.priority),
                        queued_at: queued_at.into(),
                    })
                })
                .collect();

            let ranked = AssignmentEngine::decide(&worker, candidates)?;

            if let Some(result) = self.try_claim(&ranked, stage, user_id, &queued_state).await? {
                return Ok(result);
            }
            // Every candidate went to another worker; re-snapshot.
        }

        Err(AssignmentError::NoOrderAvailable)
    }

    /// Walks the ranked candidates with conditional updates until one
    /// claim sticks. `None` means the whole batch was lost to
    /// concurrent claimers.
    async fn try_claim(
        &self,
        ranked: &[CandidateOrder],
        stage: Stage,
        user_id: Uuid,
        queued_state: &crate::entities::sea_orm_active_enums::WorkflowState,
    ) -> Result<Option<StartNextResult>, AssignmentError> {
        for candidate in ranked {
            let now = Utc::now();
            // Conditional claim: only wins if the order is still
            // queued and unassigned when this update lands.
            let claim = orders::Entity::update_many()
                .col_expr(
                    orders::Column::WorkflowState,
                    sea_orm::sea_query::Expr::value(convert::state_to_db(stage.in_state())),
                )
                .col_expr(
                    orders::Column::AssignedTo,
                    sea_orm::sea_query::Expr::value(user_id),
                )
                .col_expr(
                    orders::Column::StartedAt,
                    sea_orm::sea_query::Expr::value(now),
                )
                .col_expr(
                    orders::Column::UpdatedAt,
                    sea_orm::sea_query::Expr::value(now),
                )
                .filter(orders::Column::Id.eq(candidate.id))
                .filter(orders::Column::WorkflowState.eq(queued_state.clone()))
                .filter(orders::Column::AssignedTo.is_null())
                .exec(&self.db)
                .await
                .map_err(db_err)?;

            if claim.rows_affected == 1 {
                let order = orders::Entity::find_by_id(candidate.id)
                    .one(&self.db)
                    .await
                    .map_err(db_err)?
                    .ok_or_else(|| {
                        AssignmentError::Database("claimed order vanished".to_string())
                    })?;

                let item = work_items::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    order_id: Set(candidate.id),
                    user_id: Set(user_id),
                    stage: Set(stage.as_str().to_string()),
                    status: Set(WorkItemStatus::Assigned),
                    attempt_number: Set(convert::stage_attempt(&order, stage)),
                    recorded_state: Set(None),
                    comments: Set(None),
                    rejection_code: Set(None),
                    rework_reason: Set(None),
                    started_at: Set(now.into()),
                    finished_at: Set(None),
                    created_at: Set(now.into()),
                }
                .insert(&self.db)
                .await
                .map_err(db_err)?;

                return Ok(Some(StartNextResult {
                    order,
                    work_item: item,
                }));
            }
        }

        Ok(None)
    }

    /// The worker's orders currently in progress, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `AssignmentError::Database` on query failure.
    pub async fn my_current(&self, user_id: Uuid) -> Result<Vec<orders::Model>, AssignmentError> {
        orders::Entity::find()
            .filter(orders::Column::AssignedTo.eq(user_id))
            .order_by_desc(orders::Column::UpdatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// The queue the worker would pull from, in claim order.
    ///
    /// # Errors
    ///
    /// Returns `NotAProductionRole` or `Database`.
    pub async fn my_queue(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<orders::Model>, AssignmentError> {
        let (_, stage) = self.load_worker(project_id, user_id).await?;

        orders::Entity::find()
            .filter(orders::Column::ProjectId.eq(project_id))
            .filter(orders::Column::WorkflowState.eq(convert::state_to_db(stage.queued_state())))
            .filter(orders::Column::AssignedTo.is_null())
            .order_by_desc(orders::Column::Priority)
            .order_by_asc(orders::Column::QueuedAt)
            .order_by_asc(orders::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// The worker's personal counters.
    ///
    /// # Errors
    ///
    /// Returns `AssignmentError::Database` on query failure.
    pub async fn my_stats(&self, user_id: Uuid) -> Result<MyStats, AssignmentError> {
        let user = self.find_user(user_id).await?;

        let wip_count = work_items::Entity::find()
            .filter(work_items::Column::UserId.eq(user_id))
            .filter(work_items::Column::Status.eq(WorkItemStatus::Assigned))
            .count(&self.db)
            .await
            .map_err(db_err)?;

        let midnight = Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|t| t.and_utc())
            .unwrap_or_else(Utc::now);
        let completed_today = work_items::Entity::find()
            .filter(work_items::Column::UserId.eq(user_id))
            .filter(work_items::Column::Status.eq(WorkItemStatus::Completed))
            .filter(work_items::Column::FinishedAt.gte(midnight))
            .count(&self.db)
            .await
            .map_err(db_err)?;

        let rejected_total = work_items::Entity::find()
            .filter(work_items::Column::UserId.eq(user_id))
            .filter(work_items::Column::Status.eq(WorkItemStatus::Rejected))
            .count(&self.db)
            .await
            .map_err(db_err)?;

        Ok(MyStats {
            wip_count,
            completed_today,
            rejected_total,
            daily_target: user.daily_target,
        })
    }

    async fn find_user(&self, user_id: Uuid) -> Result<users::Model, AssignmentError> {
        users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AssignmentError::Database(format!("user {user_id} not found")))
    }

    /// Builds the worker context from the user, project and current
    /// WIP, and resolves the stage queue for their role.
    async fn load_worker(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<(WorkerContext, Stage), AssignmentError> {
        let user = self.find_user(user_id).await?;
        let role = convert::role_to_core(&user.role);
        let stage = role
            .stage()
            .ok_or_else(|| AssignmentError::NotAProductionRole(role.to_string()))?;

        let project = projects::Entity::find_by_id(project_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AssignmentError::Database(format!("project {project_id} not found")))?;

        // WIP is derived from the live order rows, never cached:
        // assigned to this worker and actively in progress.
        let wip_count = orders::Entity::find()
            .filter(orders::Column::ProjectId.eq(project_id))
            .filter(orders::Column::AssignedTo.eq(user_id))
            .filter(orders::Column::WorkflowState.is_in([
                convert::state_to_db(WorkflowState::InDraw),
                convert::state_to_db(WorkflowState::InCheck),
                convert::state_to_db(WorkflowState::InQa),
                convert::state_to_db(WorkflowState::InDesign),
            ]))
            .count(&self.db)
            .await
            .map_err(db_err)?;

        let worker = WorkerContext {
            user_id,
            role,
            wip_count: u32::try_from(wip_count).unwrap_or(u32::MAX),
            wip_cap: u32::try_from(project.wip_cap).unwrap_or(0),
        };
        Ok((worker, stage))
    }
}

fn db_err(e: DbErr) -> AssignmentError {
    AssignmentError::Database(e.to_string())
}
