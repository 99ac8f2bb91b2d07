//! Order repository: creation, intake and queries.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use benchmark_core::workflow::{WorkflowError, WorkflowService};
use benchmark_shared::types::PageRequest;

use crate::entities::sea_orm_active_enums::{OrderPriority, WorkflowState};
use crate::entities::{orders, projects, work_items};
use crate::repositories::convert;

/// Input for creating an order.
#[derive(Debug, Clone)]
pub struct CreateOrderInput {
    /// The project the order belongs to.
    pub project_id: Uuid,
    /// Optional team the order is earmarked for.
    pub team_id: Option<Uuid>,
    /// Client-facing order number; unique.
    pub order_number: String,
    /// Order priority.
    pub priority: OrderPriority,
    /// Client deadline, if any.
    pub due_date: Option<chrono::DateTime<Utc>>,
    /// Free-form metadata from intake.
    pub metadata: Option<serde_json::Value>,
}

/// Filters for order listings.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Restrict to one workflow state.
    pub state: Option<WorkflowState>,
    /// Restrict to one priority.
    pub priority: Option<OrderPriority>,
    /// Restrict to one assignee.
    pub assigned_to: Option<Uuid>,
}

/// Order repository.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    db: DatabaseConnection,
}

impl OrderRepository {
    /// Creates a new order repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an order in `RECEIVED`, copying the topology from the
    /// project.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Database` on query failure and
    /// `WorkflowError::OrderNotFound` if the project does not exist.
    pub async fn create(&self, input: CreateOrderInput) -> Result<orders::Model, WorkflowError> {
        let project = projects::Entity::find_by_id(input.project_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(WorkflowError::OrderNotFound(input.project_id))?;

        let now = Utc::now().into();
        let order = orders::ActiveModel {
            id: Set(Uuid::now_v7()),
            project_id: Set(input.project_id),
            team_id: Set(input.team_id),
            order_number: Set(input.order_number),
            workflow_type: Set(project.workflow_type),
            workflow_state: Set(WorkflowState::Received),
            priority: Set(input.priority),
            assigned_to: Set(None),
            queued_at: Set(None),
            previous_state: Set(None),
            hold_reason: Set(None),
            attempt_draw: Set(0),
            attempt_check: Set(0),
            attempt_qa: Set(0),
            attempt_design: Set(0),
            recheck_count: Set(0),
            rejected_by: Set(None),
            rejected_at: Set(None),
            rejection_type: Set(None),
            rejection_reason: Set(None),
            cancel_reason: Set(None),
            received_at: Set(now),
            started_at: Set(None),
            completed_at: Set(None),
            delivered_at: Set(None),
            due_date: Set(input.due_date.map(Into::into)),
            metadata: Set(input.metadata),
            created_at: Set(now),
            updated_at: Set(now),
        };

        order.insert(&self.db).await.map_err(db_err)
    }

    /// Accepts a received order into production, queueing it for the
    /// first stage of its topology.
    ///
    /// # Errors
    ///
    /// Returns the core validation errors plus
    /// `WorkflowError::Database` on query failure.
    pub async fn receive(&self, order_id: Uuid) -> Result<orders::Model, WorkflowError> {
        let order = self.get(order_id).await?;

        let workflow = convert::workflow_type_to_core(&order.workflow_type);
        let state = convert::state_to_core(&order.workflow_state);
        let action = WorkflowService::receive(workflow, state)?;

        let now = Utc::now().into();
        let mut active: orders::ActiveModel = order.into();
        active.workflow_state = Set(convert::state_to_db(action.new_state()));
        active.queued_at = Set(Some(now));
        active.updated_at = Set(now);

        active.update(&self.db).await.map_err(db_err)
    }

    /// Fetches an order or fails with `OrderNotFound`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::OrderNotFound` or
    /// `WorkflowError::Database`.
    pub async fn get(&self, order_id: Uuid) -> Result<orders::Model, WorkflowError> {
        orders::Entity::find_by_id(order_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(WorkflowError::OrderNotFound(order_id))
    }

    /// Lists a project's orders, filtered and paginated, newest first.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Database` on query failure.
    pub async fn list(
        &self,
        project_id: Uuid,
        filter: &OrderFilter,
        page: &PageRequest,
    ) -> Result<(Vec<orders::Model>, u64), WorkflowError> {
        let mut query = orders::Entity::find()
            .filter(orders::Column::ProjectId.eq(project_id));

        if let Some(state) = &filter.state {
            query = query.filter(orders::Column::WorkflowState.eq(state.clone()));
        }
        if let Some(priority) = &filter.priority {
            query = query.filter(orders::Column::Priority.eq(priority.clone()));
        }
        if let Some(assignee) = filter.assigned_to {
            query = query.filter(orders::Column::AssignedTo.eq(assignee));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let rows = query
            .order_by_desc(orders::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok((rows, total))
    }

    /// Lists an order's work item ledger, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Database` on query failure.
    pub async fn work_items(&self, order_id: Uuid) -> Result<Vec<work_items::Model>, WorkflowError> {
        // Surface OrderNotFound rather than an empty ledger.
        let _ = self.get(order_id).await?;

        work_items::Entity::find()
            .filter(work_items::Column::OrderId.eq(order_id))
            .order_by_asc(work_items::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)
    }
}

fn db_err(e: DbErr) -> WorkflowError {
    WorkflowError::Database(e.to_string())
}
