//! Workflow repository for order state transitions.
//!
//! Each operation follows the same shape: fetch the order, validate
//! the transition with the stateless core service, then apply the
//! returned action to the order row and the work item ledger.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use benchmark_core::workflow::{
    Stage, UserRole, WorkflowAction, WorkflowError, WorkflowService,
};

use crate::entities::sea_orm_active_enums::{WorkItemStatus, WorkflowState};
use crate::entities::{orders, work_items};
use crate::repositories::convert;

/// Workflow repository for order state transitions.
#[derive(Debug, Clone)]
pub struct WorkflowRepository {
    db: DatabaseConnection,
}

impl WorkflowRepository {
    /// Creates a new workflow repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Submits the actor's finished work, moving the order to the
    /// next queue or to `APPROVED_QA`.
    ///
    /// Closes the actor's open work item with the pass-through state
    /// and clears any rejection fields carried from a prior rework.
    ///
    /// # Errors
    ///
    /// Returns the core validation errors plus
    /// `WorkflowError::Database` on query failure.
    pub async fn submit(
        &self,
        order_id: Uuid,
        actor_id: Uuid,
        actor_role: UserRole,
        comments: Option<String>,
    ) -> Result<orders::Model, WorkflowError> {
        let order = self.get_order(order_id).await?;

        let workflow = convert::workflow_type_to_core(&order.workflow_type);
        let state = convert::state_to_core(&order.workflow_state);
        let action =
            WorkflowService::submit(workflow, state, actor_role, actor_id, order.assigned_to)?;

        let WorkflowAction::Submit {
            new_state,
            via,
            queued_at,
            submitted_at,
            ..
        } = &action
        else {
            return Err(WorkflowError::Database("unexpected action".to_string()));
        };

        let txn = self.db.begin().await.map_err(db_err)?;
        let now = (*submitted_at).into();

        self.close_open_work_item(
            &txn,
            order_id,
            actor_id,
            WorkItemStatus::Completed,
            Some(convert::state_to_db(*via)),
            comments,
        )
        .await?;

        let approved = *new_state == benchmark_core::workflow::WorkflowState::ApprovedQa;
        let mut active: orders::ActiveModel = order.into();
        active.workflow_state = Set(convert::state_to_db(*new_state));
        active.assigned_to = Set(None);
        active.queued_at = Set(queued_at.map(Into::into));
        active.rejected_by = Set(None);
        active.rejected_at = Set(None);
        active.rejection_type = Set(None);
        active.rejection_reason = Set(None);
        if approved {
            active.completed_at = Set(Some(now));
        }
        active.updated_at = Set(now);
        let updated = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(updated)
    }

    /// Rejects in-progress work back to an earlier stage.
    ///
    /// The rejecter's open work item closes with the pass-through
    /// state; the rejected upstream attempt is re-marked `rejected`
    /// and the order's attempt counter increments.
    ///
    /// # Errors
    ///
    /// Returns the core validation errors plus
    /// `WorkflowError::Database` on query failure.
    pub async fn reject(
        &self,
        order_id: Uuid,
        actor_id: Uuid,
        actor_role: UserRole,
        reason: String,
        code: &str,
        route_to: Option<Stage>,
    ) -> Result<orders::Model, WorkflowError> {
        let order = self.get_order(order_id).await?;

        let workflow = convert::workflow_type_to_core(&order.workflow_type);
        let state = convert::state_to_core(&order.workflow_state);
        let action = WorkflowService::reject(
            workflow,
            state,
            actor_role,
            actor_id,
            order.assigned_to,
            reason,
            code,
            route_to,
        )?;

        let WorkflowAction::Reject {
            new_state,
            via,
            target_stage,
            code,
            reason,
            rejected_by,
            rejected_at,
            ..
        } = &action
        else {
            return Err(WorkflowError::Database("unexpected action".to_string()));
        };

        let txn = self.db.begin().await.map_err(db_err)?;
        let now = (*rejected_at).into();

        self.close_open_work_item(
            &txn,
            order_id,
            actor_id,
            WorkItemStatus::Completed,
            Some(convert::state_to_db(*via)),
            None,
        )
        .await?;

        // Re-mark the most recent completed attempt at the target
        // stage so the ledger shows whose output came back.
        let rejected_item = work_items::Entity::find()
            .filter(work_items::Column::OrderId.eq(order_id))
            .filter(work_items::Column::Stage.eq(target_stage.as_str()))
            .filter(work_items::Column::Status.eq(WorkItemStatus::Completed))
            .order_by_desc(work_items::Column::CreatedAt)
            .one(&txn)
            .await
            .map_err(db_err)?;
        if let Some(item) = rejected_item {
            let mut active: work_items::ActiveModel = item.into();
            active.status = Set(WorkItemStatus::Rejected);
            active.rejection_code = Set(Some(code.as_str().to_string()));
            active.rework_reason = Set(Some(reason.clone()));
            active.update(&txn).await.map_err(db_err)?;
        }

        // The re-entered stage's attempt counter and the lifetime
        // recheck counter both move, never backwards.
        let attempt = convert::stage_attempt(&order, *target_stage) + 1;
        let recheck_count = order.recheck_count + 1;
        let mut active: orders::ActiveModel = order.into();
        active.workflow_state = Set(convert::state_to_db(*new_state));
        active.assigned_to = Set(None);
        active.queued_at = Set(Some(now));
        match target_stage {
            Stage::Draw => active.attempt_draw = Set(attempt),
            Stage::Check => active.attempt_check = Set(attempt),
            Stage::Qa => active.attempt_qa = Set(attempt),
            Stage::Design => active.attempt_design = Set(attempt),
        }
        active.recheck_count = Set(recheck_count);
        active.rejected_by = Set(Some(*rejected_by));
        active.rejected_at = Set(Some(now));
        active.rejection_type = Set(Some(code.as_str().to_string()));
        active.rejection_reason = Set(Some(reason.clone()));
        active.updated_at = Set(now);
        let updated = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(updated)
    }

    /// Places an order on hold, remembering the pre-hold state.
    ///
    /// # Errors
    ///
    /// Returns the core validation errors plus
    /// `WorkflowError::Database` on query failure.
    pub async fn hold(
        &self,
        order_id: Uuid,
        actor_id: Uuid,
        actor_role: UserRole,
        reason: String,
    ) -> Result<orders::Model, WorkflowError> {
        let order = self.get_order(order_id).await?;

        let state = convert::state_to_core(&order.workflow_state);
        let action =
            WorkflowService::hold(state, actor_role, actor_id, order.assigned_to, reason)?;

        let WorkflowAction::Hold {
            previous_state,
            reason,
            held_at,
            ..
        } = &action
        else {
            return Err(WorkflowError::Database("unexpected action".to_string()));
        };

        // The assignee is kept so a resumed order returns to the same
        // worker.
        let mut active: orders::ActiveModel = order.into();
        active.workflow_state = Set(WorkflowState::OnHold);
        active.previous_state = Set(Some(convert::state_to_db(*previous_state)));
        active.hold_reason = Set(Some(reason.clone()));
        active.updated_at = Set((*held_at).into());

        active.update(&self.db).await.map_err(db_err)
    }

    /// Lifts a hold, restoring the pre-hold state.
    ///
    /// # Errors
    ///
    /// Returns the core validation errors plus
    /// `WorkflowError::Database` on query failure.
    pub async fn resume(
        &self,
        order_id: Uuid,
        actor_id: Uuid,
        actor_role: UserRole,
    ) -> Result<orders::Model, WorkflowError> {
        let order = self.get_order(order_id).await?;

        let workflow = convert::workflow_type_to_core(&order.workflow_type);
        let state = convert::state_to_core(&order.workflow_state);
        let previous = order
            .previous_state
            .as_ref()
            .map(convert::state_to_core)
            .ok_or(WorkflowError::NotOnHold)?;
        let action = WorkflowService::resume(workflow, state, previous, actor_role, actor_id)?;

        let WorkflowAction::Resume {
            new_state,
            resumed_at,
            ..
        } = &action
        else {
            return Err(WorkflowError::Database("unexpected action".to_string()));
        };

        let mut active: orders::ActiveModel = order.into();
        active.workflow_state = Set(convert::state_to_db(*new_state));
        active.previous_state = Set(None);
        active.hold_reason = Set(None);
        active.updated_at = Set((*resumed_at).into());

        active.update(&self.db).await.map_err(db_err)
    }

    /// Gives an in-progress order back to its stage queue.
    ///
    /// # Errors
    ///
    /// Returns the core validation errors plus
    /// `WorkflowError::Database` on query failure.
    pub async fn release(
        &self,
        order_id: Uuid,
        actor_id: Uuid,
        actor_role: UserRole,
    ) -> Result<orders::Model, WorkflowError> {
        let order = self.get_order(order_id).await?;

        let workflow = convert::workflow_type_to_core(&order.workflow_type);
        let state = convert::state_to_core(&order.workflow_state);
        let action =
            WorkflowService::release(workflow, state, actor_role, actor_id, order.assigned_to)?;

        let WorkflowAction::Release {
            new_state,
            queued_at,
            ..
        } = &action
        else {
            return Err(WorkflowError::Database("unexpected action".to_string()));
        };

        let txn = self.db.begin().await.map_err(db_err)?;
        let now = (*queued_at).into();

        // Close the ledger entry of whoever held the order; on a
        // management release that is the assignee, not the actor.
        if let Some(assignee) = order.assigned_to {
            self.close_open_work_item(&txn, order_id, assignee, WorkItemStatus::Released, None, None)
                .await?;
        }

        let mut active: orders::ActiveModel = order.into();
        active.workflow_state = Set(convert::state_to_db(*new_state));
        active.assigned_to = Set(None);
        active.queued_at = Set(Some(now));
        active.updated_at = Set(now);
        let updated = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(updated)
    }

    /// Moves an in-progress order to a different worker.
    ///
    /// # Errors
    ///
    /// Returns the core validation errors plus
    /// `WorkflowError::Database` on query failure.
    pub async fn reassign(
        &self,
        order_id: Uuid,
        actor_role: UserRole,
        target_user: Uuid,
        target_role: UserRole,
    ) -> Result<orders::Model, WorkflowError> {
        let order = self.get_order(order_id).await?;

        let workflow = convert::workflow_type_to_core(&order.workflow_type);
        let state = convert::state_to_core(&order.workflow_state);
        let action =
            WorkflowService::reassign(workflow, state, actor_role, target_user, target_role)?;

        let WorkflowAction::Reassign {
            stage,
            assigned_to,
            assigned_at,
            ..
        } = &action
        else {
            return Err(WorkflowError::Database("unexpected action".to_string()));
        };

        let txn = self.db.begin().await.map_err(db_err)?;
        let now = (*assigned_at).into();

        if let Some(previous) = order.assigned_to {
            self.close_open_work_item(&txn, order_id, previous, WorkItemStatus::Released, None, None)
                .await?;
        }

        let item = work_items::ActiveModel {
            id: Set(Uuid::now_v7()),
            order_id: Set(order_id),
            user_id: Set(*assigned_to),
            stage: Set(stage.as_str().to_string()),
            status: Set(WorkItemStatus::Assigned),
            attempt_number: Set(convert::stage_attempt(&order, *stage)),
            recorded_state: Set(None),
            comments: Set(None),
            rejection_code: Set(None),
            rework_reason: Set(None),
            started_at: Set(now),
            finished_at: Set(None),
            created_at: Set(now),
        };
        item.insert(&txn).await.map_err(db_err)?;

        let mut active: orders::ActiveModel = order.into();
        active.assigned_to = Set(Some(*assigned_to));
        active.updated_at = Set(now);
        let updated = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(updated)
    }

    /// Cancels an order from any non-terminal state.
    ///
    /// # Errors
    ///
    /// Returns the core validation errors plus
    /// `WorkflowError::Database` on query failure.
    pub async fn cancel(
        &self,
        order_id: Uuid,
        actor_id: Uuid,
        actor_role: UserRole,
        reason: String,
    ) -> Result<orders::Model, WorkflowError> {
        let order = self.get_order(order_id).await?;

        let state = convert::state_to_core(&order.workflow_state);
        let action = WorkflowService::cancel(state, actor_role, actor_id, reason)?;

        let WorkflowAction::Cancel {
            new_state,
            reason,
            cancelled_at,
            ..
        } = &action
        else {
            return Err(WorkflowError::Database("unexpected action".to_string()));
        };

        let txn = self.db.begin().await.map_err(db_err)?;
        let now = (*cancelled_at).into();

        if let Some(assignee) = order.assigned_to {
            self.close_open_work_item(&txn, order_id, assignee, WorkItemStatus::Released, None, None)
                .await?;
        }

        let mut active: orders::ActiveModel = order.into();
        active.workflow_state = Set(convert::state_to_db(*new_state));
        active.assigned_to = Set(None);
        active.cancel_reason = Set(Some(reason.clone()));
        active.updated_at = Set(now);
        let updated = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(updated)
    }

    /// Delivers a QA-approved order.
    ///
    /// # Errors
    ///
    /// Returns the core validation errors plus
    /// `WorkflowError::Database` on query failure.
    pub async fn deliver(
        &self,
        order_id: Uuid,
        actor_id: Uuid,
        actor_role: UserRole,
    ) -> Result<orders::Model, WorkflowError> {
        let order = self.get_order(order_id).await?;

        let state = convert::state_to_core(&order.workflow_state);
        let action = WorkflowService::deliver(state, actor_role, actor_id)?;

        let WorkflowAction::Deliver {
            new_state,
            delivered_at,
            ..
        } = &action
        else {
            return Err(WorkflowError::Database("unexpected action".to_string()));
        };

        let now = (*delivered_at).into();
        let mut active: orders::ActiveModel = order.into();
        active.workflow_state = Set(convert::state_to_db(*new_state));
        active.delivered_at = Set(Some(now));
        active.updated_at = Set(now);

        active.update(&self.db).await.map_err(db_err)
    }

    async fn get_order(&self, order_id: Uuid) -> Result<orders::Model, WorkflowError> {
        orders::Entity::find_by_id(order_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(WorkflowError::OrderNotFound(order_id))
    }

    /// Finishes the user's open work item on an order, if one exists.
    async fn close_open_work_item<C: ConnectionTrait>(
        &self,
        conn: &C,
        order_id: Uuid,
        user_id: Uuid,
        status: WorkItemStatus,
        recorded_state: Option<WorkflowState>,
        comments: Option<String>,
    ) -> Result<(), WorkflowError> {
        let open = work_items::Entity::find()
            .filter(work_items::Column::OrderId.eq(order_id))
            .filter(work_items::Column::UserId.eq(user_id))
            .filter(work_items::Column::Status.eq(WorkItemStatus::Assigned))
            .order_by_desc(work_items::Column::StartedAt)
            .one(conn)
            .await
            .map_err(db_err)?;

        if let Some(item) = open {
            let mut active: work_items::ActiveModel = item.into();
            active.status = Set(status);
            active.recorded_state = Set(recorded_state);
            if comments.is_some() {
                active.comments = Set(comments);
            }
            active.finished_at = Set(Some(Utc::now().into()));
            active.update(conn).await.map_err(db_err)?;
        }
        Ok(())
    }
}

fn db_err(e: DbErr) -> WorkflowError {
    WorkflowError::Database(e.to_string())
}
