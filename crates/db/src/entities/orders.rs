//! `SeaORM` Entity for orders table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{OrderPriority, WorkflowState, WorkflowType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub team_id: Option<Uuid>,
    #[sea_orm(unique)]
    pub order_number: String,
    /// Copied from the project at creation; never changes afterwards.
    pub workflow_type: WorkflowType,
    pub workflow_state: WorkflowState,
    pub priority: OrderPriority,
    pub assigned_to: Option<Uuid>,
    /// When the order entered its current queue. Cleared while in progress.
    pub queued_at: Option<DateTimeWithTimeZone>,
    /// The pre-hold state, present only while on hold.
    pub previous_state: Option<WorkflowState>,
    pub hold_reason: Option<String>,
    /// Times each stage was entered after a rejection. Never decrease.
    pub attempt_draw: i32,
    pub attempt_check: i32,
    pub attempt_qa: i32,
    pub attempt_design: i32,
    /// Total rejections over the order's lifetime. Never decreases.
    pub recheck_count: i32,
    /// Latest rejection, cleared together when the reworked stage is
    /// next submitted.
    pub rejected_by: Option<Uuid>,
    pub rejected_at: Option<DateTimeWithTimeZone>,
    pub rejection_type: Option<String>,
    pub rejection_reason: Option<String>,
    pub cancel_reason: Option<String>,
    pub received_at: DateTimeWithTimeZone,
    /// When the current (or last) claim happened.
    pub started_at: Option<DateTimeWithTimeZone>,
    /// When QA approved the order.
    pub completed_at: Option<DateTimeWithTimeZone>,
    pub delivered_at: Option<DateTimeWithTimeZone>,
    pub due_date: Option<DateTimeWithTimeZone>,
    pub metadata: Option<Json>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Projects,
    #[sea_orm(
        belongs_to = "super::teams::Entity",
        from = "Column::TeamId",
        to = "super::teams::Column::Id"
    )]
    Teams,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AssignedTo",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::work_items::Entity")]
    WorkItems,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl Related<super::work_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
