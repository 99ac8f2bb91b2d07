//! `SeaORM` Entity for work items.
//!
//! One row per worker attempt at one stage of one order; the rows
//! form the order's audit ledger, including the pass-through states
//! the order itself never persists.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{WorkItemStatus, WorkflowState};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "work_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub user_id: Uuid,
    /// The stage worked: draw, check, qa or design.
    pub stage: String,
    pub status: WorkItemStatus,
    /// Equals the order's attempt counter for this stage at creation.
    pub attempt_number: i32,
    /// The state the transition routed through (SUBMITTED_X, REJECTED_BY_X).
    pub recorded_state: Option<WorkflowState>,
    /// Worker-entered notes carried on submit.
    pub comments: Option<String>,
    pub rejection_code: Option<String>,
    pub rework_reason: Option<String>,
    pub started_at: DateTimeWithTimeZone,
    pub finished_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id"
    )]
    Orders,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
