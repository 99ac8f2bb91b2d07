//! `SeaORM` entity definitions.

pub mod invoices;
pub mod month_locks;
pub mod orders;
pub mod projects;
pub mod sea_orm_active_enums;
pub mod teams;
pub mod users;
pub mod work_items;
