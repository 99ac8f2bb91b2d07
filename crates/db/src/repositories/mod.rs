//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//!
//! Every workflow repository follows the same shape: fetch the row,
//! validate the transition with the stateless core service, then
//! apply the returned action to the active model.

pub mod assignment;
pub mod convert;
pub mod dashboard;
pub mod invoice;
pub mod month_lock;
pub mod order;
pub mod user;
pub mod workflow;

pub use assignment::{AssignmentRepository, MyStats, StartNextResult};
pub use dashboard::DashboardRepository;
pub use invoice::{CreateInvoiceInput, InvoiceRepository};
pub use month_lock::MonthLockRepository;
pub use order::{CreateOrderInput, OrderFilter, OrderRepository};
pub use user::UserRepository;
pub use workflow::WorkflowRepository;
