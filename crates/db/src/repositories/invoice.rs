//! Invoice repository: the billing pipeline's persistence layer.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use benchmark_core::invoice::{InvoiceError, InvoiceService, InvoiceStatus};
use benchmark_core::workflow::UserRole;

use crate::entities::invoices;
use crate::repositories::convert;

/// Input for creating a draft invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoiceInput {
    /// The project billed.
    pub project_id: Uuid,
    /// Billing period, `YYYY-MM`.
    pub period: String,
    /// Invoice total.
    pub total: Decimal,
    /// ISO currency code.
    pub currency: String,
    /// The user creating the draft.
    pub created_by: Uuid,
}

/// Invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a draft invoice.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::Database` on insert failure.
    pub async fn create(
        &self,
        input: CreateInvoiceInput,
    ) -> Result<invoices::Model, InvoiceError> {
        let now = Utc::now().into();
        let invoice = invoices::ActiveModel {
            id: Set(Uuid::now_v7()),
            project_id: Set(input.project_id),
            invoice_number: Set(None),
            period: Set(input.period),
            status: Set(convert::invoice_status_to_db(InvoiceStatus::Draft)),
            total: Set(input.total),
            currency: Set(input.currency),
            created_by: Set(input.created_by),
            prepared_by: Set(None),
            prepared_at: Set(None),
            approved_by: Set(None),
            approved_at: Set(None),
            issued_by: Set(None),
            issued_at: Set(None),
            sent_by: Set(None),
            sent_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        invoice.insert(&self.db).await.map_err(db_err)
    }

    /// Fetches an invoice or fails with `InvoiceNotFound`.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::InvoiceNotFound` or
    /// `InvoiceError::Database`.
    pub async fn get(&self, invoice_id: Uuid) -> Result<invoices::Model, InvoiceError> {
        invoices::Entity::find_by_id(invoice_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(InvoiceError::InvoiceNotFound(invoice_id))
    }

    /// Lists a project's invoices, newest first.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::Database` on query failure.
    pub async fn list(&self, project_id: Uuid) -> Result<Vec<invoices::Model>, InvoiceError> {
        invoices::Entity::find()
            .filter(invoices::Column::ProjectId.eq(project_id))
            .order_by_desc(invoices::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Moves an invoice to the requested status, stamping the audit
    /// column for that step. Issuing also assigns the invoice number.
    ///
    /// # Errors
    ///
    /// Returns the core validation errors plus
    /// `InvoiceError::Database` on query failure.
    pub async fn transition(
        &self,
        invoice_id: Uuid,
        target: InvoiceStatus,
        actor_id: Uuid,
        actor_role: UserRole,
    ) -> Result<invoices::Model, InvoiceError> {
        let invoice = self.get(invoice_id).await?;
        let current = convert::invoice_status_to_core(&invoice.status);

        let action = InvoiceService::transition(current, target, actor_role, actor_id)?;
        let at = action.transitioned_at.into();

        let mut active: invoices::ActiveModel = invoice.clone().into();
        active.status = Set(convert::invoice_status_to_db(action.new_status));
        active.updated_at = Set(at);
        match action.new_status {
            InvoiceStatus::Prepared => {
                active.prepared_by = Set(Some(action.transitioned_by));
                active.prepared_at = Set(Some(at));
            }
            InvoiceStatus::Approved => {
                active.approved_by = Set(Some(action.transitioned_by));
                active.approved_at = Set(Some(at));
            }
            InvoiceStatus::Issued => {
                let number = self
                    .next_invoice_number(invoice.project_id, &invoice.period)
                    .await?;
                active.invoice_number = Set(Some(number));
                active.issued_by = Set(Some(action.transitioned_by));
                active.issued_at = Set(Some(at));
            }
            InvoiceStatus::Sent => {
                active.sent_by = Set(Some(action.transitioned_by));
                active.sent_at = Set(Some(at));
            }
            InvoiceStatus::Draft => {}
        }

        active.update(&self.db).await.map_err(db_err)
    }

    /// Deletes a draft invoice.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::NotDeletable` for non-draft invoices,
    /// plus `InvoiceError::Database` on query failure.
    pub async fn delete(&self, invoice_id: Uuid) -> Result<(), InvoiceError> {
        let invoice = self.get(invoice_id).await?;
        InvoiceService::check_delete(convert::invoice_status_to_core(&invoice.status))?;

        invoice.delete(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    /// Next sequential number within the project and period, e.g.
    /// `INV-202608-0003`.
    async fn next_invoice_number(
        &self,
        project_id: Uuid,
        period: &str,
    ) -> Result<String, InvoiceError> {
        let issued = invoices::Entity::find()
            .filter(invoices::Column::ProjectId.eq(project_id))
            .filter(invoices::Column::Period.eq(period))
            .filter(invoices::Column::InvoiceNumber.is_not_null())
            .count(&self.db)
            .await
            .map_err(db_err)?;

        Ok(format!(
            "INV-{}-{:04}",
            period.replace('-', ""),
            issued + 1
        ))
    }
}

fn db_err(e: DbErr) -> InvoiceError {
    InvoiceError::Database(e.to_string())
}
