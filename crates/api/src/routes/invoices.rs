//! Invoice routes for the billing pipeline.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::routes::{error_response, missing_project_response, unknown_role_response};
use crate::{AppState, middleware::AuthUser};
use benchmark_core::invoice::{InvoiceError, InvoiceStatus};
use benchmark_db::{InvoiceRepository, repositories::invoice::CreateInvoiceInput};

/// Creates the invoice routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices))
        .route("/invoices", post(create_invoice))
        .route("/invoices/{id}", get(get_invoice))
        .route("/invoices/{id}/transition", post(transition_invoice))
        .route("/invoices/{id}", delete(delete_invoice))
}

/// Request body for creating a draft invoice.
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    /// The project billed; defaults to the actor's project.
    pub project_id: Option<Uuid>,
    /// Billing period, `YYYY-MM`.
    pub period: String,
    /// Invoice total.
    pub total: Decimal,
    /// ISO currency code; defaults to USD.
    pub currency: Option<String>,
}

/// Request body for an invoice transition.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    /// Target status: prepared, approved, issued or sent.
    pub to: String,
}

/// Query parameters for invoice listings.
#[derive(Debug, Deserialize)]
pub struct ListInvoicesQuery {
    /// The project to list; defaults to the actor's project.
    pub project_id: Option<Uuid>,
}

fn invoice_error(e: &InvoiceError) -> Response {
    if matches!(e, InvoiceError::Database(_)) {
        error!(error = %e, "invoice operation failed");
    }
    error_response(e.status_code(), e.error_code(), &e.to_string())
}

fn parse_status(s: &str) -> Option<InvoiceStatus> {
    match s {
        "draft" => Some(InvoiceStatus::Draft),
        "prepared" => Some(InvoiceStatus::Prepared),
        "approved" => Some(InvoiceStatus::Approved),
        "issued" => Some(InvoiceStatus::Issued),
        "sent" => Some(InvoiceStatus::Sent),
        _ => None,
    }
}

/// GET `/invoices` - List a project's invoices.
async fn list_invoices(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListInvoicesQuery>,
) -> impl IntoResponse {
    let Some(project_id) = query.project_id.or(auth.project_id()) else {
        return missing_project_response();
    };

    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.list(project_id).await {
        Ok(invoices) => (StatusCode::OK, Json(json!({ "invoices": invoices }))).into_response(),
        Err(e) => invoice_error(&e),
    }
}

/// POST `/invoices` - Create a draft invoice.
async fn create_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateInvoiceRequest>,
) -> impl IntoResponse {
    let Some(project_id) = payload.project_id.or(auth.project_id()) else {
        return missing_project_response();
    };
    if payload.period.parse::<benchmark_core::monthlock::Period>().is_err() {
        return error_response(400, "INVALID_PERIOD", "Period must be YYYY-MM");
    }

    let repo = InvoiceRepository::new((*state.db).clone());
    let input = CreateInvoiceInput {
        project_id,
        period: payload.period,
        total: payload.total,
        currency: payload.currency.unwrap_or_else(|| "USD".to_string()),
        created_by: auth.user_id(),
    };
    match repo.create(input).await {
        Ok(invoice) => {
            info!(invoice_id = %invoice.id, period = %invoice.period, "invoice drafted");
            (StatusCode::CREATED, Json(json!(invoice))).into_response()
        }
        Err(e) => invoice_error(&e),
    }
}

/// GET `/invoices/{id}` - Fetch one invoice.
async fn get_invoice(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(invoice) => (StatusCode::OK, Json(json!(invoice))).into_response(),
        Err(e) => invoice_error(&e),
    }
}

/// POST `/invoices/{id}/transition` - Move an invoice one step along
/// the pipeline.
async fn transition_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransitionRequest>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };
    let Some(target) = parse_status(&payload.to) else {
        return error_response(400, "INVALID_STATUS", "Unknown invoice status");
    };

    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.transition(id, target, auth.user_id(), role).await {
        Ok(invoice) => {
            info!(invoice_id = %id, status = %payload.to, "invoice transitioned");
            (StatusCode::OK, Json(json!(invoice))).into_response()
        }
        Err(e) => invoice_error(&e),
    }
}

/// DELETE `/invoices/{id}` - Delete a draft invoice.
async fn delete_invoice(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.delete(id).await {
        Ok(()) => {
            info!(invoice_id = %id, "draft invoice deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => invoice_error(&e),
    }
}
