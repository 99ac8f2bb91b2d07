//! Dashboard routes: queue health, staffing and the worker view.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::routes::{error_response, missing_project_response};
use crate::{AppState, middleware::AuthUser};
use benchmark_core::workflow::WorkflowError;
use benchmark_db::DashboardRepository;

/// Creates the dashboard routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/workflow/{project_id}/queue-health", get(queue_health))
        .route("/workflow/{project_id}/staffing", get(staffing))
        .route("/dashboard/worker", get(worker_dashboard))
}

fn dashboard_error(e: &WorkflowError) -> axum::response::Response {
    if matches!(e, WorkflowError::Database(_)) {
        error!(error = %e, "dashboard aggregation failed");
    }
    error_response(e.status_code(), e.error_code(), &e.to_string())
}

/// GET `/workflow/{project_id}/queue-health` - Per-stage queue health
/// with staffing and project totals.
async fn queue_health(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(project_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = DashboardRepository::new((*state.db).clone());
    match repo.queue_health(project_id).await {
        Ok(health) => (StatusCode::OK, Json(json!(health))).into_response(),
        Err(e) => dashboard_error(&e),
    }
}

/// GET `/workflow/{project_id}/staffing` - Per-role staffing with
/// per-worker load.
async fn staffing(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(project_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = DashboardRepository::new((*state.db).clone());
    match repo.staffing(project_id).await {
        Ok(entries) => (StatusCode::OK, Json(json!({ "staffing": entries }))).into_response(),
        Err(e) => dashboard_error(&e),
    }
}

/// GET `/dashboard/worker` - The actor's personal dashboard.
async fn worker_dashboard(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let Some(project_id) = auth.project_id() else {
        return missing_project_response();
    };

    let repo = DashboardRepository::new((*state.db).clone());
    match repo.worker_dashboard(project_id, auth.user_id()).await {
        Ok(dashboard) => (StatusCode::OK, Json(json!(dashboard))).into_response(),
        Err(e) => dashboard_error(&e),
    }
}
