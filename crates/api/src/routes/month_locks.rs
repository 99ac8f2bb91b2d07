//! Month-lock routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::routes::{error_response, unknown_role_response};
use crate::{AppState, middleware::AuthUser};
use benchmark_core::monthlock::{MonthLockError, Period};
use benchmark_db::MonthLockRepository;

/// Creates the month-lock routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/month-locks/{project_id}", get(list_locks))
        .route("/month-locks/{project_id}/lock", post(lock_period))
        .route("/month-locks/{project_id}/unlock", post(unlock_period))
        .route("/month-locks/{project_id}/counts", get(period_counts))
}

/// Request body naming a billing period.
#[derive(Debug, Deserialize)]
pub struct PeriodRequest {
    /// The period, `YYYY-MM`.
    pub period: String,
}

/// Query parameters naming a billing period.
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    /// The period, `YYYY-MM`.
    pub period: String,
}

fn month_lock_error(e: &MonthLockError) -> Response {
    if matches!(e, MonthLockError::Database(_)) {
        error!(error = %e, "month lock operation failed");
    }
    error_response(e.status_code(), e.error_code(), &e.to_string())
}

fn parse_period(s: &str) -> Result<Period, Response> {
    s.parse::<Period>().map_err(|e| month_lock_error(&e))
}

/// GET `/month-locks/{project_id}` - List a project's lock records.
async fn list_locks(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(project_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = MonthLockRepository::new((*state.db).clone());
    match repo.list(project_id).await {
        Ok(locks) => (StatusCode::OK, Json(json!({ "month_locks": locks }))).into_response(),
        Err(e) => month_lock_error(&e),
    }
}

/// POST `/month-locks/{project_id}/lock` - Lock a period, freezing its
/// production counts.
async fn lock_period(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<PeriodRequest>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };
    let period = match parse_period(&payload.period) {
        Ok(p) => p,
        Err(response) => return response,
    };

    let repo = MonthLockRepository::new((*state.db).clone());
    match repo.lock(project_id, period, auth.user_id(), role).await {
        Ok(lock) => {
            info!(project_id = %project_id, period = %period, "period locked");
            (StatusCode::OK, Json(json!(lock))).into_response()
        }
        Err(e) => month_lock_error(&e),
    }
}

/// POST `/month-locks/{project_id}/unlock` - Unlock a period. The
/// frozen snapshot stays on the record.
async fn unlock_period(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<PeriodRequest>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };
    let period = match parse_period(&payload.period) {
        Ok(p) => p,
        Err(response) => return response,
    };

    let repo = MonthLockRepository::new((*state.db).clone());
    match repo.unlock(project_id, period, auth.user_id(), role).await {
        Ok(lock) => {
            info!(project_id = %project_id, period = %period, "period unlocked");
            (StatusCode::OK, Json(json!(lock))).into_response()
        }
        Err(e) => month_lock_error(&e),
    }
}

/// GET `/month-locks/{project_id}/counts?period=YYYY-MM` - Production
/// counts: frozen when locked, live otherwise.
async fn period_counts(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(project_id): Path<Uuid>,
    Query(query): Query<PeriodQuery>,
) -> impl IntoResponse {
    let period = match parse_period(&query.period) {
        Ok(p) => p,
        Err(response) => return response,
    };

    let repo = MonthLockRepository::new((*state.db).clone());
    match repo.counts(project_id, period).await {
        Ok(counts) => (StatusCode::OK, Json(json!(counts))).into_response(),
        Err(e) => month_lock_error(&e),
    }
}
