//! User routes: attendance management.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::routes::{error_response, unknown_role_response};
use crate::{AppState, middleware::AuthUser};
use benchmark_db::UserRepository;

/// Creates the user routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/users/{id}/absence", post(set_absence))
}

/// Request body for marking a worker absent or present.
#[derive(Debug, Deserialize)]
pub struct AbsenceRequest {
    /// True marks the worker absent; false marks them back in.
    pub is_absent: bool,
}

/// POST `/users/{id}/absence` - Toggle a worker's attendance flag.
///
/// Absent workers are excluded from the staffing view's active count
/// but keep any orders already assigned to them.
async fn set_absence(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AbsenceRequest>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };
    if !role.is_management() {
        return error_response(403, "ROLE_NOT_ALLOWED", "Only management can update attendance");
    }

    let repo = UserRepository::new((*state.db).clone());
    match repo.set_absence(id, payload.is_absent).await {
        Ok(Some(user)) => {
            info!(user_id = %id, is_absent = payload.is_absent, "attendance updated");
            (
                StatusCode::OK,
                Json(json!({
                    "id": user.id,
                    "name": user.name,
                    "is_absent": user.is_absent,
                })),
            )
                .into_response()
        }
        Ok(None) => error_response(404, "USER_NOT_FOUND", "User not found"),
        Err(e) => {
            error!(error = %e, "attendance update failed");
            error_response(500, "DATABASE_ERROR", "An error occurred")
        }
    }
}
