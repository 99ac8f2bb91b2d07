//! API route definitions.

use axum::{Json, Router, http::StatusCode, middleware, response::IntoResponse, response::Response};
use serde_json::json;

use crate::{AppState, middleware::auth::auth_middleware};

pub mod dashboard;
pub mod health;
pub mod invoices;
pub mod month_locks;
pub mod users;
pub mod workflow;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(workflow::routes())
        .merge(dashboard::routes())
        .merge(invoices::routes())
        .merge(month_locks::routes())
        .merge(users::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new().merge(health::routes()).merge(protected_routes)
}

/// Builds an error response from a status code, error code and message.
pub(crate) fn error_response(status: u16, code: &str, message: &str) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": code, "message": message }))).into_response()
}

/// 403 response for actors whose role claim is missing or unknown.
pub(crate) fn unknown_role_response() -> Response {
    error_response(403, "UNKNOWN_ROLE", "Token does not carry a known role")
}

/// 400 response for requests that need a project id but have none in
/// the token or the path.
pub(crate) fn missing_project_response() -> Response {
    error_response(400, "MISSING_PROJECT", "No project associated with this request")
}
