//! Workflow routes: intake, transitions and the start-next flow.

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

use crate::routes::{error_response, missing_project_response, unknown_role_response};
use crate::{AppState, middleware::AuthUser};
use benchmark_core::assignment::AssignmentError;
use benchmark_core::workflow::{Priority, Stage, WorkflowError};
use benchmark_db::{
    AssignmentRepository, OrderRepository, WorkflowRepository,
    entities::orders,
    repositories::convert,
    repositories::order::{CreateOrderInput, OrderFilter},
};
use benchmark_shared::types::PageRequest;

/// Creates the workflow routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/workflow/start-next", post(start_next))
        .route("/workflow/my-current", get(my_current))
        .route("/workflow/my-queue", get(my_queue))
        .route("/workflow/my-stats", get(my_stats))
        .route("/workflow/orders", post(create_order))
        .route("/workflow/receive", post(receive_order))
        .route("/workflow/orders/{id}", get(get_order))
        .route("/workflow/orders/{id}/submit", post(submit_order))
        .route("/workflow/orders/{id}/reject", post(reject_order))
        .route("/workflow/orders/{id}/hold", post(hold_order))
        .route("/workflow/orders/{id}/resume", post(resume_order))
        .route("/workflow/orders/{id}/reassign-queue", post(release_order))
        .route("/workflow/orders/{id}/reassign", post(reassign_order))
        .route("/workflow/orders/{id}/cancel", post(cancel_order))
        .route("/workflow/orders/{id}/deliver", post(deliver_order))
        .route("/workflow/work-items/{order_id}", get(list_work_items))
        .route("/workflow/{project_id}/orders", get(list_orders))
}

/// Request body for creating an order.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// The project the order belongs to.
    pub project_id: Uuid,
    /// Optional team the order is earmarked for.
    pub team_id: Option<Uuid>,
    /// Client-facing order number.
    pub order_number: String,
    /// Priority; defaults to normal.
    pub priority: Option<String>,
    /// Client deadline, if any.
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    /// Free-form intake metadata.
    pub metadata: Option<serde_json::Value>,
}

/// Request body for submitting finished work.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    /// Worker notes recorded on the closed work item.
    pub comments: Option<String>,
}

/// Request body for accepting an order into production.
#[derive(Debug, Deserialize)]
pub struct ReceiveOrderRequest {
    /// The order to accept.
    pub order_id: Uuid,
}

/// Request body for rejecting work.
#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    /// Why the work came back; at least ten characters.
    pub reason: String,
    /// One of the fixed rejection codes.
    pub code: String,
    /// Optional explicit rework stage; defaults to the previous stage.
    pub route_to: Option<String>,
}

/// Request body carrying a free-form reason.
#[derive(Debug, Deserialize)]
pub struct ReasonRequest {
    /// The reason given by the actor.
    pub reason: String,
}

/// Request body for reassigning an order to a named worker.
#[derive(Debug, Deserialize)]
pub struct ReassignRequest {
    /// The worker receiving the order.
    pub target_user_id: Uuid,
    /// Why the order is moving.
    pub reason: String,
}

/// Query filters for order listings.
#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    /// Restrict to one workflow state.
    pub state: Option<String>,
    /// Restrict to one priority.
    pub priority: Option<String>,
    /// Restrict to one assignee.
    pub assigned_to: Option<Uuid>,
    /// Page number, 1-based.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

fn order_json(order: &orders::Model) -> serde_json::Value {
    json!({
        "id": order.id,
        "project_id": order.project_id,
        "order_number": order.order_number,
        "workflow_type": order.workflow_type,
        "workflow_state": order.workflow_state,
        "priority": order.priority,
        "assigned_to": order.assigned_to,
        "queued_at": order.queued_at,
        "previous_state": order.previous_state,
        "hold_reason": order.hold_reason,
        "team_id": order.team_id,
        "attempt_draw": order.attempt_draw,
        "attempt_check": order.attempt_check,
        "attempt_qa": order.attempt_qa,
        "attempt_design": order.attempt_design,
        "recheck_count": order.recheck_count,
        "rejected_by": order.rejected_by,
        "rejected_at": order.rejected_at,
        "rejection_type": order.rejection_type,
        "rejection_reason": order.rejection_reason,
        "received_at": order.received_at,
        "started_at": order.started_at,
        "completed_at": order.completed_at,
        "delivered_at": order.delivered_at,
        "due_date": order.due_date,
        "metadata": order.metadata,
    })
}

fn workflow_error(e: &WorkflowError) -> Response {
    if matches!(e, WorkflowError::Database(_)) {
        error!(error = %e, "workflow operation failed");
    }
    error_response(e.status_code(), e.error_code(), &e.to_string())
}

/// POST `/workflow/start-next` - Claim the next order from the actor's
/// stage queue.
///
/// An empty queue and a reached WIP cap are explicit outcomes of a
/// successful request, not errors.
async fn start_next(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let Some(project_id) = auth.project_id() else {
        return missing_project_response();
    };

    let repo = AssignmentRepository::new((*state.db).clone());
    match repo.start_next(project_id, auth.user_id()).await {
        Ok(result) => {
            info!(
                order_id = %result.order.id,
                user_id = %auth.user_id(),
                "order claimed"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "status": "assigned",
                    "order": order_json(&result.order),
                    "work_item_id": result.work_item.id,
                })),
            )
                .into_response()
        }
        Err(AssignmentError::NoOrderAvailable) => (
            StatusCode::OK,
            Json(json!({ "status": "no_order_available" })),
        )
            .into_response(),
        Err(AssignmentError::WipCapExceeded { wip_count, wip_cap }) => (
            StatusCode::OK,
            Json(json!({
                "status": "wip_cap_reached",
                "wip_count": wip_count,
                "wip_cap": wip_cap,
            })),
        )
            .into_response(),
        Err(e) => {
            if matches!(e, AssignmentError::Database(_)) {
                error!(error = %e, "start-next failed");
            }
            error_response(e.status_code(), e.error_code(), &e.to_string())
        }
    }
}

/// GET `/workflow/my-current` - The actor's in-progress orders.
async fn my_current(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = AssignmentRepository::new((*state.db).clone());
    match repo.my_current(auth.user_id()).await {
        Ok(current) => {
            let orders: Vec<_> = current.iter().map(order_json).collect();
            (StatusCode::OK, Json(json!({ "orders": orders }))).into_response()
        }
        Err(e) => error_response(e.status_code(), e.error_code(), &e.to_string()),
    }
}

/// GET `/workflow/my-queue` - The queue the actor pulls from, in claim
/// order.
async fn my_queue(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let Some(project_id) = auth.project_id() else {
        return missing_project_response();
    };

    let repo = AssignmentRepository::new((*state.db).clone());
    match repo.my_queue(project_id, auth.user_id()).await {
        Ok(queue) => {
            let orders: Vec<_> = queue.iter().map(order_json).collect();
            (StatusCode::OK, Json(json!({ "orders": orders }))).into_response()
        }
        Err(e) => error_response(e.status_code(), e.error_code(), &e.to_string()),
    }
}

/// GET `/workflow/my-stats` - The actor's personal counters.
async fn my_stats(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = AssignmentRepository::new((*state.db).clone());
    match repo.my_stats(auth.user_id()).await {
        Ok(stats) => (StatusCode::OK, Json(json!(stats))).into_response(),
        Err(e) => error_response(e.status_code(), e.error_code(), &e.to_string()),
    }
}

/// POST `/workflow/orders` - Create an order in `RECEIVED`.
async fn create_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };
    if !role.is_management() {
        return error_response(403, "ROLE_NOT_ALLOWED", "Only management can create orders");
    }

    let priority = match payload.priority.as_deref() {
        None => Priority::Normal,
        Some(s) => match Priority::parse(s) {
            Some(p) => p,
            None => {
                return error_response(400, "INVALID_PRIORITY", "Unknown priority");
            }
        },
    };

    let repo = OrderRepository::new((*state.db).clone());
    let input = CreateOrderInput {
        project_id: payload.project_id,
        team_id: payload.team_id,
        order_number: payload.order_number,
        priority: convert::priority_to_db(priority),
        due_date: payload.due_date,
        metadata: payload.metadata,
    };
    match repo.create(input).await {
        Ok(order) => {
            info!(order_id = %order.id, order_number = %order.order_number, "order created");
            (StatusCode::CREATED, Json(order_json(&order))).into_response()
        }
        Err(e) => workflow_error(&e),
    }
}

/// POST `/workflow/receive` - Accept a received order into production.
async fn receive_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ReceiveOrderRequest>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };
    if !role.is_management() {
        return error_response(403, "ROLE_NOT_ALLOWED", "Only management can receive orders");
    }

    let repo = OrderRepository::new((*state.db).clone());
    match repo.receive(payload.order_id).await {
        Ok(order) => {
            info!(order_id = %order.id, "order queued for production");
            (StatusCode::OK, Json(order_json(&order))).into_response()
        }
        Err(e) => workflow_error(&e),
    }
}

/// GET `/workflow/orders/{id}` - Fetch one order.
async fn get_order(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = OrderRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(order) => (StatusCode::OK, Json(order_json(&order))).into_response(),
        Err(e) => workflow_error(&e),
    }
}

/// POST `/workflow/orders/{id}/submit` - Submit finished work.
async fn submit_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    body: Option<Json<SubmitRequest>>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };
    let comments = body.and_then(|Json(b)| b.comments);

    let repo = WorkflowRepository::new((*state.db).clone());
    match repo.submit(id, auth.user_id(), role, comments).await {
        Ok(order) => {
            info!(order_id = %id, new_state = ?order.workflow_state, "work submitted");
            (StatusCode::OK, Json(order_json(&order))).into_response()
        }
        Err(e) => workflow_error(&e),
    }
}

/// POST `/workflow/orders/{id}/reject` - Send work back to an earlier
/// stage.
async fn reject_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectRequest>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };
    let route_to = match payload.route_to.as_deref() {
        None => None,
        Some(s) => match Stage::parse(s) {
            Some(stage) => Some(stage),
            None => {
                return error_response(400, "INVALID_ROUTE_TARGET", "Unknown rework stage");
            }
        },
    };

    let repo = WorkflowRepository::new((*state.db).clone());
    match repo
        .reject(id, auth.user_id(), role, payload.reason, &payload.code, route_to)
        .await
    {
        Ok(order) => {
            info!(
                order_id = %id,
                new_state = ?order.workflow_state,
                recheck_count = order.recheck_count,
                "work rejected"
            );
            (StatusCode::OK, Json(order_json(&order))).into_response()
        }
        Err(e) => workflow_error(&e),
    }
}

/// POST `/workflow/orders/{id}/hold` - Place an order on hold.
async fn hold_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReasonRequest>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };

    let repo = WorkflowRepository::new((*state.db).clone());
    match repo.hold(id, auth.user_id(), role, payload.reason).await {
        Ok(order) => {
            info!(order_id = %id, "order placed on hold");
            (StatusCode::OK, Json(order_json(&order))).into_response()
        }
        Err(e) => workflow_error(&e),
    }
}

/// POST `/workflow/orders/{id}/resume` - Lift a hold.
async fn resume_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };

    let repo = WorkflowRepository::new((*state.db).clone());
    match repo.resume(id, auth.user_id(), role).await {
        Ok(order) => {
            info!(order_id = %id, new_state = ?order.workflow_state, "order resumed");
            (StatusCode::OK, Json(order_json(&order))).into_response()
        }
        Err(e) => workflow_error(&e),
    }
}

/// POST `/workflow/orders/{id}/reassign-queue` - Give an in-progress
/// order back to its stage queue.
async fn release_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };

    let repo = WorkflowRepository::new((*state.db).clone());
    match repo.release(id, auth.user_id(), role).await {
        Ok(order) => {
            info!(order_id = %id, "order released to queue");
            (StatusCode::OK, Json(order_json(&order))).into_response()
        }
        Err(e) => workflow_error(&e),
    }
}

/// POST `/workflow/orders/{id}/reassign` - Move an in-progress order
/// to a named worker.
async fn reassign_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReassignRequest>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };

    let user_repo = benchmark_db::UserRepository::new((*state.db).clone());
    let target = match user_repo.find_by_id(payload.target_user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return error_response(404, "USER_NOT_FOUND", "Target worker not found");
        }
        Err(e) => {
            error!(error = %e, "failed to load reassignment target");
            return error_response(500, "DATABASE_ERROR", "An error occurred");
        }
    };
    let target_role = convert::role_to_core(&target.role);

    let repo = WorkflowRepository::new((*state.db).clone());
    match repo.reassign(id, role, target.id, target_role).await {
        Ok(order) => {
            info!(
                order_id = %id,
                target = %target.id,
                actor = %auth.user_id(),
                reason = %payload.reason,
                "order reassigned"
            );
            (StatusCode::OK, Json(order_json(&order))).into_response()
        }
        Err(e) => workflow_error(&e),
    }
}

/// POST `/workflow/orders/{id}/cancel` - Cancel an order.
async fn cancel_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReasonRequest>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };

    let repo = WorkflowRepository::new((*state.db).clone());
    match repo.cancel(id, auth.user_id(), role, payload.reason).await {
        Ok(order) => {
            info!(order_id = %id, "order cancelled");
            (StatusCode::OK, Json(order_json(&order))).into_response()
        }
        Err(e) => workflow_error(&e),
    }
}

/// POST `/workflow/orders/{id}/deliver` - Deliver a QA-approved order.
async fn deliver_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return unknown_role_response();
    };

    let repo = WorkflowRepository::new((*state.db).clone());
    match repo.deliver(id, auth.user_id(), role).await {
        Ok(order) => {
            info!(order_id = %id, "order delivered");
            (StatusCode::OK, Json(order_json(&order))).into_response()
        }
        Err(e) => workflow_error(&e),
    }
}

/// GET `/workflow/work-items/{order_id}` - An order's work item ledger.
async fn list_work_items(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(order_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = OrderRepository::new((*state.db).clone());
    match repo.work_items(order_id).await {
        Ok(items) => (StatusCode::OK, Json(json!({ "work_items": items }))).into_response(),
        Err(e) => workflow_error(&e),
    }
}

/// GET `/workflow/{project_id}/orders` - List a project's orders.
async fn list_orders(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(project_id): Path<Uuid>,
    Query(query): Query<ListOrdersQuery>,
) -> impl IntoResponse {
    let state_filter = match query.state.as_deref() {
        None => None,
        Some(s) => match benchmark_core::workflow::WorkflowState::parse(s) {
            Some(ws) => Some(convert::state_to_db(ws)),
            None => {
                return error_response(400, "INVALID_STATE", "Unknown workflow state");
            }
        },
    };
    let priority_filter = match query.priority.as_deref() {
        None => None,
        Some(s) => match Priority::parse(s) {
            Some(p) => Some(convert::priority_to_db(p)),
            None => {
                return error_response(400, "INVALID_PRIORITY", "Unknown priority");
            }
        },
    };

    let filter = OrderFilter {
        state: state_filter,
        priority: priority_filter,
        assigned_to: query.assigned_to,
    };
    let page = PageRequest {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(25),
    };

    let repo = OrderRepository::new((*state.db).clone());
    match repo.list(project_id, &filter, &page).await {
        Ok((rows, total)) => {
            let orders: Vec<_> = rows.iter().map(order_json).collect();
            (
                StatusCode::OK,
                Json(json!({
                    "orders": orders,
                    "total": total,
                    "page": page.page,
                    "per_page": page.per_page,
                })),
            )
                .into_response()
        }
        Err(e) => workflow_error(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchmark_db::entities::sea_orm_active_enums::{
        OrderPriority, WorkflowState, WorkflowType,
    };

    fn sample_order() -> orders::Model {
        let now = chrono::Utc::now().into();
        orders::Model {
            id: Uuid::nil(),
            project_id: Uuid::nil(),
            team_id: None,
            order_number: "FP-1001".to_string(),
            workflow_type: WorkflowType::Fp3Layer,
            workflow_state: WorkflowState::QueuedDraw,
            priority: OrderPriority::Normal,
            assigned_to: None,
            queued_at: Some(now),
            previous_state: None,
            hold_reason: None,
            attempt_draw: 1,
            attempt_check: 0,
            attempt_qa: 0,
            attempt_design: 0,
            recheck_count: 1,
            rejected_by: None,
            rejected_at: None,
            rejection_type: None,
            rejection_reason: None,
            cancel_reason: None,
            received_at: now,
            started_at: None,
            completed_at: None,
            delivered_at: None,
            due_date: None,
            metadata: Some(serde_json::json!({ "source": "portal" })),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_order_json_carries_metadata() {
        let body = order_json(&sample_order());
        assert_eq!(body["metadata"]["source"], "portal");
    }

    #[test]
    fn test_order_json_carries_counters_and_rejection_fields() {
        let body = order_json(&sample_order());
        assert_eq!(body["attempt_draw"], 1);
        assert_eq!(body["recheck_count"], 1);
        assert!(body["rejection_type"].is_null());
        assert_eq!(body["order_number"], "FP-1001");
    }
}
