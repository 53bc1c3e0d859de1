use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, patch},
};
use uuid::Uuid;

use crate::{
    dto::assignments::UpdateAssignmentStatusRequest,
    error::AppResult,
    middleware::auth::AuthUser,
    models::VendorAssignment,
    response::ApiResponse,
    services::assignment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/items/{id}", delete(remove_item_assignment))
        .route("/{id}/status", patch(update_assignment_status))
}

#[utoipa::path(
    delete,
    path = "/api/assignments/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Item assignment ID")
    ),
    responses(
        (status = 200, description = "Remove an item assignment; cascades when it is the last one"),
        (status = 404, description = "Item assignment not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Assignments"
)]
pub async fn remove_item_assignment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = assignment_service::remove_item_assignment(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/assignments/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Vendor assignment ID")
    ),
    request_body = UpdateAssignmentStatusRequest,
    responses(
        (status = 200, description = "Update assignment status", body = ApiResponse<VendorAssignment>),
        (status = 400, description = "Invalid status transition"),
        (status = 404, description = "Assignment not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Assignments"
)]
pub async fn update_assignment_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAssignmentStatusRequest>,
) -> AppResult<Json<ApiResponse<VendorAssignment>>> {
    let resp = assignment_service::update_assignment_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
