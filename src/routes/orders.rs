use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        assignments::{
            AssignmentWithItems, CreateFullAssignmentRequest, CreatePartialAssignmentRequest,
        },
        orders::{IngestOrderRequest, OrderDetails, OrderList, OrderWithItems},
        splitting::OrderSplitting,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::{assignment_service, order_service, splitting_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ingest", post(ingest_order))
        .route("/", get(list_orders))
        .route("/{id}", get(get_order))
        .route("/{id}/splitting", get(get_order_splitting))
        .route("/{id}/assignments/partial", post(create_partial_assignment))
        .route("/{id}/assignments/full", post(create_full_assignment))
}

#[utoipa::path(
    post,
    path = "/api/orders/ingest",
    request_body = IngestOrderRequest,
    responses(
        (status = 200, description = "Ingest an order from an e-commerce platform", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Order already ingested"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn ingest_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<IngestOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::ingest_order(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("platform" = Option<String>, Query, description = "Filter by platform"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc"),
    ),
    responses(
        (status = 200, description = "List orders", body = ApiResponse<OrderList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Get order with items and assignments", body = ApiResponse<OrderDetails>),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderDetails>>> {
    let resp = order_service::get_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}/splitting",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Per-item assignment breakdown for an order", body = ApiResponse<OrderSplitting>),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Splitting"
)]
pub async fn get_order_splitting(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderSplitting>>> {
    let resp = splitting_service::get_order_splitting(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/assignments/partial",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = CreatePartialAssignmentRequest,
    responses(
        (status = 200, description = "Assign order items to a vendor", body = ApiResponse<AssignmentWithItems>),
        (status = 400, description = "Invalid items or quantity"),
        (status = 404, description = "Order, vendor, or item not found"),
        (status = 409, description = "Quantity already allocated to another vendor"),
    ),
    security(("bearer_auth" = [])),
    tag = "Assignments"
)]
pub async fn create_partial_assignment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreatePartialAssignmentRequest>,
) -> AppResult<Json<ApiResponse<AssignmentWithItems>>> {
    let resp = assignment_service::create_partial_assignment(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/assignments/full",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = CreateFullAssignmentRequest,
    responses(
        (status = 200, description = "Assign the whole order to a vendor", body = ApiResponse<AssignmentWithItems>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Order or vendor not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Assignments"
)]
pub async fn create_full_assignment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateFullAssignmentRequest>,
) -> AppResult<Json<ApiResponse<AssignmentWithItems>>> {
    let resp = assignment_service::create_full_assignment(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
