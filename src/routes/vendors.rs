use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post, put},
};
use uuid::Uuid;

use crate::{
    dto::vendors::{
        CreateVendorRequest, UpdateVendorRequest, UpdateVendorStatusRequest, VendorList,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Vendor,
    response::ApiResponse,
    routes::params::VendorListQuery,
    services::vendor_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_vendor))
        .route("/", get(list_vendors))
        .route("/{id}", get(get_vendor))
        .route("/{id}", put(update_vendor))
        .route("/{id}/status", patch(update_vendor_status))
}

#[utoipa::path(
    post,
    path = "/api/vendors",
    request_body = CreateVendorRequest,
    responses(
        (status = 200, description = "Create vendor", body = ApiResponse<Vendor>),
        (status = 400, description = "Invalid commission rate"),
        (status = 409, description = "Vendor already registered"),
    ),
    security(("bearer_auth" = [])),
    tag = "Vendors"
)]
pub async fn create_vendor(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateVendorRequest>,
) -> AppResult<Json<ApiResponse<Vendor>>> {
    let resp = vendor_service::create_vendor(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/vendors",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
    ),
    responses(
        (status = 200, description = "List vendors", body = ApiResponse<VendorList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Vendors"
)]
pub async fn list_vendors(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<VendorListQuery>,
) -> AppResult<Json<ApiResponse<VendorList>>> {
    let resp = vendor_service::list_vendors(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/vendors/{id}",
    params(
        ("id" = Uuid, Path, description = "Vendor ID")
    ),
    responses(
        (status = 200, description = "Get vendor", body = ApiResponse<Vendor>),
        (status = 404, description = "Vendor not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Vendors"
)]
pub async fn get_vendor(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vendor>>> {
    let resp = vendor_service::get_vendor(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/vendors/{id}",
    params(
        ("id" = Uuid, Path, description = "Vendor ID")
    ),
    request_body = UpdateVendorRequest,
    responses(
        (status = 200, description = "Update vendor", body = ApiResponse<Vendor>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Vendor not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Vendors"
)]
pub async fn update_vendor(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVendorRequest>,
) -> AppResult<Json<ApiResponse<Vendor>>> {
    let resp = vendor_service::update_vendor(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/vendors/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Vendor ID")
    ),
    request_body = UpdateVendorStatusRequest,
    responses(
        (status = 200, description = "Approve or suspend vendor", body = ApiResponse<Vendor>),
        (status = 400, description = "Invalid status transition"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Vendor not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Vendors"
)]
pub async fn update_vendor_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVendorStatusRequest>,
) -> AppResult<Json<ApiResponse<Vendor>>> {
    let resp = vendor_service::update_vendor_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
