use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::splitting::SplittingAnalytics,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::AnalyticsQuery,
    services::splitting_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/splitting-analytics", get(get_splitting_analytics))
}

#[utoipa::path(
    get,
    path = "/api/reports/splitting-analytics",
    params(
        ("date_from" = Option<String>, Query, description = "Order date lower bound (RFC 3339)"),
        ("date_to" = Option<String>, Query, description = "Order date upper bound (RFC 3339)"),
    ),
    responses(
        (status = 200, description = "Aggregate splitting analytics", body = ApiResponse<SplittingAnalytics>),
    ),
    security(("bearer_auth" = [])),
    tag = "Splitting"
)]
pub async fn get_splitting_analytics(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<Json<ApiResponse<SplittingAnalytics>>> {
    let resp = splitting_service::get_splitting_analytics(&state, query).await?;
    Ok(Json(resp))
}
