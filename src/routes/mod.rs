use axum::Router;

use crate::state::AppState;

pub mod assignments;
pub mod auth;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod reports;
pub mod vendors;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/vendors", vendors::router())
        .nest("/orders", orders::router())
        .nest("/assignments", assignments::router())
        .nest("/reports", reports::router())
}
