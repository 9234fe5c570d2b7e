use axum::{
    http::{header, Method},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod account;
pub mod auth;
pub mod categories;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod products;
pub mod restaurants;
pub mod state;

pub use state::{AppState, AuthConfig};

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn updated() -> Self {
        Self { status: "updated" }
    }
}

/// Request bodies treat `""` the same as a missing field.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    // Owner-only routes
    let owner = Router::new()
        .merge(account::routes())
        .merge(categories::routes())
        .merge(products::routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_owner,
        ));

    let api = Router::new()
        .route("/health", get(health))
        .merge(auth::routes())
        .merge(restaurants::routes())
        .merge(owner);

    Router::new()
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<StatusResponse> {
    Json(StatusResponse { status: "ok" })
}
