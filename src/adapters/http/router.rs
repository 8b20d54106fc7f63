//! Top-level router and middleware stack.

use std::time::Duration;

use axum::http::{header, Method};
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::checkout::checkout_routes;
use super::error::{method_not_allowed, not_found};
use super::form_config::form_config_routes;
use super::index::{api_index, health};
use super::state::AppState;
use super::webhook::webhook_routes;

/// Routes mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(api_index).fallback(method_not_allowed))
        .merge(checkout_routes())
        .merge(webhook_routes())
        .merge(form_config_routes())
}

/// CORS policy: any origin, the three methods the API serves.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Build the full application with state and middleware applied.
pub fn app_router(state: AppState, request_timeout: Duration) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(cors_layer())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .nest("/api", api_routes())
        .route("/health", get(health))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware)
}
