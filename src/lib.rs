//! # Car Doctor - Service Booking Backend
//!
//! ## Modules
//!
//! - [`handlers`] - HTTP request handlers for the service catalogue, checkouts and session tokens
//! - [`middleware`] - Session gate and request audit logging
//! - [`models`] - Shared state, documents and response types
//! - [`services`] - Session tokens and the document store
//! - [`utils`] - Configuration, secrets and constants

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post},
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing::info;

use crate::handlers::{
    create_checkout, delete_checkout, get_service, health_check, issue_token, list_checkouts,
    list_services, update_checkout_status,
};
use crate::middleware::{auth_middleware, request_logger};
use crate::models::AppState;
use crate::services::store::Store;
use crate::utils::config::AppConfig;

/// Creates an Axum router with application routes and state.
///
/// # Arguments
///
/// * `store` - Document store used by every handler
/// * `config` - Startup configuration (signing secret, CORS origin, cookie policy)
///
/// # Returns
///
/// A configured Axum router with all application routes and middleware
pub fn app(store: Arc<dyn Store>, config: &AppConfig) -> Router {
    let state = Arc::new(AppState::new(store, config));
    info!(origin = ?config.cors_origin, "Building router");

    let protected_routes = Router::new()
        .route("/checkouts", get(list_checkouts))
        .route_layer(from_fn_with_state(Arc::clone(&state), auth_middleware))
        .route_layer(from_fn(request_logger));

    let public_routes = Router::new()
        .route("/", get(health_check))
        .route("/jwt", post(issue_token).layer(from_fn(request_logger)))
        .route("/services", get(list_services).layer(from_fn(request_logger)))
        .route("/services/{id}", get(get_service))
        .route("/checkouts", post(create_checkout))
        .route(
            "/checkouts/{id}",
            patch(update_checkout_status).delete(delete_checkout),
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors_layer(config.cors_origin.clone()))
        .with_state(state)
}

/// Single-origin CORS policy permitting cookie-bearing requests.
///
/// Requests from any other origin get no `Access-Control-Allow-Origin`.
fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(AllowHeaders::mirror_request())
}
