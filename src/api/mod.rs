//! HTTP API surface.
//!
//! Two routes: an unauthenticated `/health` probe and `/users/me`, which
//! requires Basic credentials (see [`crate::auth::current_user`]).

pub mod handlers;
pub mod models;

use axum::http::{HeaderValue, Method, header};
use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

/// Build the application router with all endpoints and middleware.
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let cors = create_cors_layer(&state.config)?;

    Ok(Router::new()
        .route("/health", get(health))
        .route("/users/me", get(handlers::users::me))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &crate::Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.allowed_origins {
        origins.push(origin.parse::<HeaderValue>()?);
    }

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(300)))
}

async fn health() -> &'static str {
    "OK"
}
