//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Endpoints the ride form calls directly.
    let rides = Router::new()
        .route("/last_odo", get(handlers::last_odometer))
        .route("/validation/distance", post(handlers::validate_distance))
        .route("/validation/odometer", post(handlers::validate_odometer));

    let api_v1 = Router::new()
        .route("/rides", post(handlers::record_ride))
        .route("/rides/{ride_id}", get(handlers::get_ride))
        .route("/forms/validate", post(handlers::validate_form));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/rides", rides)
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationConfig;
    use crate::service::LocalRideService;

    #[test]
    fn test_router_creation() {
        let state = AppState::new(LocalRideService::new(), ValidationConfig::default());
        let _router = create_router(state);
    }
}
