//! Ride validation HTTP server.
//!
//! Serves the ride validation endpoints from an in-memory ride store and runs
//! form validation passes.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin ride-validation-server
//!
//! # Validate forms against a remote ride validation service
//! RIDE_SERVICE_URL=http://rides.example:6543 cargo run --bin ride-validation-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RIDE_VALIDATION_CONFIG`: Path to a `ride_validation.toml` (optional)
//! - `RIDE_SERVICE_URL`: Remote service used by `/v1/forms/validate` (optional)
//! - `RIDE_SERVICE_TIMEOUT_SECS`, `RIDE_ODOMETER_MODE`: config overrides
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ride_validation::config::ValidationConfig;
use ride_validation::http::{create_router, AppState};
use ride_validation::service::{HttpRideService, LocalRideService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting ride validation server");

    let config_path = env::var("RIDE_VALIDATION_CONFIG").ok().map(PathBuf::from);
    let config = ValidationConfig::load(config_path.as_deref())?;
    info!(
        "Odometer mode {:?}, service timeout {}s",
        config.service.odometer_mode, config.service.timeout_secs
    );

    let rides = LocalRideService::with_tolerances(config.tolerances);
    let remote = env::var("RIDE_SERVICE_URL").is_ok();
    let mut state = AppState::new(rides, config.clone());
    if remote {
        let service = HttpRideService::from_settings(&config.service)?;
        info!("Validating forms against {}", service.base_url());
        state = state.with_service(Arc::new(service));
    } else {
        info!("Validating forms against the in-memory ride store");
    }

    let app = create_router(state);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
