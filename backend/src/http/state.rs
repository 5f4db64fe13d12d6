//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::ValidationConfig;
use crate::service::{LocalRideService, RideValidationService};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service consulted by form validation passes
    pub service: Arc<dyn RideValidationService>,
    /// Ride store behind the service endpoints served by this process
    pub rides: LocalRideService,
    pub config: Arc<ValidationConfig>,
}

impl AppState {
    /// State whose form validation uses the local ride store.
    pub fn new(rides: LocalRideService, config: ValidationConfig) -> Self {
        Self {
            service: Arc::new(rides.clone()),
            rides,
            config: Arc::new(config),
        }
    }

    /// Validate forms against another service (e.g. a remote one).
    pub fn with_service(mut self, service: Arc<dyn RideValidationService>) -> Self {
        self.service = service;
        self
    }
}
