//! Ride validation service: the remote collaborator behind the odometer and
//! distance checks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Form engine (form::FormSession)                        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │ RemoteRequest (ticketed)
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  RideValidationService trait - Abstract Interface       │
//! └───────────────────┬─────────────────────────────────────┘
//!           ┌─────────┴──────────────┐
//!   HttpRideService           LocalRideService
//!   (reqwest client)          (in-memory ride store)
//! ```
//!
//! The endpoints' real logic lives server side; [`LocalRideService`] is an
//! in-memory stand-in for tests, local development and the bundled server.

pub mod error;
#[cfg(feature = "http-client")]
pub mod http;
pub mod local;
pub mod models;

use async_trait::async_trait;

pub use error::{ErrorContext, ServiceError, ServiceResult};
#[cfg(feature = "http-client")]
pub use http::HttpRideService;
pub use local::{LocalRideService, NewRide, RideRecord};
pub use models::{
    LastOdometerQuery, LastOdometerResponse, RemoteField, RemoteVerdict, RideCheckRequest,
};

/// Remote checks used by the ride form.
///
/// # Thread Safety
/// Implementations must be `Send + Sync`; calls are dispatched from spawned
/// tokio tasks.
#[async_trait]
pub trait RideValidationService: Send + Sync {
    /// Check that the service is reachable.
    async fn health_check(&self) -> ServiceResult<bool>;

    /// Most recent odometer reading of the equipment, strictly before
    /// `query.start_time` when one is given. `Ok(None)` when there is none.
    async fn last_odometer(&self, query: &LastOdometerQuery) -> ServiceResult<Option<f64>>;

    /// Run the delegated distance or odometer check.
    async fn validate_field(
        &self,
        field: RemoteField,
        request: &RideCheckRequest,
    ) -> ServiceResult<RemoteVerdict>;
}
