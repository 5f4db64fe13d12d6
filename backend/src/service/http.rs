//! reqwest client for the remote ride validation endpoints.

use std::time::Duration;

use async_trait::async_trait;

use super::error::{ServiceError, ServiceResult};
use super::models::{
    LastOdometerQuery, LastOdometerResponse, RemoteField, RemoteVerdict, RideCheckRequest,
};
use super::RideValidationService;
use crate::config::ServiceSettings;

const LAST_ODOMETER_PATH: &str = "/rides/last_odo";
const HEALTH_PATH: &str = "/health";

/// Ride validation service reached over HTTP.
#[derive(Clone)]
pub struct HttpRideService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRideService {
    /// Create a client for `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ServiceResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ServiceError::invalid_request(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &ServiceSettings) -> ServiceResult<Self> {
        Self::new(settings.base_url.clone(), settings.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl RideValidationService for HttpRideService {
    async fn health_check(&self) -> ServiceResult<bool> {
        let response = self
            .client
            .get(self.url(HEALTH_PATH))
            .send()
            .await
            .map_err(|e| ServiceError::from(e).with_operation("health_check"))?;
        Ok(response.status().is_success())
    }

    async fn last_odometer(&self, query: &LastOdometerQuery) -> ServiceResult<Option<f64>> {
        log::debug!(
            "GET {} equipment_id={} start_time={:?}",
            LAST_ODOMETER_PATH,
            query.equipment_id,
            query.start_time
        );

        let response: LastOdometerResponse = self
            .client
            .get(self.url(LAST_ODOMETER_PATH))
            .query(query)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ServiceError::from(e).with_operation("last_odometer"))?
            .json()
            .await
            .map_err(|e| ServiceError::from(e).with_operation("last_odometer"))?;

        Ok(response.odometer)
    }

    async fn validate_field(
        &self,
        field: RemoteField,
        request: &RideCheckRequest,
    ) -> ServiceResult<RemoteVerdict> {
        log::debug!("POST {} {:?}", field.path(), request);

        let verdict: RemoteVerdict = self
            .client
            .post(self.url(field.path()))
            .json(request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ServiceError::from(e).with_operation("validate_field"))?
            .json()
            .await
            .map_err(|e| ServiceError::from(e).with_operation("validate_field"))?;

        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EquipmentId;

    #[test]
    fn test_base_url_is_normalized() {
        let service =
            HttpRideService::new("http://localhost:6543/", Duration::from_secs(1)).unwrap();
        assert_eq!(service.base_url(), "http://localhost:6543");
        assert_eq!(
            service.url(RemoteField::Distance.path()),
            "http://localhost:6543/rides/validation/distance"
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_is_an_error() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let service =
            HttpRideService::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let err = service
            .last_odometer(&LastOdometerQuery {
                equipment_id: EquipmentId::new(1),
                start_time: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.context().operation.as_deref(), Some("last_odometer"));
    }
}
