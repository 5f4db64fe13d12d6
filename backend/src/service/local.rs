//! In-memory ride validation service.
//!
//! Keeps ride records in memory and answers the last-odometer lookup and the
//! delegated distance/odometer checks from them. Ride ids are assigned
//! sequentially starting at 1.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::{ServiceError, ServiceResult};
use super::models::{LastOdometerQuery, RemoteField, RemoteVerdict, RideCheckRequest};
use super::RideValidationService;
use crate::models::{EquipmentId, RideId};
use crate::validators::odometer::compare_odometer;
use crate::validators::Tolerances;

/// A stored ride.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideRecord {
    pub id: RideId,
    pub equipment_id: EquipmentId,
    pub start_time: NaiveDateTime,
    pub distance: f64,
    pub odometer: f64,
}

/// A ride to store; the id is assigned on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRide {
    pub equipment_id: EquipmentId,
    pub start_time: NaiveDateTime,
    pub distance: f64,
    pub odometer: f64,
}

/// In-memory ride validation service.
#[derive(Clone)]
pub struct LocalRideService {
    data: Arc<RwLock<LocalData>>,
    tolerances: Tolerances,
}

struct LocalData {
    rides: Vec<RideRecord>,
    next_ride_id: i64,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            rides: Vec::new(),
            next_ride_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRideService {
    /// Create an empty service with the default tolerances.
    pub fn new() -> Self {
        Self::with_tolerances(Tolerances::default())
    }

    pub fn with_tolerances(tolerances: Tolerances) -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
            tolerances,
        }
    }

    /// Store a ride and return it with its assigned id.
    pub fn record_ride(&self, ride: NewRide) -> RideRecord {
        let mut data = self.data.write();
        let record = RideRecord {
            id: RideId::new(data.next_ride_id),
            equipment_id: ride.equipment_id,
            start_time: ride.start_time,
            distance: ride.distance,
            odometer: ride.odometer,
        };
        data.next_ride_id += 1;
        data.rides.push(record.clone());
        log::debug!(
            "Recorded ride {} for equipment {} (odometer {})",
            record.id,
            record.equipment_id,
            record.odometer
        );
        record
    }

    pub fn get_ride(&self, ride_id: RideId) -> Option<RideRecord> {
        self.data
            .read()
            .rides
            .iter()
            .find(|r| r.id == ride_id)
            .cloned()
    }

    pub fn ride_count(&self) -> usize {
        self.data.read().rides.len()
    }

    /// Simulate an outage (test helper).
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    fn ensure_healthy(&self, operation: &str) -> ServiceResult<()> {
        if self.data.read().is_healthy {
            Ok(())
        } else {
            Err(ServiceError::unavailable("local ride store is offline").with_operation(operation))
        }
    }

    /// Latest ride on the equipment before `before`, skipping `exclude`.
    fn previous_ride(
        &self,
        equipment_id: EquipmentId,
        before: Option<NaiveDateTime>,
        exclude: Option<RideId>,
    ) -> Option<RideRecord> {
        self.data
            .read()
            .rides
            .iter()
            .filter(|r| r.equipment_id == equipment_id)
            .filter(|r| Some(r.id) != exclude)
            .filter(|r| before.map_or(true, |t| r.start_time < t))
            .max_by_key(|r| (r.start_time, r.id))
            .cloned()
    }
}

impl Default for LocalRideService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RideValidationService for LocalRideService {
    async fn health_check(&self) -> ServiceResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn last_odometer(&self, query: &LastOdometerQuery) -> ServiceResult<Option<f64>> {
        self.ensure_healthy("last_odometer")?;
        Ok(self
            .previous_ride(query.equipment_id, query.start_time, None)
            .map(|r| r.odometer))
    }

    async fn validate_field(
        &self,
        field: RemoteField,
        request: &RideCheckRequest,
    ) -> ServiceResult<RemoteVerdict> {
        self.ensure_healthy("validate_field")?;

        let Some(previous) =
            self.previous_ride(request.equipment_id, request.start_time, request.ride_id)
        else {
            return Ok(RemoteVerdict::valid());
        };

        let outcome = compare_odometer(
            previous.odometer,
            request.distance,
            request.odometer,
            &self.tolerances,
        );
        if outcome.is_valid() {
            return Ok(RemoteVerdict::valid());
        }

        let message = match field {
            RemoteField::Distance => format!(
                "Distance does not match the odometer change since the previous ride \
                 (expected about {:.1})",
                request.odometer - previous.odometer
            ),
            RemoteField::Odometer => outcome.message().unwrap_or_default().to_string(),
        };
        Ok(RemoteVerdict::invalid(message))
    }
}
