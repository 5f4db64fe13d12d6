//! Data Transfer Objects for the HTTP API.
//!
//! The ride validation endpoints reuse the service wire types from
//! [`crate::service::models`]; only the server-specific bodies live here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use crate::service::{
    LastOdometerQuery, LastOdometerResponse, RemoteVerdict, RideCheckRequest, RideRecord,
};
use crate::models::{DurationParts, EquipmentId, FieldName, FormValues};
use crate::validators::Outcome;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the server
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Ride validation service status
    pub service: String,
}

/// Request body for storing a ride in the local store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordRideRequest {
    pub equipment_id: EquipmentId,
    /// `YYYY-MM-DD HH:MM[:SS]`, space or `T` separated
    pub start_time: String,
    pub distance: f64,
    pub odometer: f64,
}

/// Request body of `POST /v1/forms/validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateFormRequest {
    /// Raw control values keyed by field name
    pub values: FormValues,
    /// Day/hour/minute/second controls, applied over the matching `values` entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time_parts: Option<DurationParts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rolling_time_parts: Option<DurationParts>,
}

impl ValidateFormRequest {
    /// Duration controls to apply after loading `values`.
    pub fn duration_parts(&self) -> impl Iterator<Item = (FieldName, &DurationParts)> {
        [
            (FieldName::TotalTime, self.total_time_parts.as_ref()),
            (FieldName::RollingTime, self.rolling_time_parts.as_ref()),
        ]
        .into_iter()
        .filter_map(|(field, parts)| parts.map(|parts| (field, parts)))
    }
}

/// Result of a complete form validation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateFormResponse {
    /// Whether every validated field passed
    pub submittable: bool,
    /// Outcome of every validated field
    pub fields: BTreeMap<FieldName, Outcome>,
}
