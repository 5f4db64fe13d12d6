//! Wire types of the ride validation endpoints.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{EquipmentId, FormValues, RideId};

/// Query of `GET /rides/last_odo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastOdometerQuery {
    pub equipment_id: EquipmentId,
    /// Only readings strictly before this time count.
    #[serde(default, with = "service_timestamp", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveDateTime>,
}

/// Reply of `GET /rides/last_odo`; `null` when the equipment has no earlier ride.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LastOdometerResponse {
    pub odometer: Option<f64>,
}

/// Body of `POST /rides/validation/{distance,odometer}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideCheckRequest {
    pub distance: f64,
    pub odometer: f64,
    pub equipment_id: EquipmentId,
    #[serde(default, with = "service_timestamp", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveDateTime>,
    /// Set when editing, so the ride is not compared against itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ride_id: Option<RideId>,
}

impl RideCheckRequest {
    /// Build from the form, `None` when distance, odometer or equipment
    /// are missing or unparseable.
    pub fn from_values(values: &FormValues) -> Option<Self> {
        use crate::models::FieldName;

        Some(Self {
            distance: values.number(FieldName::Distance)?,
            odometer: values.number(FieldName::Odometer)?,
            equipment_id: values.equipment_id()?,
            start_time: values.start_time(),
            ride_id: values.ride_id(),
        })
    }
}

/// Which delegated check to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteField {
    Distance,
    Odometer,
}

impl RemoteField {
    /// Endpoint path relative to the service base URL.
    pub fn path(&self) -> &'static str {
        match self {
            RemoteField::Distance => "/rides/validation/distance",
            RemoteField::Odometer => "/rides/validation/odometer",
        }
    }
}

/// Pass/fail reply of a delegated check.
///
/// Accepted on the wire as `true`/`false`, as a bare string (a failure
/// message, except the literal `"true"`), or as `{"valid": .., "message": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "VerdictWire")]
pub struct RemoteVerdict {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RemoteVerdict {
    pub fn valid() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VerdictWire {
    Flag(bool),
    Message(String),
    Full {
        valid: bool,
        #[serde(default)]
        message: Option<String>,
    },
}

impl From<VerdictWire> for RemoteVerdict {
    fn from(wire: VerdictWire) -> Self {
        match wire {
            VerdictWire::Flag(valid) => Self {
                valid,
                message: None,
            },
            VerdictWire::Message(text) if text == "true" => Self::valid(),
            VerdictWire::Message(text) => Self::invalid(text),
            VerdictWire::Full { valid, message } => Self { valid, message },
        }
    }
}

/// `Option<NaiveDateTime>` as `YYYY-MM-DD HH:MM:SS`.
mod service_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::models::{format_service_timestamp, parse_datetime};

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&format_service_timestamp(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            Some(s) if !s.trim().is_empty() => parse_datetime(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldName;

    #[test]
    fn test_verdict_wire_shapes() {
        let v: RemoteVerdict = serde_json::from_str("true").unwrap();
        assert_eq!(v, RemoteVerdict::valid());

        let v: RemoteVerdict = serde_json::from_str("false").unwrap();
        assert!(!v.valid);
        assert!(v.message.is_none());

        let v: RemoteVerdict = serde_json::from_str("\"Odometer does not match\"").unwrap();
        assert_eq!(v, RemoteVerdict::invalid("Odometer does not match"));

        let v: RemoteVerdict = serde_json::from_str("\"true\"").unwrap();
        assert!(v.valid);

        let v: RemoteVerdict =
            serde_json::from_str(r#"{"valid": false, "message": "too far"}"#).unwrap();
        assert_eq!(v, RemoteVerdict::invalid("too far"));
    }

    #[test]
    fn test_check_request_wire_format() {
        let values = FormValues::new()
            .with(FieldName::Distance, "20.05")
            .with(FieldName::Odometer, "120.1")
            .with(FieldName::Equipment, "2")
            .with(FieldName::StartTime, "2021-09-30T10:00");
        let request = RideCheckRequest::from_values(&values).unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "distance": 20.05,
                "odometer": 120.1,
                "equipment_id": 2,
                "start_time": "2021-09-30 10:00:00",
            })
        );
        let back: RideCheckRequest = serde_json::from_value(json).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn test_check_request_needs_core_fields() {
        let values = FormValues::new()
            .with(FieldName::Distance, "20")
            .with(FieldName::Odometer, "120");
        assert!(RideCheckRequest::from_values(&values).is_none());
    }

    #[test]
    fn test_last_odometer_response_null() {
        let r: LastOdometerResponse = serde_json::from_str(r#"{"odometer": null}"#).unwrap();
        assert_eq!(r.odometer, None);
    }
}
