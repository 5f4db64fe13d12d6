//! Form field names and the current raw values of a ride form.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::duration::RideDuration;
use super::error::{parse_number, ParseError};
use super::timestamp::{parse_datetime, parse_timestamp};
use crate::define_id_type;

define_id_type!(i64, EquipmentId);
define_id_type!(i64, RideId);

/// Named controls of the ride form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Distance,
    Odometer,
    Maxspeed,
    Avspeed,
    /// Date half of a split start timestamp.
    Date,
    /// Time half of a split start timestamp.
    Time,
    StartTime,
    EndTime,
    TotalTime,
    RollingTime,
    Equipment,
    /// Hidden control carrying the ride being edited.
    RideId,
}

impl FieldName {
    pub const ALL: [FieldName; 12] = [
        FieldName::Distance,
        FieldName::Odometer,
        FieldName::Maxspeed,
        FieldName::Avspeed,
        FieldName::Date,
        FieldName::Time,
        FieldName::StartTime,
        FieldName::EndTime,
        FieldName::TotalTime,
        FieldName::RollingTime,
        FieldName::Equipment,
        FieldName::RideId,
    ];

    /// The control's `name` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Distance => "distance",
            FieldName::Odometer => "odometer",
            FieldName::Maxspeed => "maxspeed",
            FieldName::Avspeed => "avspeed",
            FieldName::Date => "date",
            FieldName::Time => "time",
            FieldName::StartTime => "start_time",
            FieldName::EndTime => "end_time",
            FieldName::TotalTime => "total_time",
            FieldName::RollingTime => "rolling_time",
            FieldName::Equipment => "equipment",
            FieldName::RideId => "ride_id",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldName::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("Unknown form field: {}", s))
    }
}

/// Snapshot of the form's raw control values.
///
/// Values are stored exactly as entered; every typed accessor re-parses on
/// each call and returns `None` when the value is absent or unparseable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues {
    values: BTreeMap<FieldName, String>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, field: FieldName, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn clear(&mut self, field: FieldName) {
        self.values.remove(&field);
    }

    /// Raw value, `None` when the control is absent.
    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// True when the control is absent or only whitespace.
    pub fn is_blank(&self, field: FieldName) -> bool {
        self.get(field).map_or(true, |v| v.trim().is_empty())
    }

    pub fn number(&self, field: FieldName) -> Option<f64> {
        self.get(field).and_then(|raw| parse_number(raw).ok())
    }

    pub fn duration(&self, field: FieldName) -> Option<RideDuration> {
        self.get(field)
            .and_then(|raw| RideDuration::parse_hms(raw).ok())
    }

    /// Ride start, from `start_time` or else from the `date` + `time` pair.
    pub fn start_time(&self) -> Option<NaiveDateTime> {
        if let Some(raw) = self.get(FieldName::StartTime) {
            if !raw.trim().is_empty() {
                return parse_datetime(raw).ok();
            }
        }
        let date = self.get(FieldName::Date)?;
        let time = self.get(FieldName::Time)?;
        parse_timestamp(date, time).ok()
    }

    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.get(FieldName::EndTime)
            .and_then(|raw| parse_datetime(raw).ok())
    }

    pub fn equipment_id(&self) -> Option<EquipmentId> {
        self.parse_id(FieldName::Equipment)
    }

    pub fn ride_id(&self) -> Option<RideId> {
        self.parse_id(FieldName::RideId)
    }

    fn parse_id<T: FromStr<Err = ParseError>>(&self, field: FieldName) -> Option<T> {
        self.get(field).and_then(|raw| raw.parse().ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl FromIterator<(FieldName, String)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (FieldName, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
