//! Field validators for the ride form.
//!
//! Every validator is a pure function of the current [`FormValues`]. A
//! dependency that is missing or fails to parse makes a cross-field check pass
//! vacuously: it is "not yet checkable", and the plain field constraints
//! ([`Constraint`]) are left to report the malformed value.
//!
//! - [`constraints`]: required / numeric / minimum / step checks on one field
//! - [`speed`]: average-speed consistency, max speed above average speed
//! - [`time`]: end after start, total time vs. elapsed, total vs. rolling time
//! - [`odometer`]: odometer advances by the ride distance

pub mod constraints;
pub mod odometer;
pub mod speed;
pub mod time;

use serde::{Deserialize, Serialize};

use crate::models::{FieldName, FormValues};

pub use constraints::Constraint;

/// Result of validating one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Valid,
    Invalid { message: String },
    /// A remote check could not be completed; treated as blocking.
    Unverified { message: String },
}

impl Outcome {
    pub fn invalid(message: impl Into<String>) -> Self {
        Outcome::Invalid {
            message: message.into(),
        }
    }

    pub fn unverified(message: impl Into<String>) -> Self {
        Outcome::Unverified {
            message: message.into(),
        }
    }

    /// Build from a pass/fail flag and the message shown on failure.
    pub fn check(passed: bool, message: impl FnOnce() -> String) -> Self {
        if passed {
            Outcome::Valid
        } else {
            Outcome::invalid(message())
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Outcome::Valid)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::Valid => None,
            Outcome::Invalid { message } | Outcome::Unverified { message } => Some(message),
        }
    }
}

/// Numeric tolerances of the cross-field checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Lowest accepted claimed/computed average speed ratio (inclusive).
    pub avspeed_ratio_min: f64,
    /// Highest accepted claimed/computed average speed ratio (inclusive).
    pub avspeed_ratio_max: f64,
    /// Largest accepted |previous + distance - odometer| (inclusive).
    pub odometer: f64,
    /// Total time must be within this many seconds of end - start (exclusive).
    pub total_time_secs: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            avspeed_ratio_min: 0.99,
            avspeed_ratio_max: 1.02,
            odometer: 0.1,
            total_time_secs: 60.0,
        }
    }
}

/// Named cross-field checks that can be computed from the form alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    AvspeedConsistent,
    MaxspeedGteAvspeed,
    EndAfterStart,
    TotalTimeConsistent,
    TotalTimeGteRollingTime,
}

const START_FIELDS: [FieldName; 3] = [FieldName::StartTime, FieldName::Date, FieldName::Time];

impl Predicate {
    pub fn name(&self) -> &'static str {
        match self {
            Predicate::AvspeedConsistent => "avspeed_consistent",
            Predicate::MaxspeedGteAvspeed => "maxspeed_gte_avspeed",
            Predicate::EndAfterStart => "end_after_start",
            Predicate::TotalTimeConsistent => "total_time_consistent",
            Predicate::TotalTimeGteRollingTime => "total_time_gte_rolling_time",
        }
    }

    /// Fields whose values this check reads.
    pub fn inputs(&self) -> Vec<FieldName> {
        match self {
            Predicate::AvspeedConsistent => vec![
                FieldName::Distance,
                FieldName::RollingTime,
                FieldName::Avspeed,
            ],
            Predicate::MaxspeedGteAvspeed => vec![FieldName::Avspeed, FieldName::Maxspeed],
            Predicate::EndAfterStart => {
                let mut fields = START_FIELDS.to_vec();
                fields.push(FieldName::EndTime);
                fields
            }
            Predicate::TotalTimeConsistent => {
                let mut fields = START_FIELDS.to_vec();
                fields.extend([FieldName::EndTime, FieldName::TotalTime]);
                fields
            }
            Predicate::TotalTimeGteRollingTime => {
                vec![FieldName::TotalTime, FieldName::RollingTime]
            }
        }
    }

    pub fn evaluate(&self, values: &FormValues, tolerances: &Tolerances) -> Outcome {
        match self {
            Predicate::AvspeedConsistent => speed::avspeed_consistent(values, tolerances),
            Predicate::MaxspeedGteAvspeed => speed::maxspeed_gte_avspeed(values),
            Predicate::EndAfterStart => time::end_after_start(values),
            Predicate::TotalTimeConsistent => time::total_time_consistent(values, tolerances),
            Predicate::TotalTimeGteRollingTime => time::total_time_gte_rolling_time(values),
        }
    }
}
