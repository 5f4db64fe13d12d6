//! # Ride Validation
//!
//! Validation of the fields of a cycling ride logging form.
//!
//! The crate parses the form's display strings (numbers, `H:M:S` durations,
//! timestamps) into typed values, runs the cross-field consistency checks
//! between distance, speeds, times and odometer, and delegates the
//! odometer/distance check to a ride validation service without blocking.
//!
//! ## Architecture
//!
//! - [`models`]: field names, raw form values, durations and timestamps
//! - [`validators`]: single-field constraints and cross-field predicates
//! - [`service`]: the ride validation service trait, HTTP client and
//!   in-memory implementation
//! - [`form`]: rule wiring, outcome cache and the async session driver
//! - [`config`]: tolerances and service settings from TOML and environment
//! - [`http`]: Axum-based HTTP server (feature `http-server`)

// ServiceError carries an ErrorContext for diagnostics.
#![allow(clippy::result_large_err)]

pub mod config;
pub mod form;
pub mod models;
pub mod service;
pub mod validators;

#[cfg(feature = "http-server")]
pub mod http;

pub use config::{OdometerMode, ValidationConfig};
pub use form::{FormSession, FormValidator, RuleSet};
pub use models::{FieldName, FormValues};
pub use validators::{Outcome, Tolerances};
