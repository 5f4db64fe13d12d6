#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use ride_validation::models::{FieldName, FormValues};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the previous values on unwind and serializes access to the
/// process environment, since tests run in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

/// The `RIDE_*` overrides all unset, for tests that read the environment.
pub const CLEAN_RIDE_ENV: [(&str, Option<&str>); 3] = [
    ("RIDE_SERVICE_URL", None),
    ("RIDE_SERVICE_TIMEOUT_SECS", None),
    ("RIDE_ODOMETER_MODE", None),
];

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// A complete, consistent ride on equipment 1: 20.05 km in one rolling
/// hour, 1h30 total, odometer `odometer`.
pub fn ride_values(odometer: &str) -> FormValues {
    FormValues::new()
        .with(FieldName::Distance, "20.05")
        .with(FieldName::Odometer, odometer)
        .with(FieldName::Equipment, "1")
        .with(FieldName::StartTime, "2021-09-30 10:00")
        .with(FieldName::EndTime, "2021-09-30 11:30")
        .with(FieldName::TotalTime, "1:30:00")
        .with(FieldName::RollingTime, "1:00:00")
        .with(FieldName::Avspeed, "20.0")
        .with(FieldName::Maxspeed, "35.5")
}
