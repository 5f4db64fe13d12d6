//! Odometer / distance consistency.
//!
//! Between consecutive rides on the same equipment the odometer advances by
//! exactly the ride distance. The previous reading comes from the ride
//! validation service; this module only does the comparison.

use crate::models::{FieldName, FormValues};

use super::{Outcome, Tolerances};

/// Compare `previous + distance` against the entered odometer.
///
/// Passes when `|previous + distance - odometer| <= tolerance`. With no
/// previous reading (first ride on the equipment) there is nothing to
/// compare and the check passes.
pub fn odometer_consistent(
    values: &FormValues,
    previous: Option<f64>,
    tolerances: &Tolerances,
) -> Outcome {
    let (Some(previous), Some(distance), Some(odometer)) = (
        previous,
        values.number(FieldName::Distance),
        values.number(FieldName::Odometer),
    ) else {
        return Outcome::Valid;
    };

    compare_odometer(previous, distance, odometer, tolerances)
}

/// Core comparison shared with the in-memory ride service.
pub fn compare_odometer(
    previous: f64,
    distance: f64,
    odometer: f64,
    tolerances: &Tolerances,
) -> Outcome {
    let expected = previous + distance;
    Outcome::check((expected - odometer).abs() <= tolerances.odometer, || {
        format!(
            "Odometer value and ride distance do not match (previous reading {}, expected {:.1})",
            previous, expected
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entered(distance: &str, odometer: &str) -> FormValues {
        FormValues::new()
            .with(FieldName::Distance, distance)
            .with(FieldName::Odometer, odometer)
    }

    #[test]
    fn test_within_tolerance() {
        let t = Tolerances::default();
        assert!(odometer_consistent(&entered("20.05", "120.1"), Some(100.0), &t).is_valid());
    }

    #[test]
    fn test_outside_tolerance() {
        let t = Tolerances::default();
        let outcome = odometer_consistent(&entered("20.05", "120.2"), Some(100.0), &t);
        assert!(!outcome.is_valid());
        assert!(outcome
            .message()
            .unwrap()
            .starts_with("Odometer value and ride distance do not match (previous reading 100,"));
    }

    #[test]
    fn test_no_previous_reading_passes() {
        let t = Tolerances::default();
        assert!(odometer_consistent(&entered("20", "5000"), None, &t).is_valid());
    }

    #[test]
    fn test_unparseable_values_pass() {
        let t = Tolerances::default();
        assert!(odometer_consistent(&entered("", "120.2"), Some(100.0), &t).is_valid());
        assert!(odometer_consistent(&entered("20", "n/a"), Some(100.0), &t).is_valid());
    }
}
