//! Numeric properties of the cross-field checks.

use proptest::prelude::*;

use ride_validation::models::{format_hms, FieldName, FormValues, RideDuration};
use ride_validation::validators::speed::{avspeed_consistent, maxspeed_gte_avspeed};
use ride_validation::validators::time::total_time_consistent;
use ride_validation::validators::Tolerances;

const START: &str = "2021-09-30 10:00:00";

fn end_after(secs: i64) -> String {
    let start = chrono::NaiveDateTime::parse_from_str(START, "%Y-%m-%d %H:%M:%S").unwrap();
    (start + chrono::Duration::seconds(secs))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

proptest! {
    #[test]
    fn prop_avspeed_ratio_band(
        distance in 0.1..500.0f64,
        rolling_secs in 60u32..36_000,
        ratio in 0.9..1.1f64,
    ) {
        // Stay clear of the band edges, where float rounding decides.
        prop_assume!((ratio - 0.99).abs() > 1e-6 && (ratio - 1.02).abs() > 1e-6);

        let computed = distance / (f64::from(rolling_secs) / 3600.0);
        let values = FormValues::new()
            .with(FieldName::Distance, distance.to_string())
            .with(FieldName::RollingTime, format_hms(f64::from(rolling_secs)))
            .with(FieldName::Avspeed, (computed * ratio).to_string());

        let expected = (0.99..=1.02).contains(&ratio);
        prop_assert_eq!(
            avspeed_consistent(&values, &Tolerances::default()).is_valid(),
            expected
        );
    }

    #[test]
    fn prop_maxspeed_strictly_above_avspeed(avspeed in 0.0..100.0f64, maxspeed in 0.0..100.0f64) {
        let values = FormValues::new()
            .with(FieldName::Avspeed, avspeed.to_string())
            .with(FieldName::Maxspeed, maxspeed.to_string());
        prop_assert_eq!(maxspeed_gte_avspeed(&values).is_valid(), maxspeed > avspeed);
    }

    #[test]
    fn prop_total_time_within_a_minute(elapsed in 0i64..86_400, total in 0u32..86_400) {
        let values = FormValues::new()
            .with(FieldName::StartTime, START)
            .with(FieldName::EndTime, end_after(elapsed))
            .with(FieldName::TotalTime, format_hms(f64::from(total)));

        let expected = (elapsed as f64 - f64::from(total)).abs() < 60.0;
        prop_assert_eq!(
            total_time_consistent(&values, &Tolerances::default()).is_valid(),
            expected
        );
    }

    #[test]
    fn prop_whole_seconds_survive_hms_round_trip(secs in 0u32..1_000_000) {
        let formatted = format_hms(f64::from(secs));
        let parsed = RideDuration::parse_hms(&formatted).unwrap();
        prop_assert_eq!(parsed.seconds(), f64::from(secs));
    }
}

#[test]
fn test_equal_speeds_fail() {
    let values = FormValues::new()
        .with(FieldName::Avspeed, "25.3")
        .with(FieldName::Maxspeed, "25.3");
    assert_eq!(
        maxspeed_gte_avspeed(&values).message(),
        Some("Max speed should be greater than average speed.")
    );
}

#[test]
fn test_total_time_minute_boundary() {
    let t = Tolerances::default();
    let values = |total: &str| {
        FormValues::new()
            .with(FieldName::StartTime, START)
            .with(FieldName::EndTime, end_after(7200))
            .with(FieldName::TotalTime, total)
    };
    // Elapsed 7200 s: 60 s off fails, 59.999 s off passes.
    assert!(!total_time_consistent(&values("1:59:00"), &t).is_valid());
    assert!(total_time_consistent(&values("1:59:0.001"), &t).is_valid());
}

#[test]
fn test_hms_examples() {
    assert_eq!(RideDuration::parse_hms("1:02:03").unwrap().seconds(), 3723.0);
    assert!(RideDuration::parse_hms("1:2").is_err());
    assert_eq!(format_hms(3723.0), "01:02:03");
}
