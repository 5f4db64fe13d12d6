use crate::models::{FieldName, FormValues};

use super::{Outcome, Tolerances};

/// Claimed average speed must match distance / rolling time.
///
/// Passes when `avspeed / (distance / rolling_hours)` lies within the
/// tolerance band, bounds included.
pub fn avspeed_consistent(values: &FormValues, tolerances: &Tolerances) -> Outcome {
    let (Some(distance), Some(rolling), Some(claimed)) = (
        values.number(FieldName::Distance),
        values.duration(FieldName::RollingTime),
        values.number(FieldName::Avspeed),
    ) else {
        return Outcome::Valid;
    };

    let computed = distance / rolling.as_hours().value();
    if !computed.is_finite() || computed == 0.0 {
        return Outcome::Valid;
    }

    let ratio = claimed / computed;
    Outcome::check(
        ratio >= tolerances.avspeed_ratio_min && ratio <= tolerances.avspeed_ratio_max,
        || {
            format!(
                "Average speed is inconsistent with the time and distance entered \
                 (expected about {:.2})",
                computed
            )
        },
    )
}

/// Max speed must be strictly greater than the average speed.
pub fn maxspeed_gte_avspeed(values: &FormValues) -> Outcome {
    let (Some(avspeed), Some(maxspeed)) = (
        values.number(FieldName::Avspeed),
        values.number(FieldName::Maxspeed),
    ) else {
        return Outcome::Valid;
    };

    Outcome::check(maxspeed > avspeed, || {
        "Max speed should be greater than average speed.".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ride(distance: &str, rolling: &str, avspeed: &str) -> FormValues {
        FormValues::new()
            .with(FieldName::Distance, distance)
            .with(FieldName::RollingTime, rolling)
            .with(FieldName::Avspeed, avspeed)
    }

    #[test]
    fn test_consistent_average_speed() {
        let t = Tolerances::default();
        assert!(avspeed_consistent(&ride("20", "1:00:00", "20"), &t).is_valid());
        assert!(avspeed_consistent(&ride("20", "1:00:00", "20.3"), &t).is_valid());
        assert!(avspeed_consistent(&ride("20", "1:00:00", "19.85"), &t).is_valid());
    }

    #[test]
    fn test_inconsistent_average_speed() {
        let t = Tolerances::default();
        let outcome = avspeed_consistent(&ride("20", "1:00:00", "21"), &t);
        assert!(!outcome.is_valid());
        assert!(outcome.message().unwrap().contains("20.00"));
        assert!(!avspeed_consistent(&ride("20", "1:00:00", "19.7"), &t).is_valid());
    }

    #[test]
    fn test_unparseable_inputs_pass() {
        let t = Tolerances::default();
        assert!(avspeed_consistent(&ride("", "1:00:00", "99"), &t).is_valid());
        assert!(avspeed_consistent(&ride("20", "1:00", "99"), &t).is_valid());
        assert!(avspeed_consistent(&ride("20", "0:00:00", "99"), &t).is_valid());
        assert!(avspeed_consistent(&ride("0", "1:00:00", "99"), &t).is_valid());
    }

    #[test]
    fn test_maxspeed_strictly_greater() {
        let values = |a: &str, m: &str| {
            FormValues::new()
                .with(FieldName::Avspeed, a)
                .with(FieldName::Maxspeed, m)
        };
        assert!(maxspeed_gte_avspeed(&values("20", "35")).is_valid());
        assert!(!maxspeed_gte_avspeed(&values("20", "20")).is_valid());
        assert!(!maxspeed_gte_avspeed(&values("20", "15")).is_valid());
        assert!(maxspeed_gte_avspeed(&values("20", "")).is_valid());
    }
}
