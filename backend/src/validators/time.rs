use crate::models::{format_hms, seconds_between, FieldName, FormValues};

use super::{Outcome, Tolerances};

/// The ride must end strictly after it starts.
pub fn end_after_start(values: &FormValues) -> Outcome {
    let (Some(start), Some(end)) = (values.start_time(), values.end_time()) else {
        return Outcome::Valid;
    };

    Outcome::check(start < end, || "End time must be after start time.".to_string())
}

/// Total time must agree with end - start to within the tolerance (exclusive).
pub fn total_time_consistent(values: &FormValues, tolerances: &Tolerances) -> Outcome {
    let (Some(start), Some(end), Some(total)) = (
        values.start_time(),
        values.end_time(),
        values.duration(FieldName::TotalTime),
    ) else {
        return Outcome::Valid;
    };

    let elapsed = seconds_between(&start, &end);
    Outcome::check(
        (elapsed - total.seconds()).abs() < tolerances.total_time_secs,
        || {
            format!(
                "Total time is inconsistent with the start and end times (elapsed {})",
                format_hms(elapsed)
            )
        },
    )
}

/// Rolling time must be strictly less than total time.
pub fn total_time_gte_rolling_time(values: &FormValues) -> Outcome {
    let (Some(total), Some(rolling)) = (
        values.duration(FieldName::TotalTime),
        values.duration(FieldName::RollingTime),
    ) else {
        return Outcome::Valid;
    };

    Outcome::check(rolling < total, || {
        "Total time should be greater than rolling time.".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timed(start: &str, end: &str, total: &str) -> FormValues {
        FormValues::new()
            .with(FieldName::StartTime, start)
            .with(FieldName::EndTime, end)
            .with(FieldName::TotalTime, total)
    }

    #[test]
    fn test_end_after_start() {
        let ok = timed("2005-01-01 10:00:00", "2005-01-01 10:15:00", "");
        assert!(end_after_start(&ok).is_valid());

        let same = timed("2005-01-01 10:00:00", "2005-01-01 10:00:00", "");
        assert!(!end_after_start(&same).is_valid());

        let reversed = timed("2005-01-01 10:15:00", "2005-01-01 10:00:00", "");
        assert!(!end_after_start(&reversed).is_valid());
    }

    #[test]
    fn test_end_after_start_with_split_start_controls() {
        let values = FormValues::new()
            .with(FieldName::Date, "2005-01-01")
            .with(FieldName::Time, "10:00:00")
            .with(FieldName::EndTime, "2005-01-01 09:00:00");
        assert!(!end_after_start(&values).is_valid());
    }

    #[test]
    fn test_total_time_tolerance_boundary() {
        let t = Tolerances::default();
        let start = "2005-01-01 10:00:00";
        let end = "2005-01-01 10:15:00";

        assert!(total_time_consistent(&timed(start, end, "0:15:00"), &t).is_valid());
        assert!(total_time_consistent(&timed(start, end, "0:14:00.001"), &t).is_valid());
        assert!(!total_time_consistent(&timed(start, end, "0:14:00"), &t).is_valid());
        assert!(!total_time_consistent(&timed(start, end, "0:16:00"), &t).is_valid());
    }

    #[test]
    fn test_total_time_message_shows_elapsed() {
        let t = Tolerances::default();
        let outcome = total_time_consistent(
            &timed("2005-01-01 10:00:00", "2005-01-01 10:15:00", "0:30:00"),
            &t,
        );
        assert_eq!(
            outcome.message(),
            Some("Total time is inconsistent with the start and end times (elapsed 00:15:00)")
        );
    }

    #[test]
    fn test_total_time_missing_inputs_pass() {
        let t = Tolerances::default();
        assert!(total_time_consistent(&timed("", "2005-01-01 10:15:00", "0:30:00"), &t).is_valid());
        let unparsed_total = timed("2005-01-01 10:00:00", "2005-01-01 10:15:00", "15");
        assert!(total_time_consistent(&unparsed_total, &t).is_valid());
    }

    #[test]
    fn test_rolling_time_below_total_time() {
        let values = |total: &str, rolling: &str| {
            FormValues::new()
                .with(FieldName::TotalTime, total)
                .with(FieldName::RollingTime, rolling)
        };
        assert!(total_time_gte_rolling_time(&values("0:15:00", "0:12:00")).is_valid());
        assert!(!total_time_gte_rolling_time(&values("0:15:00", "0:15:00")).is_valid());
        assert!(!total_time_gte_rolling_time(&values("0:12:00", "0:15:00")).is_valid());
        assert!(total_time_gte_rolling_time(&values("0:12", "0:15:00")).is_valid());
    }
}
