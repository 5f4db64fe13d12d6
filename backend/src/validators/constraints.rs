//! Single-field constraints declared next to the named checks.

use serde::{Deserialize, Serialize};

use crate::models::parse_number;

use super::Outcome;

/// Static constraint on one field's raw value.
///
/// Blank values pass every constraint except [`Constraint::Required`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Constraint {
    Required,
    /// Value must parse as a finite number.
    Number,
    /// Numeric value must be at least this (inclusive).
    Min(f64),
    /// Numeric value must be a multiple of this step.
    Step(f64),
}

impl Constraint {
    pub fn check(&self, raw: Option<&str>) -> Outcome {
        let raw = raw.map(str::trim).unwrap_or("");
        if raw.is_empty() {
            return Outcome::check(!matches!(self, Constraint::Required), || {
                "This field is required.".to_string()
            });
        }

        match self {
            Constraint::Required => Outcome::Valid,
            Constraint::Number => Outcome::check(parse_number(raw).is_ok(), || {
                "Please enter a valid number.".to_string()
            }),
            // Non-numeric input is left to `Number`.
            Constraint::Min(min) => match parse_number(raw) {
                Ok(value) => Outcome::check(value >= *min, || {
                    format!("Please enter a value greater than or equal to {}.", min)
                }),
                Err(_) => Outcome::Valid,
            },
            Constraint::Step(step) => match parse_number(raw) {
                Ok(value) if *step > 0.0 => {
                    let multiples = value / step;
                    Outcome::check((multiples - multiples.round()).abs() < 1e-9, || {
                        format!("Please enter a multiple of {}.", step)
                    })
                }
                _ => Outcome::Valid,
            },
        }
    }

    pub fn is_step(&self) -> bool {
        matches!(self, Constraint::Step(_))
    }
}
