//! Declarative field → checks map of the ride form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::FieldName;
use crate::service::RemoteField;
use crate::validators::{Constraint, Predicate};

/// One check attached to a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    Constraint(Constraint),
    Predicate(Predicate),
    /// Odometer/distance consistency decided by the ride validation service.
    Remote(RemoteField),
}

impl Check {
    /// Evaluation order: constraints, then predicates, then remote checks.
    fn rank(&self) -> u8 {
        match self {
            Check::Constraint(_) => 0,
            Check::Predicate(_) => 1,
            Check::Remote(_) => 2,
        }
    }

    /// Fields this check reads when attached to `owner`.
    pub fn inputs(&self, owner: FieldName) -> Vec<FieldName> {
        match self {
            Check::Constraint(_) => vec![owner],
            Check::Predicate(predicate) => predicate.inputs(),
            Check::Remote(_) => vec![
                FieldName::Distance,
                FieldName::Odometer,
                FieldName::Equipment,
                FieldName::StartTime,
                FieldName::Date,
                FieldName::Time,
                FieldName::RideId,
            ],
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Check::Remote(_))
    }
}

impl From<Constraint> for Check {
    fn from(constraint: Constraint) -> Self {
        Check::Constraint(constraint)
    }
}

impl From<Predicate> for Check {
    fn from(predicate: Predicate) -> Self {
        Check::Predicate(predicate)
    }
}

impl From<RemoteField> for Check {
    fn from(field: RemoteField) -> Self {
        Check::Remote(field)
    }
}

/// Rules of every validated field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    rules: BTreeMap<FieldName, Vec<Check>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `checks` to `field`, appending to any existing ones.
    pub fn rule(mut self, field: FieldName, checks: &[Check]) -> Self {
        let entry = self.rules.entry(field).or_default();
        entry.extend_from_slice(checks);
        entry.sort_by_key(Check::rank);
        self
    }

    /// Default rules of the ride add/edit form.
    pub fn ride_form() -> Self {
        use Constraint::{Min, Number, Required, Step};
        use FieldName as F;

        Self::new()
            .rule(
                F::Distance,
                &[Min(0.0).into(), Number.into(), RemoteField::Distance.into()],
            )
            .rule(
                F::Odometer,
                &[Min(0.0).into(), Number.into(), RemoteField::Odometer.into()],
            )
            .rule(
                F::Maxspeed,
                &[
                    Min(0.0).into(),
                    Number.into(),
                    Step(0.1).into(),
                    Predicate::MaxspeedGteAvspeed.into(),
                ],
            )
            .rule(
                F::Avspeed,
                &[
                    Min(0.0).into(),
                    Number.into(),
                    Step(0.1).into(),
                    Predicate::AvspeedConsistent.into(),
                    Predicate::MaxspeedGteAvspeed.into(),
                ],
            )
            .rule(F::EndTime, &[Predicate::EndAfterStart.into()])
            .rule(
                F::TotalTime,
                &[
                    Predicate::TotalTimeConsistent.into(),
                    Predicate::TotalTimeGteRollingTime.into(),
                ],
            )
            .rule(F::RollingTime, &[Predicate::TotalTimeGteRollingTime.into()])
            .rule(F::Equipment, &[Required.into()])
    }

    pub fn checks(&self, field: FieldName) -> &[Check] {
        self.rules.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Fields that carry at least one check.
    pub fn fields(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.rules.keys().copied()
    }

    /// Fields whose checks read `changed`, in field order.
    pub fn dependents_of(&self, changed: FieldName) -> Vec<FieldName> {
        self.rules
            .iter()
            .filter(|(owner, checks)| {
                checks
                    .iter()
                    .any(|check| check.inputs(**owner).contains(&changed))
            })
            .map(|(owner, _)| *owner)
            .collect()
    }

    /// Drop the field's `Step` constraint. Returns true when one was removed.
    pub fn remove_step(&mut self, field: FieldName) -> bool {
        let Some(checks) = self.rules.get_mut(&field) else {
            return false;
        };
        let before = checks.len();
        checks.retain(|check| !matches!(check, Check::Constraint(c) if c.is_step()));
        checks.len() != before
    }
}
