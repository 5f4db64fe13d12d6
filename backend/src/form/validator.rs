//! Synchronous form rule engine.
//!
//! [`FormValidator`] owns the current form values and the per-field outcome
//! cache. Setting a value re-validates every field whose checks read it and
//! returns the remote requests the caller has to dispatch. Each request
//! carries a [`RemoteTicket`]; a reply is applied only while its ticket is the
//! field's current one, so a slow reply to an outdated value never overwrites
//! the outcome of a newer one.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::rules::{Check, RuleSet};
use crate::config::{OdometerMode, ValidationConfig};
use crate::models::{DurationParts, FieldName, FormValues, ParseResult, RideDuration};
use crate::service::{
    LastOdometerQuery, RemoteField, RemoteVerdict, RideCheckRequest, ServiceResult,
};
use crate::validators::odometer::odometer_consistent;
use crate::validators::{Outcome, Tolerances};

const ODOMETER_MISMATCH: &str = "Odometer value and ride distance do not match";

/// Identifies one dispatched remote check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteTicket {
    pub field: FieldName,
    pub seq: u64,
}

/// Validation state of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FieldState {
    Unchecked,
    Pending { ticket: RemoteTicket },
    Resolved { outcome: Outcome },
}

/// The service call a remote check needs.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    LastOdometer(LastOdometerQuery),
    Validate {
        field: RemoteField,
        request: RideCheckRequest,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRequest {
    pub ticket: RemoteTicket,
    pub call: RemoteCall,
}

/// Successful reply to a [`RemoteCall`].
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteReply {
    LastOdometer(Option<f64>),
    Verdict(RemoteVerdict),
}

/// Whether a reply changed the form state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    Stale,
}

pub struct FormValidator {
    rules: RuleSet,
    tolerances: Tolerances,
    odometer_mode: OdometerMode,
    values: FormValues,
    states: BTreeMap<FieldName, FieldState>,
    touched: BTreeSet<FieldName>,
    next_seq: u64,
}

impl FormValidator {
    pub fn new(rules: RuleSet, tolerances: Tolerances, odometer_mode: OdometerMode) -> Self {
        Self {
            rules,
            tolerances,
            odometer_mode,
            values: FormValues::new(),
            states: BTreeMap::new(),
            touched: BTreeSet::new(),
            next_seq: 1,
        }
    }

    /// Ride form rules with the configured tolerances and odometer mode.
    pub fn ride_form(config: &ValidationConfig) -> Self {
        Self::new(
            RuleSet::ride_form(),
            config.tolerances,
            config.service.odometer_mode,
        )
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Load initial values (e.g. an existing ride being edited) without
    /// validating or marking anything as touched.
    pub fn load_values(&mut self, values: FormValues) {
        self.values = values;
        self.states.clear();
    }

    /// Record a user edit and re-validate every affected field.
    pub fn set_value(&mut self, field: FieldName, value: impl Into<String>) -> Vec<RemoteRequest> {
        self.values.set(field, value);
        self.after_change(field)
    }

    pub fn clear_value(&mut self, field: FieldName) -> Vec<RemoteRequest> {
        self.values.clear(field);
        self.after_change(field)
    }

    /// Set a duration field from its decomposed controls.
    ///
    /// A valid combination is stored as `HH:MM:SS`; an invalid one clears the
    /// field and the parse error is returned alongside the requests.
    pub fn set_duration_parts(
        &mut self,
        field: FieldName,
        parts: &DurationParts,
    ) -> (ParseResult<RideDuration>, Vec<RemoteRequest>) {
        let parsed = RideDuration::from_parts(parts);
        let requests = match &parsed {
            Ok(duration) => self.set_value(field, duration.to_hms()),
            Err(_) => self.clear_value(field),
        };
        (parsed, requests)
    }

    fn after_change(&mut self, field: FieldName) -> Vec<RemoteRequest> {
        if self.touched.insert(field) && self.rules.remove_step(field) {
            log::debug!("Dropped step constraint of {} after first edit", field);
        }

        self.rules
            .dependents_of(field)
            .into_iter()
            .filter_map(|dependent| self.validate_field(dependent))
            .collect()
    }

    /// Validate one field. Local checks run in order and the first failure
    /// wins; when they all pass a remote check yields a request.
    pub fn validate_field(&mut self, field: FieldName) -> Option<RemoteRequest> {
        let mut remote = None;
        for check in self.rules.checks(field) {
            let outcome = match check {
                Check::Constraint(constraint) => constraint.check(self.values.get(field)),
                Check::Predicate(predicate) => predicate.evaluate(&self.values, &self.tolerances),
                Check::Remote(remote_field) => {
                    remote = remote.or(Some(*remote_field));
                    continue;
                }
            };
            if !outcome.is_valid() {
                self.states.insert(field, FieldState::Resolved { outcome });
                return None;
            }
        }

        let call = remote.and_then(|remote_field| self.remote_call(remote_field));
        match call {
            Some(call) => {
                let ticket = RemoteTicket {
                    field,
                    seq: self.next_seq,
                };
                self.next_seq += 1;
                self.states.insert(field, FieldState::Pending { ticket });
                Some(RemoteRequest { ticket, call })
            }
            None => {
                self.states.insert(
                    field,
                    FieldState::Resolved {
                        outcome: Outcome::Valid,
                    },
                );
                None
            }
        }
    }

    /// Validate every field that has rules.
    pub fn validate_all(&mut self) -> Vec<RemoteRequest> {
        let fields: Vec<_> = self.rules.fields().collect();
        fields
            .into_iter()
            .filter_map(|field| self.validate_field(field))
            .collect()
    }

    /// Validate the fields without a settled outcome: unchecked ones and
    /// those whose remote check could not be verified. Pending fields keep
    /// their in-flight request, and values are re-validated on every edit, so
    /// other resolved outcomes are current.
    pub fn validate_unresolved(&mut self) -> Vec<RemoteRequest> {
        let fields: Vec<_> = self
            .rules
            .fields()
            .filter(|field| match self.state(*field) {
                FieldState::Unchecked => true,
                FieldState::Pending { .. } => false,
                FieldState::Resolved { outcome } => {
                    matches!(outcome, Outcome::Unverified { .. })
                }
            })
            .collect();
        fields
            .into_iter()
            .filter_map(|field| self.validate_field(field))
            .collect()
    }

    /// `None` when the inputs do not parse yet; the field then passes locally.
    fn remote_call(&self, field: RemoteField) -> Option<RemoteCall> {
        let request = RideCheckRequest::from_values(&self.values)?;
        Some(match self.odometer_mode {
            OdometerMode::Delegated => RemoteCall::Validate { field, request },
            OdometerMode::LastOdometer => RemoteCall::LastOdometer(LastOdometerQuery {
                equipment_id: request.equipment_id,
                start_time: request.start_time,
            }),
        })
    }

    /// Apply the reply to a dispatched request.
    pub fn resolve(&mut self, ticket: RemoteTicket, reply: ServiceResult<RemoteReply>) -> Applied {
        let current = matches!(
            self.states.get(&ticket.field),
            Some(FieldState::Pending { ticket: pending }) if *pending == ticket
        );
        if !current {
            log::debug!(
                "Ignoring stale reply for {} (seq {})",
                ticket.field,
                ticket.seq
            );
            return Applied::Stale;
        }

        let outcome = match reply {
            Ok(RemoteReply::LastOdometer(previous)) => {
                odometer_consistent(&self.values, previous, &self.tolerances)
            }
            Ok(RemoteReply::Verdict(verdict)) if verdict.valid => Outcome::Valid,
            Ok(RemoteReply::Verdict(verdict)) => Outcome::invalid(
                verdict
                    .message
                    .unwrap_or_else(|| ODOMETER_MISMATCH.to_string()),
            ),
            Err(e) => {
                log::warn!("Remote check of {} failed: {}", ticket.field, e);
                Outcome::unverified(format!("Could not verify {}: {}", ticket.field, e))
            }
        };

        self.states
            .insert(ticket.field, FieldState::Resolved { outcome });
        Applied::Applied
    }

    pub fn state(&self, field: FieldName) -> &FieldState {
        self.states.get(&field).unwrap_or(&FieldState::Unchecked)
    }

    /// Resolved outcome of the field, `None` while unchecked or pending.
    pub fn outcome(&self, field: FieldName) -> Option<&Outcome> {
        match self.states.get(&field) {
            Some(FieldState::Resolved { outcome }) => Some(outcome),
            _ => None,
        }
    }

    /// Tickets of the remote checks still awaiting a reply.
    pub fn pending(&self) -> Vec<RemoteTicket> {
        self.states
            .values()
            .filter_map(|state| match state {
                FieldState::Pending { ticket } => Some(*ticket),
                _ => None,
            })
            .collect()
    }

    pub fn has_pending(&self) -> bool {
        self.states
            .values()
            .any(|state| matches!(state, FieldState::Pending { .. }))
    }

    /// True when every field with rules has resolved to `Valid`.
    pub fn is_submittable(&self) -> bool {
        self.rules
            .fields()
            .all(|field| matches!(self.outcome(field), Some(Outcome::Valid)))
    }

    /// State of every field with rules.
    pub fn states(&self) -> BTreeMap<FieldName, FieldState> {
        self.rules
            .fields()
            .map(|field| (field, self.state(field).clone()))
            .collect()
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
