//! Async driver around [`FormValidator`].
//!
//! Remote checks run as spawned tokio tasks; their replies come back over an
//! mpsc channel and are applied by [`FormSession::poll`] or
//! [`FormSession::settle`]. A session must be used from within a tokio
//! runtime.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use super::validator::{
    Applied, FieldState, FormValidator, RemoteCall, RemoteReply, RemoteRequest, RemoteTicket,
};
use crate::config::ValidationConfig;
use crate::models::{DurationParts, FieldName, FormValues, ParseResult, RideDuration};
use crate::service::{RideValidationService, ServiceError, ServiceResult};

type Resolution = (RemoteTicket, ServiceResult<RemoteReply>);

pub struct FormSession {
    validator: FormValidator,
    service: Arc<dyn RideValidationService>,
    timeout: Duration,
    tx: mpsc::UnboundedSender<Resolution>,
    rx: mpsc::UnboundedReceiver<Resolution>,
    discarded: usize,
}

impl FormSession {
    pub fn new(
        validator: FormValidator,
        service: Arc<dyn RideValidationService>,
        timeout: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            validator,
            service,
            timeout,
            tx,
            rx,
            discarded: 0,
        }
    }

    /// Ride form session using the configured rules, tolerances and timeout.
    pub fn from_config(config: &ValidationConfig, service: Arc<dyn RideValidationService>) -> Self {
        Self::new(FormValidator::ride_form(config), service, config.timeout())
    }

    pub fn validator(&self) -> &FormValidator {
        &self.validator
    }

    pub fn load_values(&mut self, values: FormValues) {
        self.validator.load_values(values);
    }

    pub fn set_value(&mut self, field: FieldName, value: impl Into<String>) {
        let requests = self.validator.set_value(field, value);
        self.dispatch(requests);
    }

    pub fn clear_value(&mut self, field: FieldName) {
        let requests = self.validator.clear_value(field);
        self.dispatch(requests);
    }

    pub fn set_duration_parts(
        &mut self,
        field: FieldName,
        parts: &DurationParts,
    ) -> ParseResult<RideDuration> {
        let (parsed, requests) = self.validator.set_duration_parts(field, parts);
        self.dispatch(requests);
        parsed
    }

    pub fn validate_all(&mut self) {
        let requests = self.validator.validate_all();
        self.dispatch(requests);
    }

    fn dispatch(&self, requests: Vec<RemoteRequest>) {
        for RemoteRequest { ticket, call } in requests {
            let service = self.service.clone();
            let tx = self.tx.clone();
            let timeout = self.timeout;

            tokio::spawn(async move {
                let check = tokio::spawn(async move {
                    match tokio::time::timeout(timeout, run_call(service.as_ref(), call)).await {
                        Ok(result) => result,
                        Err(_) => Err(ServiceError::timeout(format!(
                            "no reply within {:?}",
                            timeout
                        ))
                        .with_operation("remote_check")),
                    }
                });
                // A panicking service call must still resolve the field.
                let result = match check.await {
                    Ok(result) => result,
                    Err(e) => {
                        log::error!("Remote check of {} aborted: {}", ticket.field, e);
                        Err(ServiceError::bad_response("remote check task failed")
                            .with_operation("remote_check"))
                    }
                };
                // The session may already be gone.
                let _ = tx.send((ticket, result));
            });
        }
    }

    fn apply(&mut self, (ticket, result): Resolution) -> Applied {
        let applied = self.validator.resolve(ticket, result);
        if applied == Applied::Stale {
            self.discarded += 1;
        }
        applied
    }

    /// Apply every reply that has already arrived. Returns how many changed
    /// a field's state.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(resolution) = self.rx.try_recv() {
            if self.apply(resolution) == Applied::Applied {
                applied += 1;
            }
        }
        applied
    }

    /// Wait until no field has a pending remote check.
    pub async fn settle(&mut self) {
        while self.validator.has_pending() {
            match self.rx.recv().await {
                Some(resolution) => {
                    self.apply(resolution);
                }
                None => break,
            }
        }
    }

    /// Validate every field without a settled outcome, wait for the remote
    /// checks and report whether the form may be submitted.
    pub async fn submit(&mut self) -> bool {
        let requests = self.validator.validate_unresolved();
        self.dispatch(requests);
        self.settle().await;
        let submittable = self.validator.is_submittable();
        if !submittable {
            log::debug!("Form submission blocked");
        }
        submittable
    }

    pub fn is_submittable(&self) -> bool {
        self.validator.is_submittable()
    }

    pub fn states(&self) -> BTreeMap<FieldName, FieldState> {
        self.validator.states()
    }

    /// Replies ignored because a newer check had replaced them.
    pub fn discarded_replies(&self) -> usize {
        self.discarded
    }
}

async fn run_call(
    service: &dyn RideValidationService,
    call: RemoteCall,
) -> ServiceResult<RemoteReply> {
    match call {
        RemoteCall::LastOdometer(query) => service
            .last_odometer(&query)
            .await
            .map(RemoteReply::LastOdometer),
        RemoteCall::Validate { field, request } => service
            .validate_field(field, &request)
            .await
            .map(RemoteReply::Verdict),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{LocalRideService, NewRide};
    use crate::validators::Outcome;
    use chrono::NaiveDate;

    fn service_with_previous_ride() -> Arc<LocalRideService> {
        let service = LocalRideService::new();
        service.record_ride(NewRide {
            equipment_id: crate::models::EquipmentId::new(1),
            start_time: NaiveDate::from_ymd_opt(2021, 9, 29)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            distance: 30.0,
            odometer: 100.0,
        });
        Arc::new(service)
    }

    fn values(odometer: &str) -> FormValues {
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

    #[tokio::test]
    async fn test_submit_with_consistent_odometer() {
        let mut session =
            FormSession::from_config(&ValidationConfig::default(), service_with_previous_ride());
        session.load_values(values("120.1"));
        assert!(session.submit().await);
    }

    #[tokio::test]
    async fn test_submit_blocked_by_odometer_mismatch() {
        let mut session =
            FormSession::from_config(&ValidationConfig::default(), service_with_previous_ride());
        session.load_values(values("120.2"));
        assert!(!session.submit().await);
        let states = session.states();
        assert!(matches!(
            &states[&FieldName::Odometer],
            FieldState::Resolved { outcome: Outcome::Invalid { .. } }
        ));
    }

    #[tokio::test]
    async fn test_offline_service_blocks_submission() {
        let service = service_with_previous_ride();
        service.set_healthy(false);
        let mut session = FormSession::from_config(&ValidationConfig::default(), service);
        session.load_values(values("120.1"));
        assert!(!session.submit().await);
        assert!(matches!(
            session.validator().outcome(FieldName::Distance),
            Some(Outcome::Unverified { .. })
        ));
    }
}
