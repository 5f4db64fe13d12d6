//! HTTP handlers for the REST API.
//!
//! The `/rides/...` handlers serve the ride validation endpoints from the
//! in-memory ride store; `/v1/...` handlers manage rides and run form
//! validation passes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    HealthResponse, LastOdometerQuery, LastOdometerResponse, RecordRideRequest, RemoteVerdict,
    RideCheckRequest, RideRecord, ValidateFormRequest, ValidateFormResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::form::FormSession;
use crate::models::{parse_datetime, RideId};
use crate::service::{NewRide, RemoteField, RideValidationService};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let service_status = match state.service.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        service: service_status,
    }))
}

// =============================================================================
// Ride Validation Endpoints
// =============================================================================

/// GET /rides/last_odo?equipment_id=..&start_time=..
pub async fn last_odometer(
    State(state): State<AppState>,
    Query(query): Query<LastOdometerQuery>,
) -> HandlerResult<LastOdometerResponse> {
    let odometer = state.rides.last_odometer(&query).await?;
    Ok(Json(LastOdometerResponse { odometer }))
}

/// POST /rides/validation/distance
pub async fn validate_distance(
    State(state): State<AppState>,
    Json(request): Json<RideCheckRequest>,
) -> HandlerResult<RemoteVerdict> {
    let verdict = state
        .rides
        .validate_field(RemoteField::Distance, &request)
        .await?;
    Ok(Json(verdict))
}

/// POST /rides/validation/odometer
pub async fn validate_odometer(
    State(state): State<AppState>,
    Json(request): Json<RideCheckRequest>,
) -> HandlerResult<RemoteVerdict> {
    let verdict = state
        .rides
        .validate_field(RemoteField::Odometer, &request)
        .await?;
    Ok(Json(verdict))
}

// =============================================================================
// Rides
// =============================================================================

/// POST /v1/rides
pub async fn record_ride(
    State(state): State<AppState>,
    Json(request): Json<RecordRideRequest>,
) -> Result<(StatusCode, Json<RideRecord>), AppError> {
    let start_time = parse_datetime(&request.start_time)
        .map_err(|e| AppError::BadRequest(format!("Invalid start_time: {}", e)))?;
    if !(request.distance >= 0.0 && request.odometer >= 0.0) {
        return Err(AppError::BadRequest(
            "distance and odometer must be non-negative".to_string(),
        ));
    }

    let ride = state.rides.record_ride(NewRide {
        equipment_id: request.equipment_id,
        start_time,
        distance: request.distance,
        odometer: request.odometer,
    });

    Ok((StatusCode::CREATED, Json(ride)))
}

/// GET /v1/rides/{ride_id}
pub async fn get_ride(
    State(state): State<AppState>,
    Path(ride_id): Path<i64>,
) -> HandlerResult<RideRecord> {
    state
        .rides
        .get_ride(RideId::new(ride_id))
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Ride {} not found", ride_id)))
}

// =============================================================================
// Form Validation
// =============================================================================

/// POST /v1/forms/validate
///
/// Run a complete validation pass, remote checks included, over the
/// submitted values.
pub async fn validate_form(
    State(state): State<AppState>,
    Json(request): Json<ValidateFormRequest>,
) -> HandlerResult<ValidateFormResponse> {
    let mut session = FormSession::from_config(&state.config, state.service.clone());
    session.load_values(request.values.clone());
    for (field, parts) in request.duration_parts() {
        session
            .set_duration_parts(field, parts)
            .map_err(|e| AppError::BadRequest(format!("Invalid {}: {}", field, e)))?;
    }
    let submittable = session.submit().await;

    let validator = session.validator();
    let fields = validator
        .rules()
        .fields()
        .filter_map(|field| validator.outcome(field).map(|o| (field, o.clone())))
        .collect();

    Ok(Json(ValidateFormResponse {
        submittable,
        fields,
    }))
}
