//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer after the validation guard has passed.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use tracing::warn;

use super::dto::{
    CreateMeasurementRequest, HealthResponse, ListMeasurementsQuery, MeasurementResponse,
    StatusInfo,
};
use super::error::AppError;
use super::state::AppState;
use crate::routes::status::api_version;
use crate::services::{self, validation};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Status & Health
// =============================================================================

/// GET /status
///
/// Liveness probe. Returns a fixed payload and never touches the store.
pub async fn status() -> Json<StatusInfo> {
    Json(StatusInfo::current())
}

/// GET /health
///
/// Reports whether the store is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let database = match state.repository.health_check().await {
        Ok(true) => "connected",
        Ok(false) => "disconnected",
        Err(e) => {
            warn!("Health check failed: {}", e);
            "error"
        }
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: api_version(),
        database: database.to_string(),
    }))
}

// =============================================================================
// Measurements
// =============================================================================

/// POST /measurements
///
/// Validate and record one measurement. Responds 201 with the stored record.
pub async fn create_measurement(
    State(state): State<AppState>,
    payload: Result<Json<CreateMeasurementRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MeasurementResponse>), AppError> {
    let Json(request) = payload?;
    let measurement = validation::validate_create_request(&request)?;

    let created = services::record_measurement(state.repository.as_ref(), measurement).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /measurements
///
/// List stored measurements, newest first. `?limit=N` caps the result.
pub async fn list_measurements(
    State(state): State<AppState>,
    query: Result<Query<ListMeasurementsQuery>, QueryRejection>,
) -> HandlerResult<Vec<MeasurementResponse>> {
    let Query(query) = query?;
    let options = validation::validate_limit(
        query.limit,
        state.config.default_list_limit,
        state.config.max_list_limit,
    )?;

    let measurements =
        services::get_recent_measurements(state.repository.as_ref(), &options).await?;
    Ok(Json(measurements))
}
