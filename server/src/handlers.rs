use appointment_db::{Appointment, AppointmentStatus, AppointmentUpdate, DateCounts};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};

use crate::error::ApiError;
use crate::models::{AppointmentList, ListParams, NewAppointment, StatusChange};
use crate::AppState;

/// GET /appointments
/// List appointments narrowed by search, date, tab and status
pub async fn list_appointments(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<AppointmentList>, ApiError> {
    let Query(params) = params?;
    let query = params.into_query()?;

    let store = state.store.read().await;
    let appointments = store.query(&query, state.reference_date);
    tracing::debug!(?query, matched = appointments.len(), "appointments listed");

    Ok(Json(AppointmentList::new(appointments)))
}

/// GET /appointments/counts
/// Appointment count per date over the full listing
pub async fn appointment_counts(State(state): State<AppState>) -> Json<DateCounts> {
    let counts = state.store.read().await.counts_by_date();
    Json(counts)
}

/// GET /appointments/{id}
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
    let appointment = state.store.read().await.get(&id);
    appointment.map(Json).ok_or_else(|| ApiError::not_found(&id))
}

/// POST /appointments
/// Create a new appointment
pub async fn create_appointment(
    State(state): State<AppState>,
    payload: Result<Json<NewAppointment>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap, Json<Appointment>), ApiError> {
    let Json(payload) = payload?;
    let appointment = payload.into_appointment();

    let location = HeaderValue::from_str(&format!("/appointments/{}", appointment.id))
        .map_err(|_| ApiError::validation("id", "id must be usable in a URL path"))?;

    let created = state.store.write().await.create(appointment)?;
    tracing::info!(id = %created.id, date = %created.date, "appointment booked");

    let mut headers = HeaderMap::new();
    headers.insert(header::LOCATION, location);
    Ok((StatusCode::CREATED, headers, Json(created)))
}

/// PATCH /appointments/{id}/status
/// Confirm, cancel, undo a cancellation or complete an appointment
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusChange>, JsonRejection>,
) -> Result<Json<Appointment>, ApiError> {
    let Json(StatusChange { status }) = payload?;

    let mut store = state.store.write().await;
    let current = store.get(&id).ok_or_else(|| ApiError::not_found(&id))?;

    // `Upcoming` is left to the store, which rejects it as invalid input.
    if status != AppointmentStatus::Upcoming && !current.status.can_transition_to(status) {
        return Err(ApiError::conflict(format!(
            "cannot change status from {} to {}",
            current.status, status
        )));
    }

    let updated = store
        .update_status(&id, status)?
        .ok_or_else(|| ApiError::not_found(&id))?;
    tracing::info!(id = %id, from = %current.status, to = %status, "appointment status changed");

    Ok(Json(updated))
}

/// PATCH /appointments/{id}
/// Change patient name, date, time or other details
pub async fn update_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AppointmentUpdate>, JsonRejection>,
) -> Result<Json<Appointment>, ApiError> {
    let Json(update) = payload?;
    if update.is_empty() {
        return Err(ApiError::bad_request("update must change at least one field"));
    }

    let updated = state.store.write().await.update_details(&id, &update)?;
    match updated {
        Some(appointment) => {
            tracing::info!(id = %id, "appointment details changed");
            Ok(Json(appointment))
        }
        None => Err(ApiError::not_found(&id)),
    }
}

/// DELETE /appointments/{id}
/// Idempotent: deleting an unknown id also answers 204
pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> StatusCode {
    let removed = state.store.write().await.delete(&id);
    tracing::info!(id = %id, removed, "appointment delete requested");
    StatusCode::NO_CONTENT
}

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
