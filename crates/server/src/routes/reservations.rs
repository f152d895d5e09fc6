use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use service::domain::ReservationRequest;
use service::OperationResult;

use crate::{errors::JsonApiError, state::AppState, validation};

pub const RESERVATIONS_PATH: &str = "/api/v1/reservation";

#[utoipa::path(
    post, path = "/api/v1/reservation", tag = "reservation",
    request_body = crate::openapi::ReservationRequestDoc,
    responses(
        (status = 201, description = "Reserved", body = crate::openapi::ReservationResponseDoc),
        (status = 400, description = "Validation failed", body = crate::openapi::ErrorDoc),
        (status = 409, description = "No car available", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Unexpected error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<ReservationRequest>,
) -> Result<Response, JsonApiError> {
    let errors = validation::validate_reservation_request(&request, Utc::now());
    if !errors.is_empty() {
        info!(count = errors.len(), "reservation_request_rejected");
        return Err(JsonApiError::validation(errors));
    }
    match state.reservations.create_reservation(request).await? {
        OperationResult::Success(details) => {
            let location = format!("{RESERVATIONS_PATH}/{}", details.reservation_id);
            Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(details)).into_response())
        }
        OperationResult::Failure(message) => Err(JsonApiError::conflict(message)),
    }
}

#[utoipa::path(
    get, path = "/api/v1/reservation", tag = "reservation",
    responses(
        (status = 200, description = "All reservations", body = [crate::openapi::ReservationDoc]),
        (status = 204, description = "No reservations")
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Response, JsonApiError> {
    let reservations = state.reservations.get_all().await?;
    if reservations.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(reservations).into_response())
}

#[utoipa::path(
    get, path = "/api/v1/reservation/{id}", tag = "reservation",
    params(("id" = Uuid, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Reservation", body = crate::openapi::ReservationDoc),
        (status = 204, description = "No reservation with this id")
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response, JsonApiError> {
    match state.reservations.get_by_id(id).await? {
        Some(reservation) => Ok(Json(reservation).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
