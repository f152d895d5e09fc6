use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;
use uuid::Uuid;

use service::domain::{CarPatch, NewCar};
use service::OperationResult;

use crate::{errors::JsonApiError, state::AppState, validation};

pub const CARS_PATH: &str = "/api/v1/car";

#[utoipa::path(
    post, path = "/api/v1/car", tag = "car",
    request_body = crate::openapi::NewCarDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::CarDoc),
        (status = 400, description = "Validation failed", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Unexpected error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(State(state): State<AppState>, Json(input): Json<NewCar>) -> Result<Response, JsonApiError> {
    let errors = validation::validate_new_car(&input, &*state.cars).await?;
    if !errors.is_empty() {
        info!(count = errors.len(), "car_create_rejected");
        return Err(JsonApiError::validation(errors));
    }
    let car = state.cars.create_car(input).await?;
    let location = format!("{CARS_PATH}/{}", car.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(car)).into_response())
}

#[utoipa::path(
    get, path = "/api/v1/car", tag = "car",
    responses(
        (status = 200, description = "All cars", body = [crate::openapi::CarDoc]),
        (status = 204, description = "No cars")
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Response, JsonApiError> {
    let cars = state.cars.get_all().await?;
    if cars.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    info!(count = cars.len(), "list cars");
    Ok(Json(cars).into_response())
}

#[utoipa::path(
    get, path = "/api/v1/car/{id}", tag = "car",
    params(("id" = Uuid, Path, description = "Car id")),
    responses(
        (status = 200, description = "Car", body = crate::openapi::CarDoc),
        (status = 204, description = "No car with this id")
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response, JsonApiError> {
    match state.cars.get_by_id(id).await? {
        Some(car) => Ok(Json(car).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

#[utoipa::path(
    put, path = "/api/v1/car/{id}", tag = "car",
    params(("id" = Uuid, Path, description = "Car id")),
    request_body = crate::openapi::CarPatchDoc,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Validation failed", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Car not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut patch): Json<CarPatch>,
) -> Result<Response, JsonApiError> {
    // the path id wins over any id in the body
    patch.id = id;
    let errors = validation::validate_car_patch(&patch, &*state.cars).await?;
    if !errors.is_empty() {
        return Err(JsonApiError::validation(errors));
    }
    match state.cars.update(patch).await? {
        OperationResult::Success(_) => Ok(StatusCode::NO_CONTENT.into_response()),
        OperationResult::Failure(message) => Err(JsonApiError::conflict(message)),
    }
}

#[utoipa::path(
    delete, path = "/api/v1/car/{id}", tag = "car",
    params(("id" = Uuid, Path, description = "Car id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 409, description = "Car not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response, JsonApiError> {
    match state.cars.delete(id).await? {
        OperationResult::Success(_) => Ok(StatusCode::NO_CONTENT.into_response()),
        OperationResult::Failure(message) => Err(JsonApiError::conflict(message)),
    }
}
