//! Input checks applied before a request reaches the service layer.
//! Each validator returns every failing message, in field order.

use chrono::{DateTime, Duration, Utc};

use service::domain::{CarPatch, NewCar, ReservationRequest};
use service::errors::ServiceError;
use service::repository::CarRepository;
use service::CarService;

pub const NOT_UNIQUE: &str = "UniqueIdentifier must be unique.";
pub const START_OUT_OF_RANGE: &str = "The start date of your reservation must be within the next 24 hours.";
pub const DURATION_OUT_OF_RANGE: &str = "The duration of your reservation must be between 1 and 120 minutes.";

pub const MAX_LEAD_HOURS: i64 = 24;
pub const MIN_DURATION_MINUTES: i32 = 1;
pub const MAX_DURATION_MINUTES: i32 = 120;

fn push_err(errors: &mut Vec<String>, check: Result<(), models::errors::ModelError>) {
    if let Err(models::errors::ModelError::Validation(msg)) = check {
        errors.push(msg);
    }
}

pub async fn validate_new_car<R>(input: &NewCar, cars: &CarService<R>) -> Result<Vec<String>, ServiceError>
where
    R: CarRepository + ?Sized,
{
    let mut errors = Vec::new();
    push_err(&mut errors, models::car::validate_make(&input.make));
    push_err(&mut errors, models::car::validate_model(&input.model));
    match models::car::validate_unique_identifier(&input.unique_identifier) {
        Ok(()) => {
            if !cars.is_unique_identifier_unique(&input.unique_identifier).await? {
                errors.push(NOT_UNIQUE.to_string());
            }
        }
        check => push_err(&mut errors, check),
    }
    Ok(errors)
}

/// Only a non-empty identifier is checked; it may stay equal to the car's own.
/// An unknown target yields no errors so the update reports it as not found.
pub async fn validate_car_patch<R>(patch: &CarPatch, cars: &CarService<R>) -> Result<Vec<String>, ServiceError>
where
    R: CarRepository + ?Sized,
{
    let mut errors = Vec::new();
    let Some(ident) = patch.unique_identifier.as_deref().filter(|v| !v.is_empty()) else {
        return Ok(errors);
    };
    if !models::car::is_valid_unique_identifier(ident) {
        push_err(&mut errors, models::car::validate_unique_identifier(ident));
        return Ok(errors);
    }
    let Some(target) = cars.get_by_id(patch.id).await? else {
        return Ok(errors);
    };
    if target.unique_identifier != ident && !cars.is_unique_identifier_unique(ident).await? {
        errors.push(NOT_UNIQUE.to_string());
    }
    Ok(errors)
}

pub fn validate_reservation_request(request: &ReservationRequest, now: DateTime<Utc>) -> Vec<String> {
    let mut errors = Vec::new();
    let latest = now + Duration::hours(MAX_LEAD_HOURS);
    if request.start_date < now || request.start_date > latest {
        errors.push(START_OUT_OF_RANGE.to_string());
    }
    if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&request.duration_in_minutes) {
        errors.push(DURATION_OUT_OF_RANGE.to_string());
    }
    errors
}
