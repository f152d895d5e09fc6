use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Car (business view)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub unique_identifier: String,
}

/// Car creation input; the id is assigned by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCar {
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub unique_identifier: String,
}

/// Sparse update. `None` and empty strings leave the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarPatch {
    #[serde(default)]
    pub id: Uuid,
    pub make: Option<String>,
    pub model: Option<String>,
    pub unique_identifier: Option<String>,
}

impl CarPatch {
    /// Overwrite each field of `car` for which the patch carries a non-empty value.
    pub fn apply_to(&self, car: &mut Car) {
        fn merge(target: &mut String, incoming: &Option<String>) {
            if let Some(value) = incoming.as_deref().filter(|v| !v.is_empty()) {
                *target = value.to_string();
            }
        }
        merge(&mut car.make, &self.make);
        merge(&mut car.model, &self.model);
        merge(&mut car.unique_identifier, &self.unique_identifier);
    }
}

/// Committed booking of one car for `[reservation_start, reservation_end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,
    pub car_id: Uuid,
    pub reservation_start: DateTime<Utc>,
    pub duration_in_minutes: i32,
    pub reservation_end: DateTime<Utc>,
}

impl Reservation {
    /// Half-open interval overlap with `[start, end)`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.reservation_start < end && self.reservation_end > start
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    pub start_date: DateTime<Utc>,
    pub duration_in_minutes: i32,
}

impl ReservationRequest {
    /// `start_date + duration_in_minutes`, or `None` when the window is empty or unrepresentable.
    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        if self.duration_in_minutes < 1 {
            return None;
        }
        self.start_date.checked_add_signed(Duration::minutes(i64::from(self.duration_in_minutes)))
    }
}

/// Reservation joined with the assigned car, as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub reservation_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_in_minutes: i32,
    pub make: String,
    pub model: String,
    pub car_unique_identifier: String,
}

impl ReservationResponse {
    pub fn new(reservation: &Reservation, car: &Car) -> Self {
        Self {
            reservation_id: reservation.id,
            start_time: reservation.reservation_start,
            end_time: reservation.reservation_end,
            duration_in_minutes: reservation.duration_in_minutes,
            make: car.make.clone(),
            model: car.model.clone(),
            car_unique_identifier: car.unique_identifier.clone(),
        }
    }
}

impl From<models::car::Model> for Car {
    fn from(m: models::car::Model) -> Self {
        Self { id: m.id, make: m.make, model: m.model, unique_identifier: m.unique_identifier }
    }
}

impl From<models::reservation::Model> for Reservation {
    fn from(m: models::reservation::Model) -> Self {
        Self {
            id: m.id,
            car_id: m.car_id,
            reservation_start: m.reservation_start,
            duration_in_minutes: m.duration_in_minutes,
            reservation_end: m.reservation_end,
        }
    }
}
