use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarDoc { pub id: Uuid, pub make: String, pub model: String, pub unique_identifier: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCarDoc { pub make: String, pub model: String, pub unique_identifier: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarPatchDoc {
    pub make: Option<String>,
    pub model: Option<String>,
    pub unique_identifier: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequestDoc {
    pub start_date: chrono::DateTime<chrono::Utc>,
    pub duration_in_minutes: i32,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponseDoc {
    pub reservation_id: Uuid,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
    pub duration_in_minutes: i32,
    pub make: String,
    pub model: String,
    pub car_unique_identifier: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDoc {
    pub id: Uuid,
    pub car_id: Uuid,
    pub reservation_start: chrono::DateTime<chrono::Utc>,
    pub duration_in_minutes: i32,
    pub reservation_end: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDoc {
    pub message: String,
    pub errors: Option<Vec<String>>,
    pub correlation_id: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::cars::create,
        crate::routes::cars::list,
        crate::routes::cars::get,
        crate::routes::cars::update,
        crate::routes::cars::delete,
        crate::routes::reservations::create,
        crate::routes::reservations::list,
        crate::routes::reservations::get,
    ),
    components(
        schemas(
            HealthResponse,
            CarDoc,
            NewCarDoc,
            CarPatchDoc,
            ReservationRequestDoc,
            ReservationResponseDoc,
            ReservationDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "car"),
        (name = "reservation")
    )
)]
pub struct ApiDoc;
