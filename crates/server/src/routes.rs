use axum::{middleware, routing::get, Json, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::{errors, middleware::correlate, openapi::ApiDoc, state::AppState};

pub mod cars;
pub mod reservations;

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: health, API docs, cars and reservations.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route(cars::CARS_PATH, get(cars::list).post(cars::create))
        .route("/api/v1/car/:id", get(cars::get).put(cars::update).delete(cars::delete))
        .route(reservations::RESERVATIONS_PATH, get(reservations::list).post(reservations::create))
        .route("/api/v1/reservation/:id", get(reservations::get))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(api)
        // innermost first: panics become 500s while the correlation id is still in scope
        .layer(CatchPanicLayer::custom(errors::panic_response))
        .layer(middleware::from_fn(correlate))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
