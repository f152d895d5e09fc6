//! Service layer for the car reservation API.
//! - `repository` is the storage access layer: traits plus an in-memory implementation.
//! - `repo::seaorm` backs those traits with PostgreSQL.
//! - `car_service` and `reservation_service` hold the business rules.
//! - Expected business outcomes travel as [`result::OperationResult`]; storage
//!   faults travel as [`errors::ServiceError`].

pub mod errors;
pub mod result;
pub mod domain;
pub mod repository;
pub mod repo;
pub mod car_service;
pub mod reservation_service;
#[cfg(test)]
pub mod test_support;

pub use car_service::CarService;
pub use reservation_service::ReservationService;
pub use result::OperationResult;
