use std::sync::Arc;

use service::repository::{CarRepository, ReservationRepository};
use service::{CarService, ReservationService};

/// Shared handler state. Storage is erased behind trait objects so the same
/// router runs over PostgreSQL or the in-memory repository.
#[derive(Clone)]
pub struct AppState {
    pub cars: Arc<CarService<dyn CarRepository>>,
    pub reservations: Arc<ReservationService<dyn ReservationRepository>>,
}

impl AppState {
    pub fn new<R>(repo: Arc<R>) -> Self
    where
        R: CarRepository + ReservationRepository + 'static,
    {
        let car_repo: Arc<dyn CarRepository> = repo.clone();
        let reservation_repo: Arc<dyn ReservationRepository> = repo;
        Self {
            cars: Arc::new(CarService::new(car_repo)),
            reservations: Arc::new(ReservationService::new(reservation_repo)),
        }
    }
}
