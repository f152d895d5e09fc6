use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::{Reservation, ReservationRequest, ReservationResponse};
use crate::errors::ServiceError;
use crate::repository::{RepositoryError, ReservationRepository};
use crate::result::OperationResult;

pub const NO_CARS_AVAILABLE: &str = "No cars available for the selected dates.";
pub const DEGENERATE_DURATION: &str = "The duration of your reservation must be at least one minute.";

/// Allocates a free car for a requested time window.
pub struct ReservationService<R: ReservationRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: ReservationRepository + ?Sized> ReservationService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub async fn get_all(&self) -> Result<Vec<Reservation>, ServiceError> {
        Ok(self.repo.get_all_reservations().await?)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Reservation>, ServiceError> {
        Ok(self.repo.get_reservation_by_id(id).await?)
    }

    /// Book the first available car (ascending id) for
    /// `[start_date, start_date + duration_in_minutes)`.
    ///
    /// A candidate that loses a concurrent race, or is deleted after the
    /// lookup, is skipped and the next one is tried; the call fails only when
    /// every candidate is taken.
    ///
    /// # Examples
    /// ```
    /// use service::{ReservationService, domain::ReservationRequest, repository::mock::MemoryRepository};
    /// use std::sync::Arc;
    /// let svc = ReservationService::new(Arc::new(MemoryRepository::new()));
    /// let req = ReservationRequest { start_date: chrono::Utc::now(), duration_in_minutes: 30 };
    /// let outcome = tokio_test::block_on(svc.create_reservation(req)).unwrap();
    /// assert_eq!(outcome.message(), Some("No cars available for the selected dates."));
    /// ```
    #[instrument(skip(self, request), fields(start = %request.start_date, duration = request.duration_in_minutes))]
    pub async fn create_reservation(
        &self,
        request: ReservationRequest,
    ) -> Result<OperationResult<ReservationResponse>, ServiceError> {
        let Some(end) = request.end_date() else {
            return Ok(OperationResult::failure(DEGENERATE_DURATION));
        };
        let start = request.start_date;

        let candidates = self.repo.find_available_cars(start, end).await?;
        for car in candidates {
            let reservation = Reservation {
                id: Uuid::new_v4(),
                car_id: car.id,
                reservation_start: start,
                duration_in_minutes: request.duration_in_minutes,
                reservation_end: end,
            };
            match self.repo.create_reservation(&reservation).await {
                Ok(()) => {
                    info!(reservation_id = %reservation.id, car_id = %car.id, "reservation_created");
                    return Ok(OperationResult::success(ReservationResponse::new(&reservation, &car)));
                }
                Err(RepositoryError::OverlappingReservation { car_id }) => {
                    warn!(%car_id, "candidate taken concurrently, trying next");
                }
                Err(RepositoryError::CarNotFound { car_id }) => {
                    warn!(%car_id, "candidate deleted concurrently, trying next");
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!("no car available");
        Ok(OperationResult::failure(NO_CARS_AVAILABLE))
    }
}
