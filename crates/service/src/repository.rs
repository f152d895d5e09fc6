use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Car, Reservation};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("storage failure: {0}")]
    Persistence(String),
    /// The storage-level exclusion rule refused a second overlapping booking.
    #[error("car {car_id} already has a reservation overlapping the requested window")]
    OverlappingReservation { car_id: Uuid },
    /// The car a reservation points at is gone, e.g. deleted after the lookup.
    #[error("car {car_id} does not exist")]
    CarNotFound { car_id: Uuid },
}

/// Persistence of car records.
#[async_trait]
pub trait CarRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Car>, RepositoryError>;
    async fn get_all(&self) -> Result<Vec<Car>, RepositoryError>;
    async fn create(&self, car: &Car) -> Result<Car, RepositoryError>;
    /// Overwrites the row with `car.id`; callers check existence first.
    async fn update(&self, car: &Car) -> Result<(), RepositoryError>;
    async fn delete(&self, car: &Car) -> Result<(), RepositoryError>;
    async fn find_by_unique_identifier(&self, identifier: &str) -> Result<Option<Car>, RepositoryError>;
}

/// Reservations and availability.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Cars without any reservation `r` where `r.start < end && r.end > start`,
    /// each car at most once, ascending by id.
    async fn find_available_cars(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Car>, RepositoryError>;
    /// Fails with [`RepositoryError::OverlappingReservation`] when the car is
    /// already booked for an intersecting window, and with
    /// [`RepositoryError::CarNotFound`] when the car no longer exists.
    async fn create_reservation(&self, reservation: &Reservation) -> Result<(), RepositoryError>;
    async fn get_reservation_by_id(&self, id: Uuid) -> Result<Option<Reservation>, RepositoryError>;
    async fn get_all_reservations(&self) -> Result<Vec<Reservation>, RepositoryError>;
}

/// In-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    struct Tables {
        cars: BTreeMap<Uuid, Car>,
        reservations: Vec<Reservation>,
    }

    /// Keeps both tables behind one lock, so the overlap check and the insert
    /// of a reservation happen atomically, mirroring the database constraint.
    #[derive(Default)]
    pub struct MemoryRepository {
        tables: Mutex<Tables>,
        writes: AtomicUsize,
        offline: AtomicBool,
    }

    impl MemoryRepository {
        pub fn new() -> Self { Self::default() }

        /// Number of successful mutating calls so far.
        pub fn write_count(&self) -> usize { self.writes.load(Ordering::SeqCst) }

        /// While offline every call fails with [`RepositoryError::Persistence`].
        pub fn set_offline(&self, offline: bool) { self.offline.store(offline, Ordering::SeqCst); }

        fn tables(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(RepositoryError::Persistence("storage offline".into()));
            }
            self.tables.lock().map_err(|_| RepositoryError::Persistence("memory store poisoned".into()))
        }

        fn wrote(&self) { self.writes.fetch_add(1, Ordering::SeqCst); }
    }

    #[async_trait]
    impl CarRepository for MemoryRepository {
        async fn get_by_id(&self, id: Uuid) -> Result<Option<Car>, RepositoryError> {
            Ok(self.tables()?.cars.get(&id).cloned())
        }

        async fn get_all(&self) -> Result<Vec<Car>, RepositoryError> {
            Ok(self.tables()?.cars.values().cloned().collect())
        }

        async fn create(&self, car: &Car) -> Result<Car, RepositoryError> {
            let mut t = self.tables()?;
            if t.cars.values().any(|c| c.unique_identifier == car.unique_identifier) {
                return Err(RepositoryError::Persistence(format!(
                    "duplicate unique_identifier {}",
                    car.unique_identifier
                )));
            }
            t.cars.insert(car.id, car.clone());
            self.wrote();
            Ok(car.clone())
        }

        async fn update(&self, car: &Car) -> Result<(), RepositoryError> {
            let mut t = self.tables()?;
            if let Some(existing) = t.cars.get_mut(&car.id) {
                *existing = car.clone();
            }
            self.wrote();
            Ok(())
        }

        async fn delete(&self, car: &Car) -> Result<(), RepositoryError> {
            let mut t = self.tables()?;
            t.cars.remove(&car.id);
            t.reservations.retain(|r| r.car_id != car.id);
            self.wrote();
            Ok(())
        }

        async fn find_by_unique_identifier(&self, identifier: &str) -> Result<Option<Car>, RepositoryError> {
            Ok(self.tables()?.cars.values().find(|c| c.unique_identifier == identifier).cloned())
        }
    }

    #[async_trait]
    impl ReservationRepository for MemoryRepository {
        async fn find_available_cars(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Car>, RepositoryError> {
            let t = self.tables()?;
            let available = t
                .cars
                .values()
                .filter(|car| !t.reservations.iter().any(|r| r.car_id == car.id && r.overlaps(start, end)))
                .cloned()
                .collect();
            Ok(available)
        }

        async fn create_reservation(&self, reservation: &Reservation) -> Result<(), RepositoryError> {
            let mut t = self.tables()?;
            if !t.cars.contains_key(&reservation.car_id) {
                return Err(RepositoryError::CarNotFound { car_id: reservation.car_id });
            }
            let clash = t.reservations.iter().any(|r| {
                r.car_id == reservation.car_id && r.overlaps(reservation.reservation_start, reservation.reservation_end)
            });
            if clash {
                return Err(RepositoryError::OverlappingReservation { car_id: reservation.car_id });
            }
            t.reservations.push(reservation.clone());
            self.wrote();
            Ok(())
        }

        async fn get_reservation_by_id(&self, id: Uuid) -> Result<Option<Reservation>, RepositoryError> {
            Ok(self.tables()?.reservations.iter().find(|r| r.id == id).cloned())
        }

        async fn get_all_reservations(&self) -> Result<Vec<Reservation>, RepositoryError> {
            Ok(self.tables()?.reservations.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MemoryRepository;
    use super::*;
    use chrono::Duration;

    fn car(ident: &str) -> Car {
        Car { id: Uuid::new_v4(), make: "Mazda".into(), model: "3".into(), unique_identifier: ident.into() }
    }

    fn booking(car_id: Uuid, start: DateTime<Utc>, minutes: i64) -> Reservation {
        Reservation {
            id: Uuid::new_v4(),
            car_id,
            reservation_start: start,
            duration_in_minutes: minutes as i32,
            reservation_end: start + Duration::minutes(minutes),
        }
    }

    #[tokio::test]
    async fn car_without_reservations_is_always_available() {
        let repo = MemoryRepository::new();
        let c = repo.create(&car("C1")).await.unwrap();
        let now = Utc::now();
        for (s, e) in [(now, now + Duration::minutes(1)), (now - Duration::days(3), now + Duration::days(3))] {
            let found = repo.find_available_cars(s, e).await.unwrap();
            assert_eq!(found, vec![c.clone()]);
        }
    }

    #[tokio::test]
    async fn overlapping_windows_exclude_car_and_disjoint_windows_include_it() {
        let repo = MemoryRepository::new();
        let c = repo.create(&car("C1")).await.unwrap();
        let base = Utc::now() + Duration::hours(1);
        repo.create_reservation(&booking(c.id, base, 120)).await.unwrap();

        let inside = repo.find_available_cars(base + Duration::minutes(30), base + Duration::minutes(90)).await.unwrap();
        assert!(inside.is_empty());
        let straddling = repo.find_available_cars(base - Duration::minutes(30), base + Duration::minutes(1)).await.unwrap();
        assert!(straddling.is_empty());

        let before = repo.find_available_cars(base - Duration::minutes(60), base).await.unwrap();
        assert_eq!(before.len(), 1);
        let after = repo.find_available_cars(base + Duration::minutes(120), base + Duration::minutes(180)).await.unwrap();
        assert_eq!(after.len(), 1);
    }

    #[tokio::test]
    async fn car_with_several_disjoint_reservations_listed_once() {
        let repo = MemoryRepository::new();
        let c = repo.create(&car("C1")).await.unwrap();
        let base = Utc::now();
        repo.create_reservation(&booking(c.id, base, 30)).await.unwrap();
        repo.create_reservation(&booking(c.id, base + Duration::hours(2), 30)).await.unwrap();
        let found = repo.find_available_cars(base + Duration::hours(1), base + Duration::minutes(90)).await.unwrap();
        assert_eq!(found, vec![c]);
    }

    #[tokio::test]
    async fn second_overlapping_reservation_is_refused() {
        let repo = MemoryRepository::new();
        let c = repo.create(&car("C1")).await.unwrap();
        let base = Utc::now();
        repo.create_reservation(&booking(c.id, base, 60)).await.unwrap();
        let err = repo.create_reservation(&booking(c.id, base + Duration::minutes(30), 60)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::OverlappingReservation { car_id } if car_id == c.id));
        assert_eq!(repo.get_all_reservations().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn reservation_for_missing_car_is_refused() {
        let repo = MemoryRepository::new();
        let ghost = Uuid::new_v4();
        let err = repo.create_reservation(&booking(ghost, Utc::now(), 30)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::CarNotFound { car_id } if car_id == ghost));
        assert_eq!(repo.write_count(), 0);
    }

    #[tokio::test]
    async fn reservation_is_found_by_id() {
        let repo = MemoryRepository::new();
        let c = repo.create(&car("C1")).await.unwrap();
        let r = booking(c.id, Utc::now(), 15);
        repo.create_reservation(&r).await.unwrap();
        assert_eq!(repo.get_reservation_by_id(r.id).await.unwrap(), Some(r));
        assert!(repo.get_reservation_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn available_cars_sorted_by_id() {
        let repo = MemoryRepository::new();
        for i in 0..5 {
            repo.create(&car(&format!("C{i}"))).await.unwrap();
        }
        let now = Utc::now();
        let ids: Vec<Uuid> = repo.find_available_cars(now, now + Duration::minutes(5)).await.unwrap().into_iter().map(|c| c.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn deleting_car_drops_its_reservations() {
        let repo = MemoryRepository::new();
        let c = repo.create(&car("C1")).await.unwrap();
        repo.create_reservation(&booking(c.id, Utc::now(), 10)).await.unwrap();
        repo.delete(&c).await.unwrap();
        assert!(repo.get_all_reservations().await.unwrap().is_empty());
        assert!(repo.get_by_id(c.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn offline_store_reports_persistence_errors() {
        let repo = MemoryRepository::new();
        repo.set_offline(true);
        assert!(matches!(repo.get_all().await, Err(RepositoryError::Persistence(_))));
        assert!(matches!(repo.create(&car("C9")).await, Err(RepositoryError::Persistence(_))));
    }
}
