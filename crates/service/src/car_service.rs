use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::{Car, CarPatch, NewCar};
use crate::errors::ServiceError;
use crate::repository::CarRepository;
use crate::result::OperationResult;

pub fn car_not_found(id: Uuid) -> String {
    format!("Car with id: {id} was not found!")
}

/// Car lifecycle: create, read, sparse update, delete.
///
/// Uniqueness of `unique_identifier` is enforced by the caller through
/// [`CarService::is_unique_identifier_unique`] before [`CarService::create_car`].
pub struct CarService<R: CarRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: CarRepository + ?Sized> CarService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Persist a new car under a freshly generated id.
    ///
    /// # Examples
    /// ```
    /// use service::{CarService, domain::NewCar, repository::mock::MemoryRepository};
    /// use std::sync::Arc;
    /// let svc = CarService::new(Arc::new(MemoryRepository::new()));
    /// let input = NewCar { make: "Toyota".into(), model: "Corolla".into(), unique_identifier: "C1".into() };
    /// let car = tokio_test::block_on(svc.create_car(input)).unwrap();
    /// assert_eq!(car.unique_identifier, "C1");
    /// ```
    #[instrument(skip(self, input), fields(unique_identifier = %input.unique_identifier))]
    pub async fn create_car(&self, input: NewCar) -> Result<Car, ServiceError> {
        let car = Car {
            id: Uuid::new_v4(),
            make: input.make,
            model: input.model,
            unique_identifier: input.unique_identifier,
        };
        let created = self.repo.create(&car).await?;
        info!(car_id = %created.id, unique_identifier = %created.unique_identifier, "car_created");
        Ok(created)
    }

    pub async fn is_unique_identifier_unique(&self, identifier: &str) -> Result<bool, ServiceError> {
        Ok(self.repo.find_by_unique_identifier(identifier).await?.is_none())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Car>, ServiceError> {
        Ok(self.repo.get_by_id(id).await?)
    }

    pub async fn get_all(&self) -> Result<Vec<Car>, ServiceError> {
        Ok(self.repo.get_all().await?)
    }

    /// Merge-patch an existing car; only non-empty fields overwrite.
    ///
    /// # Examples
    /// ```
    /// use service::{CarService, domain::CarPatch, repository::mock::MemoryRepository};
    /// use std::sync::Arc;
    /// let svc = CarService::new(Arc::new(MemoryRepository::new()));
    /// let id = uuid::Uuid::new_v4();
    /// let patch = CarPatch { id, make: Some("Kia".into()), ..CarPatch::default() };
    /// let outcome = tokio_test::block_on(svc.update(patch)).unwrap();
    /// assert_eq!(outcome.message(), Some(format!("Car with id: {id} was not found!").as_str()));
    /// ```
    #[instrument(skip(self, patch), fields(car_id = %patch.id))]
    pub async fn update(&self, patch: CarPatch) -> Result<OperationResult<bool>, ServiceError> {
        let Some(mut car) = self.repo.get_by_id(patch.id).await? else {
            debug!("update target missing");
            return Ok(OperationResult::failure(car_not_found(patch.id)));
        };
        patch.apply_to(&mut car);
        self.repo.update(&car).await?;
        info!(car_id = %car.id, "car_updated");
        Ok(OperationResult::success(true))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<OperationResult<bool>, ServiceError> {
        let Some(car) = self.repo.get_by_id(id).await? else {
            debug!("delete target missing");
            return Ok(OperationResult::failure(car_not_found(id)));
        };
        self.repo.delete(&car).await?;
        info!(car_id = %id, "car_deleted");
        Ok(OperationResult::success(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MemoryRepository;

    fn setup() -> (Arc<MemoryRepository>, CarService<MemoryRepository>) {
        let repo = Arc::new(MemoryRepository::new());
        (repo.clone(), CarService::new(repo))
    }

    fn input(ident: &str) -> NewCar {
        NewCar { make: "Ford".into(), model: "Focus".into(), unique_identifier: ident.into() }
    }

    #[tokio::test]
    async fn create_assigns_fresh_ids() -> Result<(), anyhow::Error> {
        let (_, svc) = setup();
        let a = svc.create_car(input("C1")).await?;
        let b = svc.create_car(input("C2")).await?;
        assert_ne!(a.id, b.id);
        assert_eq!(svc.get_all().await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn uniqueness_check_reflects_existing_cars() -> Result<(), anyhow::Error> {
        let (_, svc) = setup();
        assert!(svc.is_unique_identifier_unique("C10").await?);
        svc.create_car(input("C10")).await?;
        assert!(!svc.is_unique_identifier_unique("C10").await?);
        assert!(svc.is_unique_identifier_unique("C11").await?);
        Ok(())
    }

    #[tokio::test]
    async fn get_by_id_is_idempotent() -> Result<(), anyhow::Error> {
        let (_, svc) = setup();
        let car = svc.create_car(input("C3")).await?;
        let first = svc.get_by_id(car.id).await?;
        let second = svc.get_by_id(car.id).await?;
        assert_eq!(first, second);
        assert_eq!(first, Some(car));
        assert!(svc.get_by_id(Uuid::new_v4()).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn empty_patch_keeps_fields() -> Result<(), anyhow::Error> {
        let (_, svc) = setup();
        let car = svc.create_car(input("C4")).await?;
        let patch = CarPatch {
            id: car.id,
            make: Some(String::new()),
            model: Some(String::new()),
            unique_identifier: None,
        };
        let outcome = svc.update(patch).await?;
        assert_eq!(outcome, OperationResult::success(true));
        assert_eq!(svc.get_by_id(car.id).await?, Some(car));
        Ok(())
    }

    #[tokio::test]
    async fn patch_overwrites_non_empty_fields() -> Result<(), anyhow::Error> {
        let (_, svc) = setup();
        let car = svc.create_car(input("C5")).await?;
        let patch = CarPatch { id: car.id, make: Some("Volvo".into()), model: None, unique_identifier: Some("C55".into()) };
        assert!(svc.update(patch).await?.is_success());
        let stored = svc.get_by_id(car.id).await?.unwrap();
        assert_eq!(stored.make, "Volvo");
        assert_eq!(stored.model, "Focus");
        assert_eq!(stored.unique_identifier, "C55");
        Ok(())
    }

    #[tokio::test]
    async fn update_missing_car_fails_without_writing() -> Result<(), anyhow::Error> {
        let (repo, svc) = setup();
        let id = Uuid::new_v4();
        let outcome = svc.update(CarPatch { id, make: Some("X".into()), ..CarPatch::default() }).await?;
        assert_eq!(outcome.message(), Some(format!("Car with id: {id} was not found!").as_str()));
        assert!(outcome.data().is_none());
        assert_eq!(repo.write_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn delete_missing_car_fails_without_writing() -> Result<(), anyhow::Error> {
        let (repo, svc) = setup();
        let id = Uuid::new_v4();
        let outcome = svc.delete(id).await?;
        assert_eq!(outcome, OperationResult::failure(format!("Car with id: {id} was not found!")));
        assert_eq!(repo.write_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_car() -> Result<(), anyhow::Error> {
        let (_, svc) = setup();
        let car = svc.create_car(input("C6")).await?;
        assert_eq!(svc.delete(car.id).await?, OperationResult::success(true));
        assert!(svc.get_by_id(car.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn storage_fault_propagates_as_error() {
        let (repo, svc) = setup();
        repo.set_offline(true);
        let err = svc.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Persistence(_)));
    }
}
