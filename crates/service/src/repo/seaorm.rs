use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Query;
use sea_orm::{
    sqlx, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, RuntimeErr, Set,
};
use uuid::Uuid;

use models::{car, reservation};

use crate::domain::{Car, Reservation};
use crate::repository::{CarRepository, RepositoryError, ReservationRepository};

/// SQLSTATE raised by PostgreSQL when an exclusion constraint rejects a row.
const EXCLUSION_VIOLATION: &str = "23P01";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// PostgreSQL-backed storage. The connection pool is shared; each call runs on
/// its own pooled connection.
#[derive(Clone)]
pub struct SeaOrmRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn db_err(e: DbErr) -> RepositoryError {
    RepositoryError::Persistence(e.to_string())
}

fn violation(e: &DbErr) -> Option<&dyn sqlx::error::DatabaseError> {
    match e {
        DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(db)))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(db))) => Some(db.as_ref()),
        _ => None,
    }
}

fn is_overlap_violation(e: &DbErr) -> bool {
    violation(e).is_some_and(|db| {
        db.code().as_deref() == Some(EXCLUSION_VIOLATION) || db.constraint() == Some(reservation::NO_OVERLAP_CONSTRAINT)
    })
}

fn is_missing_car(e: &DbErr) -> bool {
    violation(e).is_some_and(|db| {
        db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) || db.constraint() == Some(reservation::CAR_FOREIGN_KEY)
    })
}

#[async_trait]
impl CarRepository for SeaOrmRepository {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Car>, RepositoryError> {
        let found = car::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)?;
        Ok(found.map(Car::from))
    }

    async fn get_all(&self) -> Result<Vec<Car>, RepositoryError> {
        let rows = car::Entity::find().order_by_asc(car::Column::Id).all(&self.db).await.map_err(db_err)?;
        Ok(rows.into_iter().map(Car::from).collect())
    }

    async fn create(&self, c: &Car) -> Result<Car, RepositoryError> {
        let am = car::ActiveModel {
            id: Set(c.id),
            make: Set(c.make.clone()),
            model: Set(c.model.clone()),
            unique_identifier: Set(c.unique_identifier.clone()),
        };
        let created = am.insert(&self.db).await.map_err(db_err)?;
        Ok(created.into())
    }

    async fn update(&self, c: &Car) -> Result<(), RepositoryError> {
        let mut am = car::Model { id: c.id, make: String::new(), model: String::new(), unique_identifier: String::new() }
            .into_active_model();
        am.make = Set(c.make.clone());
        am.model = Set(c.model.clone());
        am.unique_identifier = Set(c.unique_identifier.clone());
        am.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, c: &Car) -> Result<(), RepositoryError> {
        car::Entity::delete_by_id(c.id).exec(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_unique_identifier(&self, identifier: &str) -> Result<Option<Car>, RepositoryError> {
        let found = car::Entity::find()
            .filter(car::Column::UniqueIdentifier.eq(identifier))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(Car::from))
    }
}

#[async_trait]
impl ReservationRepository for SeaOrmRepository {
    async fn find_available_cars(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Car>, RepositoryError> {
        // all cars minus cars holding a reservation that intersects [start, end)
        let busy = Query::select()
            .column(reservation::Column::CarId)
            .from(reservation::Entity)
            .and_where(reservation::Column::ReservationStart.lt(end))
            .and_where(reservation::Column::ReservationEnd.gt(start))
            .to_owned();
        let rows = car::Entity::find()
            .filter(car::Column::Id.not_in_subquery(busy))
            .order_by_asc(car::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Car::from).collect())
    }

    async fn create_reservation(&self, r: &Reservation) -> Result<(), RepositoryError> {
        let am = reservation::ActiveModel {
            id: Set(r.id),
            car_id: Set(r.car_id),
            reservation_start: Set(r.reservation_start),
            duration_in_minutes: Set(r.duration_in_minutes),
            reservation_end: Set(r.reservation_end),
        };
        match reservation::Entity::insert(am).exec_without_returning(&self.db).await {
            Ok(_) => Ok(()),
            Err(e) if is_overlap_violation(&e) => Err(RepositoryError::OverlappingReservation { car_id: r.car_id }),
            Err(e) if is_missing_car(&e) => Err(RepositoryError::CarNotFound { car_id: r.car_id }),
            Err(e) => Err(db_err(e)),
        }
    }

    async fn get_reservation_by_id(&self, id: Uuid) -> Result<Option<Reservation>, RepositoryError> {
        let found = reservation::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)?;
        Ok(found.map(Reservation::from))
    }

    async fn get_all_reservations(&self) -> Result<Vec<Reservation>, RepositoryError> {
        let rows = reservation::Entity::find()
            .order_by_asc(reservation::Column::ReservationStart)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Reservation::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::try_db;
    use chrono::Duration;

    fn new_car() -> Car {
        let n = Uuid::new_v4().as_u128() % 1_000_000_000;
        Car { id: Uuid::new_v4(), make: "Skoda".into(), model: "Octavia".into(), unique_identifier: format!("C{n}") }
    }

    fn booking(car_id: Uuid, start: DateTime<Utc>, minutes: i32) -> Reservation {
        Reservation {
            id: Uuid::new_v4(),
            car_id,
            reservation_start: start,
            duration_in_minutes: minutes,
            reservation_end: start + Duration::minutes(i64::from(minutes)),
        }
    }

    #[tokio::test]
    async fn car_crud_roundtrip() -> Result<(), anyhow::Error> {
        let Some(db) = try_db().await else { return Ok(()) };
        let repo = SeaOrmRepository::new(db);

        let c = repo.create(&new_car()).await?;
        let found = repo.get_by_id(c.id).await?.unwrap();
        assert_eq!(found, c);
        let by_ident = repo.find_by_unique_identifier(&c.unique_identifier).await?.unwrap();
        assert_eq!(by_ident.id, c.id);

        let changed = Car { model: "Superb".into(), ..c.clone() };
        repo.update(&changed).await?;
        assert_eq!(repo.get_by_id(c.id).await?.unwrap().model, "Superb");

        repo.delete(&c).await?;
        assert!(repo.get_by_id(c.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn availability_excludes_overlapping_bookings() -> Result<(), anyhow::Error> {
        let Some(db) = try_db().await else { return Ok(()) };
        let repo = SeaOrmRepository::new(db);

        let c = repo.create(&new_car()).await?;
        // far future window so rows from other tests cannot interfere
        let base = Utc::now() + Duration::days(3650 + (Uuid::new_v4().as_u128() % 1000) as i64);
        repo.create_reservation(&booking(c.id, base, 60)).await?;

        let busy = repo.find_available_cars(base + Duration::minutes(30), base + Duration::minutes(90)).await?;
        assert!(busy.iter().all(|x| x.id != c.id));
        let free = repo.find_available_cars(base + Duration::minutes(60), base + Duration::minutes(120)).await?;
        assert_eq!(free.iter().filter(|x| x.id == c.id).count(), 1);

        repo.delete(&c).await?;
        Ok(())
    }

    #[tokio::test]
    async fn exclusion_constraint_maps_to_overlap_error() -> Result<(), anyhow::Error> {
        let Some(db) = try_db().await else { return Ok(()) };
        let repo = SeaOrmRepository::new(db);

        let c = repo.create(&new_car()).await?;
        let base = Utc::now() + Duration::days(7300);
        repo.create_reservation(&booking(c.id, base, 60)).await?;
        let err = repo.create_reservation(&booking(c.id, base + Duration::minutes(59), 10)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::OverlappingReservation { .. }));

        repo.delete(&c).await?;
        Ok(())
    }

    #[tokio::test]
    async fn foreign_key_maps_to_car_not_found() -> Result<(), anyhow::Error> {
        let Some(db) = try_db().await else { return Ok(()) };
        let repo = SeaOrmRepository::new(db);

        let ghost = Uuid::new_v4();
        let err = repo.create_reservation(&booking(ghost, Utc::now() + Duration::days(9000), 10)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::CarNotFound { car_id } if car_id == ghost));
        Ok(())
    }

    #[tokio::test]
    async fn reservation_lookup_by_id() -> Result<(), anyhow::Error> {
        let Some(db) = try_db().await else { return Ok(()) };
        let repo = SeaOrmRepository::new(db);

        let c = repo.create(&new_car()).await?;
        let r = booking(c.id, Utc::now() + Duration::days(8000), 20);
        repo.create_reservation(&r).await?;
        assert_eq!(repo.get_reservation_by_id(r.id).await?.map(|x| x.car_id), Some(c.id));
        assert!(repo.get_reservation_by_id(Uuid::new_v4()).await?.is_none());

        repo.delete(&c).await?;
        Ok(())
    }
}
