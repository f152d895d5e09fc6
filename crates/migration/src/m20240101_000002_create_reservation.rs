//! Create `reservation` table.
//! Overlapping reservations of one car are refused by the exclusion
//! constraint `reservation_no_overlap`, so two concurrent bookings cannot both
//! commit the same car for intersecting `[start, end)` windows.
use sea_orm_migration::sea_orm::ConnectionTrait;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // `uuid WITH =` inside a GiST index needs btree_gist
        db.execute_unprepared("CREATE EXTENSION IF NOT EXISTS btree_gist").await?;

        manager
            .create_table(
                Table::create()
                    .table(Reservation::Table)
                    .if_not_exists()
                    .col(uuid(Reservation::Id).primary_key())
                    .col(uuid(Reservation::CarId).not_null())
                    .col(timestamp_with_time_zone(Reservation::ReservationStart).not_null())
                    .col(integer(Reservation::DurationInMinutes).not_null())
                    .col(timestamp_with_time_zone(Reservation::ReservationEnd).not_null())
                    .check(Expr::col(Reservation::ReservationEnd).gt(Expr::col(Reservation::ReservationStart)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_car")
                            .from(Reservation::Table, Reservation::CarId)
                            .to(Car::Table, Car::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        db.execute_unprepared(
            r#"ALTER TABLE reservation
               ADD CONSTRAINT reservation_no_overlap
               EXCLUDE USING gist (
                   car_id WITH =,
                   tstzrange(reservation_start, reservation_end, '[)') WITH &&
               )"#,
        )
        .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Reservation::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Reservation {
    Table,
    Id,
    CarId,
    ReservationStart,
    DurationInMinutes,
    ReservationEnd,
}

#[derive(DeriveIden)]
enum Car { Table, Id }
