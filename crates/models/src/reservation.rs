use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::car;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservation")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub car_id: Uuid,
    pub reservation_start: DateTimeUtc,
    pub duration_in_minutes: i32,
    pub reservation_end: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Car,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Car => Entity::belongs_to(car::Entity).from(Column::CarId).to(car::Column::Id).into() }
    }
}

impl Related<car::Entity> for Entity {
    fn to() -> RelationDef { Relation::Car.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Exclusion constraint refusing overlapping windows on one car.
pub const NO_OVERLAP_CONSTRAINT: &str = "reservation_no_overlap";
pub const CAR_FOREIGN_KEY: &str = "fk_reservation_car";
