use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::reservation;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "car")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub make: String,
    pub model: String,
    #[sea_orm(unique)]
    pub unique_identifier: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Reservation,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Reservation => Entity::has_many(reservation::Entity).into() }
    }
}

impl Related<reservation::Entity> for Entity {
    fn to() -> RelationDef { Relation::Reservation.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_make(make: &str) -> Result<(), errors::ModelError> {
    if make.trim().is_empty() { return Err(errors::ModelError::Validation("Make is required.".into())); }
    Ok(())
}

pub fn validate_model(model: &str) -> Result<(), errors::ModelError> {
    if model.trim().is_empty() { return Err(errors::ModelError::Validation("Model is required.".into())); }
    Ok(())
}

/// `^C[0-9]+$`
pub fn is_valid_unique_identifier(identifier: &str) -> bool {
    match identifier.strip_prefix('C') {
        Some(digits) => !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

pub fn validate_unique_identifier(identifier: &str) -> Result<(), errors::ModelError> {
    if identifier.is_empty() {
        return Err(errors::ModelError::Validation("UniqueIdentifier is required.".into()));
    }
    if !is_valid_unique_identifier(identifier) {
        return Err(errors::ModelError::Validation(
            "UniqueIdentifier should start with 'C' followed by numbers only.".into(),
        ));
    }
    Ok(())
}
