use thiserror::Error;

use crate::repository::RepositoryError;

/// Infrastructure faults. Business-rule outcomes never use this type; they are
/// reported through [`crate::result::OperationResult`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Persistence(msg) => Self::Persistence(msg),
            other => Self::Persistence(other.to_string()),
        }
    }
}
