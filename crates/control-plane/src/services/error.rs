// Service error type
// Decision: Services report domain outcomes; the API layer owns status codes

use thiserror::Error;

use crate::storage::StoreError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(key) => ServiceError::NotFound(format!("Tenant '{key}'")),
            StoreError::AlreadyExists(key) => {
                ServiceError::AlreadyExists(format!("Tenant '{key}'"))
            }
            other => ServiceError::Store(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
