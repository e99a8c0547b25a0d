// Storage error type
// Decision: One error enum for both stores, so services map a single type
// Decision: Backend details (sqlx, io, serde) are flattened to strings here;
//           callers only branch on the variant

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("tenant '{0}' not found")]
    NotFound(String),

    #[error("tenant '{0}' already exists")]
    AlreadyExists(String),

    /// The backing store could not be reached, read or written.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The backing store was read but its content could not be decoded.
    #[error("store corrupted: {0}")]
    Corrupted(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}
