use thiserror::Error;

use crate::auth::AuthError;
use crate::collection::CollectionError;
use crate::media::MediaError;
use crate::store::StoreError;

/// Service-level failure taxonomy.
///
/// `Unauthorized` and `Validation` are expected control-flow results;
/// `Storage` failures are always reported outward, never swallowed.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

impl From<CollectionError> for ServiceError {
    fn from(err: CollectionError) -> Self {
        match err {
            CollectionError::NotFound(id) => Self::NotFound(id),
            CollectionError::InvalidOrdering(msg) => Self::Validation(msg),
            CollectionError::Store(inner) => Self::Storage(inner),
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(_: AuthError) -> Self {
        Self::Unauthorized
    }
}

impl From<MediaError> for ServiceError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Io(inner) => Self::Storage(StoreError::Io(inner)),
            other @ (MediaError::Empty
            | MediaError::UnsupportedType(_)
            | MediaError::TooLarge(_)) => Self::Validation(other.to_string()),
        }
    }
}
