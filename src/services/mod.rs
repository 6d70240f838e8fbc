//! Read-through query layer and notification helpers, generic over the
//! store traits.

use thiserror::Error;

use crate::store::errors::StoreError;

pub mod clients;
pub mod notify;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
