use thiserror::Error;

use super::item::ItemError;
use super::ports::StoreError;

/// Outcome of a rejected order operation.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The request is missing something it needs before any storage access.
    #[error("{0}")]
    InvalidRequest(String),
    #[error("Invalid item at position {index}: {reason}")]
    InvalidItem { index: usize, reason: ItemError },
    #[error("Order not found")]
    NotFound,
    #[error("Order '{0}' already exists")]
    Conflict(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        DomainError::Storage(e.to_string())
    }
}
