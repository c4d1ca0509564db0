//! Consent error types.

use chrono::{DateTime, Utc};
use comparo_cache::CacheError;
use thiserror::Error;

/// Reasons a stored consent record could not be used.
///
/// None of these reach callers of the store; they are logged and the store
/// falls back to defaults.
#[derive(Error, Debug)]
pub enum ConsentError {
    #[error("consent storage failed: {0}")]
    Storage(#[from] CacheError),

    #[error("consent recorded at {0} has expired")]
    Expired(DateTime<Utc>),
}

pub type ConsentResult<T> = Result<T, ConsentError>;
