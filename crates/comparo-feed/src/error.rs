//! Feed error types.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::validate::ValidationError;

/// Errors produced while retrieving the affiliate feed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// The fetch did not complete before its deadline.
    #[error("feed fetch timed out after {0:?}")]
    Timeout(Duration),

    /// Network or I/O failure.
    #[error("feed fetch failed: {0}")]
    Fetch(String),

    /// The payload arrived but does not look like a feed.
    #[error("malformed feed: {0}")]
    Malformed(#[from] ValidationError),
}

impl FeedError {
    pub fn kind(&self) -> FeedErrorKind {
        match self {
            FeedError::Timeout(_) => FeedErrorKind::Timeout,
            FeedError::Fetch(_) => FeedErrorKind::Transient,
            FeedError::Malformed(_) => FeedErrorKind::Malformed,
        }
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        FeedError::Fetch(e.to_string())
    }
}

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedErrorKind {
    Timeout,
    Transient,
    Malformed,
}

impl FeedErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedErrorKind::Timeout => "timeout",
            FeedErrorKind::Transient => "transient",
            FeedErrorKind::Malformed => "malformed",
        }
    }

    /// Whether retrying later could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FeedErrorKind::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            FeedError::Timeout(Duration::from_millis(50)).kind(),
            FeedErrorKind::Timeout
        );
        assert_eq!(FeedError::Fetch("refused".into()).kind(), FeedErrorKind::Transient);

        let malformed = FeedError::from(ValidationError::TooSmall { len: 3, min: 100 });
        assert_eq!(malformed.kind(), FeedErrorKind::Malformed);
        assert!(!malformed.kind().is_retryable());
        assert!(FeedErrorKind::Timeout.is_retryable());
    }
}
