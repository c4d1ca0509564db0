//! Site error types.

use thiserror::Error;

/// Errors from the site's outer edges: catalog backends and setup.
///
/// Listing operations never return these; they log them and serve an
/// empty page.
#[derive(Error, Debug)]
pub enum SiteError {
    #[error("catalog backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog backend returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected catalog payload: {0}")]
    UnexpectedShape(String),

    #[error("telemetry setup failed: {0}")]
    Telemetry(String),
}

pub type SiteResult<T> = Result<T, SiteError>;
