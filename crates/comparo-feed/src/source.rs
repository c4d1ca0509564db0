//! Where feed text comes from.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::FeedError;

/// Relative path of the affiliate feed as served by the site.
pub const DEFAULT_FEED_PATH: &str = "data/affiliate-feed.csv";

/// A place the raw feed text can be fetched from.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the whole feed as text. One attempt, no retries.
    async fn fetch_text(&self) -> Result<String, FeedError>;

    /// Human-readable location, used in logs.
    fn location(&self) -> String;
}

#[async_trait]
impl<S: FeedSource + ?Sized> FeedSource for std::sync::Arc<S> {
    async fn fetch_text(&self) -> Result<String, FeedError> {
        (**self).fetch_text().await
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

/// Feed read from the site's static asset directory.
#[derive(Debug, Clone)]
pub struct StaticFileSource {
    root: PathBuf,
    path: String,
}

impl StaticFileSource {
    /// `path` is resolved relative to `root`; a leading `/` is ignored.
    pub fn new(root: impl Into<PathBuf>, path: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            path: path.into(),
        }
    }

    /// The default feed path under `root`.
    pub fn with_default_path(root: impl Into<PathBuf>) -> Self {
        Self::new(root, DEFAULT_FEED_PATH)
    }

    fn resolved(&self) -> PathBuf {
        self.root.join(self.path.trim_start_matches('/'))
    }
}

#[async_trait]
impl FeedSource for StaticFileSource {
    async fn fetch_text(&self) -> Result<String, FeedError> {
        let path = self.resolved();
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| FeedError::Fetch(format!("{}: {e}", path.display())))
    }

    fn location(&self) -> String {
        self.resolved().display().to_string()
    }
}

/// Feed fetched over HTTP from the site origin.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(base_url: &str, path: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, path)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str, path: &str) -> Self {
        let url = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Self { client, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeedSource for HttpSource {
    async fn fetch_text(&self) -> Result<String, FeedError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Fetch(format!("{} returned {status}", self.url)));
        }

        Ok(response.text().await?)
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_source_joins_url() {
        let source = HttpSource::new("https://comparo.example/", "/data/affiliate-feed.csv");
        assert_eq!(source.url(), "https://comparo.example/data/affiliate-feed.csv");
    }

    #[test]
    fn test_static_source_strips_leading_slash() {
        let source = StaticFileSource::new("/srv/public", "/data/feed.csv");
        assert_eq!(source.location(), "/srv/public/data/feed.csv");
    }

    #[tokio::test]
    async fn test_static_source_missing_file_is_fetch_error() {
        let source = StaticFileSource::new(std::env::temp_dir(), "comparo-no-such-feed.csv");
        let err = source.fetch_text().await.unwrap_err();
        assert!(matches!(err, FeedError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_static_source_reads_file() {
        let dir = std::env::temp_dir().join(format!("comparo-feed-{}", std::process::id()));
        tokio::fs::create_dir_all(dir.join("data")).await.unwrap();
        tokio::fs::write(dir.join(DEFAULT_FEED_PATH), "Programme_ID,Name\n")
            .await
            .unwrap();

        let source = StaticFileSource::with_default_path(&dir);
        assert_eq!(source.fetch_text().await.unwrap(), "Programme_ID,Name\n");

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
