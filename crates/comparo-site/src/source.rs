//! Catalog backends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use crate::{SiteError, SiteResult};

/// The three record sets the catalog backend serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductLine {
    Phones,
    Boxes,
    Plans,
}

impl ProductLine {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductLine::Phones => "phones",
            ProductLine::Boxes => "boxes",
            ProductLine::Plans => "plans",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProductLine::Phones => "Smartphones",
            ProductLine::Boxes => "Box internet",
            ProductLine::Plans => "Forfaits mobiles",
        }
    }
}

/// Something that returns raw catalog records.
///
/// Records are whatever the backend sends; the catalog loader normalizes
/// them.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_records(&self, line: ProductLine) -> SiteResult<Vec<Value>>;
}

#[async_trait]
impl<S: CatalogSource + ?Sized> CatalogSource for std::sync::Arc<S> {
    async fn fetch_records(&self, line: ProductLine) -> SiteResult<Vec<Value>> {
        (**self).fetch_records(line).await
    }
}

/// Pull the record array out of a backend payload.
///
/// Accepts a bare array or an object wrapping one under `data`, `items` or
/// `results`.
pub fn records_from_value(value: Value) -> SiteResult<Vec<Value>> {
    match value {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => ["data", "items", "results"]
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(records)) => Some(records),
                _ => None,
            })
            .ok_or_else(|| SiteError::UnexpectedShape("object without a record array".into())),
        other => Err(SiteError::UnexpectedShape(format!(
            "expected an array, got {}",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Records held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    pub phones: Vec<Value>,
    pub boxes: Vec<Value>,
    pub plans: Vec<Value>,
}

impl StaticCatalogSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(mut self, line: ProductLine, records: Vec<Value>) -> Self {
        match line {
            ProductLine::Phones => self.phones = records,
            ProductLine::Boxes => self.boxes = records,
            ProductLine::Plans => self.plans = records,
        }
        self
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    async fn fetch_records(&self, line: ProductLine) -> SiteResult<Vec<Value>> {
        Ok(match line {
            ProductLine::Phones => self.phones.clone(),
            ProductLine::Boxes => self.boxes.clone(),
            ProductLine::Plans => self.plans.clone(),
        })
    }
}

/// Records exported as `phones.json`, `boxes.json` and `plans.json` in a
/// directory.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, line: ProductLine) -> PathBuf {
        self.dir.join(format!("{}.json", line.as_str()))
    }
}

#[async_trait]
impl CatalogSource for JsonDirSource {
    async fn fetch_records(&self, line: ProductLine) -> SiteResult<Vec<Value>> {
        let text = tokio::fs::read_to_string(self.path_for(line)).await?;
        records_from_value(serde_json::from_str(&text)?)
    }
}

/// The catalog backend's HTTP API: `GET {base_url}/{line}`.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalogSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, line: ProductLine) -> String {
        format!("{}/{}", self.base_url, line.as_str())
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_records(&self, line: ProductLine) -> SiteResult<Vec<Value>> {
        let url = self.url_for(line);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SiteError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let text = response.text().await?;
        records_from_value(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_from_value_shapes() {
        assert_eq!(records_from_value(json!([1, 2])).unwrap().len(), 2);
        assert_eq!(
            records_from_value(json!({"data": [{"name": "x"}]})).unwrap().len(),
            1
        );
        assert_eq!(records_from_value(json!({"results": []})).unwrap().len(), 0);

        assert!(matches!(
            records_from_value(json!({"data": "nope"})),
            Err(SiteError::UnexpectedShape(_))
        ));
        let err = records_from_value(json!("phones")).unwrap_err();
        assert!(err.to_string().contains("a string"));
    }

    #[test]
    fn test_http_source_url() {
        let source =
            HttpCatalogSource::new(reqwest::Client::new(), "https://api.comparo.example/v1/");
        assert_eq!(
            source.url_for(ProductLine::Boxes),
            "https://api.comparo.example/v1/boxes"
        );
    }

    #[tokio::test]
    async fn test_json_dir_source() {
        let dir = std::env::temp_dir().join(format!("comparo-catalog-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let source = JsonDirSource::new(&dir);
        let plans = r#"{"items": [{"name": "Série Free"}]}"#;
        tokio::fs::write(source.path_for(ProductLine::Plans), plans)
            .await
            .unwrap();

        let records = source.fetch_records(ProductLine::Plans).await.unwrap();
        assert_eq!(records[0]["name"], "Série Free");

        let missing = source.fetch_records(ProductLine::Phones).await;
        assert!(matches!(missing, Err(SiteError::Io(_))));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
