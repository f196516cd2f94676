//! Where the catalog text comes from

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use super::http_client::HttpClient;
use super::parsing::{ParsingError, ParsingResult};

/// Provider of the raw catalog text
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Human-readable location for logs
    fn location(&self) -> String;

    async fn fetch_text(&self) -> ParsingResult<String>;
}

/// Catalog served over HTTP
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: Arc<HttpClient>,
    url: Url,
}

impl HttpCatalogSource {
    pub const fn new(client: Arc<HttpClient>, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    fn location(&self) -> String {
        self.url.to_string()
    }

    async fn fetch_text(&self) -> ParsingResult<String> {
        match self.client.get_text(self.url.as_str()).await {
            Ok(text) => {
                debug!("Fetched catalog from {} ({} bytes)", self.url, text.len());
                Ok(text)
            }
            Err(e) => {
                warn!("Catalog fetch failed: {:#}", e);
                Err(ParsingError::source_unreachable(&self.location(), format!("{e:#}")))
            }
        }
    }
}

/// Catalog read from a local file
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_text(&self) -> ParsingResult<String> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => {
                warn!("Catalog read failed for {}: {}", self.path.display(), e);
                Err(ParsingError::source_unreachable(&self.location(), e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_source_reads_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paintings.csv");
        std::fs::write(&path, "uid,sku\n1,P-1\n").unwrap();

        let text = FileCatalogSource::new(&path).fetch_text().await.unwrap();
        assert_eq!(text, "uid,sku\n1,P-1\n");
    }

    #[tokio::test]
    async fn test_missing_file_is_unreachable() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileCatalogSource::new(dir.path().join("missing.csv"))
            .fetch_text()
            .await
            .unwrap_err();
        assert!(matches!(err, ParsingError::SourceUnreachable { .. }));
    }
}
