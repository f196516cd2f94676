//! Existence checks backing the asset probe
//!
//! A candidate exists when its bytes can be fetched and decoded as an image.
//! A 200 response with an HTML error page is therefore a miss, like a broken
//! `<img>` in a browser.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace};
use url::Url;

use super::asset_probe::AssetExistence;
use super::http_client::HttpClient;
use crate::domain::AssetCandidate;

/// Decode on the blocking pool; any failure is a miss
async fn decodes_as_image(bytes: Vec<u8>, candidate: &AssetCandidate) -> bool {
    match tokio::task::spawn_blocking(move || image::load_from_memory(&bytes)).await {
        Ok(Ok(decoded)) => {
            trace!("{} decoded ({}x{})", candidate, decoded.width(), decoded.height());
            true
        }
        Ok(Err(e)) => {
            debug!("{} is not a decodable image: {}", candidate, e);
            false
        }
        Err(e) => {
            debug!("Decode task for {} failed: {}", candidate, e);
            false
        }
    }
}

/// Checks candidates relative to an HTTP base URL
#[derive(Debug, Clone)]
pub struct HttpAssetCheck {
    client: Arc<HttpClient>,
    base: Url,
}

impl HttpAssetCheck {
    pub const fn new(client: Arc<HttpClient>, base: Url) -> Self {
        Self { client, base }
    }
}

#[async_trait]
impl AssetExistence for HttpAssetCheck {
    async fn exists(&self, candidate: &AssetCandidate) -> bool {
        let url = match self.base.join(candidate.path()) {
            Ok(url) => url,
            Err(e) => {
                debug!("Cannot join {} onto {}: {}", candidate, self.base, e);
                return false;
            }
        };

        match self.client.get_bytes(url.as_str()).await {
            Ok(bytes) => decodes_as_image(bytes, candidate).await,
            Err(e) => {
                debug!("{} not available: {:#}", candidate, e);
                false
            }
        }
    }
}

/// Checks candidates relative to a local directory
#[derive(Debug, Clone)]
pub struct FsAssetCheck {
    root: PathBuf,
}

impl FsAssetCheck {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl AssetExistence for FsAssetCheck {
    async fn exists(&self, candidate: &AssetCandidate) -> bool {
        let path = self.root.join(candidate.path());
        match tokio::fs::read(&path).await {
            Ok(bytes) => decodes_as_image(bytes, candidate).await,
            Err(e) => {
                trace!("{} not readable: {}", path.display(), e);
                false
            }
        }
    }
}
