//! End-to-end artwork resolution
//!
//! identifier → catalog text → catalog → record → (image, thumbnail)
//!
//! Each stage either produces its value or stops the pipeline with a
//! [`ResolutionError`]. A missing image is the one non-fatal failure: the
//! record is still shown, with a notice next to it.

use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future::join;
use tracing::{debug, info};

use crate::domain::{ArtworkView, Environment, ResolutionError};
use crate::infrastructure::asset_check::{FsAssetCheck, HttpAssetCheck};
use crate::infrastructure::asset_probe::{AssetExistence, AssetProbe, ProbeOptions};
use crate::infrastructure::catalog_matcher::{CatalogMatcher, MatchQuery};
use crate::infrastructure::catalog_source::{CatalogSource, FileCatalogSource, HttpCatalogSource};
use crate::infrastructure::config::{AppConfig, ProbeConfig, SiteRoot};
use crate::infrastructure::http_client::HttpClient;
use crate::infrastructure::identifier_resolver::IdentifierResolver;
use crate::infrastructure::parsing::{CatalogParser, TextParser};

use super::presentation::PresentationAdapter;

/// The resolution pipeline with its two I/O seams injected
pub struct ArtworkResolver {
    identifiers: IdentifierResolver,
    catalog_source: Arc<dyn CatalogSource>,
    parser: CatalogParser,
    matcher: CatalogMatcher,
    probe: AssetProbe,
    probe_config: ProbeConfig,
}

impl std::fmt::Debug for ArtworkResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtworkResolver")
            .field("catalog", &self.catalog_source.location())
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

impl ArtworkResolver {
    /// Resolver with default parsing, matching and probe profiles
    pub fn new(catalog_source: Arc<dyn CatalogSource>, checker: Arc<dyn AssetExistence>) -> Self {
        Self {
            identifiers: IdentifierResolver::new(),
            catalog_source,
            parser: CatalogParser::new(),
            matcher: CatalogMatcher::new(),
            probe: AssetProbe::new(checker),
            probe_config: ProbeConfig::default(),
        }
    }

    /// Wire sources and checks for the configured site root
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let root = config.site.site_root()?;
        let (catalog_source, checker): (Arc<dyn CatalogSource>, Arc<dyn AssetExistence>) = match &root {
            SiteRoot::Http(base) => {
                let client = Arc::new(HttpClient::new(config.http.clone())?);
                let catalog_url = base
                    .join(&config.site.catalog_path)
                    .with_context(|| format!("Invalid catalog path: {}", config.site.catalog_path))?;
                (
                    Arc::new(HttpCatalogSource::new(Arc::clone(&client), catalog_url)),
                    Arc::new(HttpAssetCheck::new(client, base.clone())),
                )
            }
            SiteRoot::Directory(dir) => (
                Arc::new(FileCatalogSource::new(dir.join(&config.site.catalog_path))),
                Arc::new(FsAssetCheck::new(dir.clone())),
            ),
        };

        info!("Resolving against site root {}", root);

        Ok(Self::new(catalog_source, checker)
            .with_parser(CatalogParser::new().with_default_title_prefix(config.matching.default_title_prefix.clone()))
            .with_matcher(CatalogMatcher::with_slug_fallback(config.matching.slug_fallback))
            .with_probe_config(config.probe.clone()))
    }

    #[must_use]
    pub fn with_parser(mut self, parser: CatalogParser) -> Self {
        self.parser = parser;
        self
    }

    #[must_use]
    pub const fn with_matcher(mut self, matcher: CatalogMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    #[must_use]
    pub fn with_probe_config(mut self, probe_config: ProbeConfig) -> Self {
        self.probe_config = probe_config;
        self
    }

    pub const fn image_options(&self) -> &ProbeOptions {
        &self.probe_config.image
    }

    pub const fn thumbnail_options(&self) -> &ProbeOptions {
        &self.probe_config.thumbnail
    }

    /// Run the pipeline for one page snapshot
    pub async fn resolve(&self, env: &Environment) -> Result<ArtworkView, ResolutionError> {
        // The catalog is never fetched without an identifier
        let identifier = self
            .identifiers
            .resolve(env)
            .ok_or(ResolutionError::NoIdentifierResolved)?;

        debug!("Fetching catalog from {}", self.catalog_source.location());
        let raw = self.catalog_source.fetch_text().await?;
        let catalog = self.parser.parse(&raw)?;
        info!("Catalog parsed: {} records", catalog.len());

        let query = MatchQuery::from_resolved(&identifier);
        let record = self
            .matcher
            .find(&catalog, &query)
            .cloned()
            .ok_or_else(|| ResolutionError::NoMatchingRecord {
                identifier: identifier.identifier.to_string(),
            })?;

        let asset_id = record.derived_asset_id.as_str();
        let (image, thumbnail) = join(
            self.probe.probe(asset_id, self.image_options()),
            self.probe.probe(asset_id, self.thumbnail_options()),
        )
        .await;

        info!(
            "Resolved {} -> '{}' (image: {}, thumbnail: {})",
            identifier,
            record.title,
            image.as_ref().map_or("none", |a| a.url.as_str()),
            thumbnail.as_ref().map_or("none", |a| a.url.as_str()),
        );

        Ok(ArtworkView {
            identifier,
            record,
            image,
            thumbnail,
        })
    }

    /// Resolve and hand the outcome to the presentation layer
    pub async fn run(&self, env: &Environment, adapter: &dyn PresentationAdapter) -> Result<ArtworkView, ResolutionError> {
        let outcome = self.resolve(env).await;
        match &outcome {
            Ok(view) => {
                adapter.show_artwork(view);
                if let Some(message) = view.notice().as_ref().and_then(ResolutionError::user_message) {
                    adapter.show_message(message);
                }
            }
            Err(error) => match error.user_message() {
                Some(message) => {
                    info!("Resolution stopped: {}", error);
                    adapter.show_message(message);
                }
                None => debug!("Resolution stopped silently: {}", error),
            },
        }
        outcome
    }
}
