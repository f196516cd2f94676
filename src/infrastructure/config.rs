//! Configuration infrastructure
//!
//! Contains configuration loading and management for artwork resolution.
//!
//! Configuration is organized into sections:
//! 1. Site settings (where the catalog and images live)
//! 2. Probe profiles (candidate space for main image and thumbnail)
//! 3. Matching, HTTP and logging settings

#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::fs;
use tracing::info;
use url::Url;

use crate::infrastructure::asset_probe::ProbeOptions;

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Site root and catalog location
    #[serde(default)]
    pub site: SiteConfig,

    /// Candidate spaces for the two image lookups
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Catalog matching behavior
    #[serde(default)]
    pub matching: MatchConfig,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the storefront's static files are served from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// `http(s)://` base URL or a local directory path
    pub root: String,

    /// Catalog path relative to the root
    pub catalog_path: String,
}

/// Probe profiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    pub image: ProbeOptions,
    pub thumbnail: ProbeOptions,
}

/// Catalog matching settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Fall back to comparing title slugs when no identifier matches
    pub slug_fallback: bool,

    /// Prefix for generated titles of rows without a title cell
    pub default_title_prefix: String,
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    pub user_agent: String,

    /// Request timeout in seconds; a timed-out probe counts as "not found"
    pub timeout_seconds: u64,

    /// Client-side rate limit, 0 disables it
    pub max_requests_per_second: u32,

    pub follow_redirects: bool,
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Log directory; defaults to `logs/` next to the executable
    pub directory: Option<PathBuf>,

    /// Log file name inside the directory
    pub file_name: String,

    /// Module-specific log level filters (e.g., "reqwest": "info")
    pub module_filters: HashMap<String, String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: defaults::SITE_ROOT.to_string(),
            catalog_path: defaults::CATALOG_PATH.to_string(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            image: ProbeOptions::image(),
            thumbnail: ProbeOptions::thumbnail(),
        }
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            slug_fallback: defaults::SLUG_FALLBACK,
            default_title_prefix: crate::infrastructure::parsing::catalog_parser::DEFAULT_TITLE_PREFIX
                .to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::USER_AGENT.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            max_requests_per_second: defaults::MAX_REQUESTS_PER_SECOND,
            follow_redirects: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            directory: None,
            file_name: defaults::LOG_FILE_NAME.to_string(),
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("reqwest".to_string(), "info".to_string());
                filters.insert("hyper".to_string(), "warn".to_string());
                filters.insert("h2".to_string(), "warn".to_string());
                filters.insert("tokio".to_string(), "info".to_string());
                filters
            },
        }
    }
}

/// Site root resolved from [`SiteConfig::root`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteRoot {
    /// Base URL, always ending in `/` so relative paths join below it
    Http(Url),
    Directory(PathBuf),
}

impl SiteRoot {
    pub fn parse(root: &str) -> Result<Self> {
        let root = root.trim();
        if root.is_empty() {
            bail!("Site root cannot be empty");
        }

        if root.starts_with("http://") || root.starts_with("https://") {
            let with_slash = if root.ends_with('/') {
                root.to_string()
            } else {
                format!("{}/", root)
            };
            let url = Url::parse(&with_slash).with_context(|| format!("Invalid site root URL: {}", root))?;
            Ok(Self::Http(url))
        } else {
            Ok(Self::Directory(PathBuf::from(root)))
        }
    }
}

impl std::fmt::Display for SiteRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(url) => write!(f, "{}", url),
            Self::Directory(path) => write!(f, "{}", path.display()),
        }
    }
}

impl SiteConfig {
    pub fn site_root(&self) -> Result<SiteRoot> {
        SiteRoot::parse(&self.root)
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join(defaults::APP_DIR_NAME);

        Ok(config_dir)
    }

    /// Create a configuration manager for the default location
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        let config_path = config_dir.join(defaults::CONFIG_FILE_NAME);

        Ok(Self { config_path })
    }

    /// Create a configuration manager for an explicit file
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub async fn load_config(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            info!("Configuration file not found, creating default: {:?}", self.config_path);
            let default_config = AppConfig::default();
            self.save_config(&default_config).await?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .context("Failed to read configuration file")?;

        match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => {
                info!("Loaded configuration from: {:?}", self.config_path);
                Ok(config)
            }
            Err(parse_error) => {
                tracing::warn!("⚠️  Configuration parse error: {}", parse_error);
                tracing::warn!("⚠️  Resetting to default configuration");

                // Keep the broken file around for inspection
                let backup_path = self.config_path.with_extension("json.corrupted");
                if let Err(e) = fs::copy(&self.config_path, &backup_path).await {
                    tracing::warn!("Failed to create backup of corrupted config: {}", e);
                } else {
                    tracing::info!("Backed up corrupted config to: {:?}", backup_path);
                }

                let default_config = AppConfig::default();
                self.save_config(&default_config)
                    .await
                    .context("Failed to save default configuration")?;

                tracing::info!("✅ Reset to default configuration");
                Ok(default_config)
            }
        }
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content)
            .await
            .context("Failed to write configuration file")?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }

    /// Get the configuration file path
    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }
}

/// Default configuration values
pub mod defaults {
    /// Directory name under the user config dir
    pub const APP_DIR_NAME: &str = "artframe";

    /// Configuration file name
    pub const CONFIG_FILE_NAME: &str = "artframe_config.json";

    /// Default site root (current directory)
    pub const SITE_ROOT: &str = ".";

    /// Catalog file relative to the site root
    pub const CATALOG_PATH: &str = "paintings.csv";

    /// Folder roots tried for every asset, in order
    pub const ASSET_FOLDERS: &[&str] = &["images/paintings", "images/Paintings"];

    /// Zero-padding widths tried for every asset id (0 = unpadded)
    pub const ASSET_PAD_WIDTHS: &[usize] = &[0, 2, 3];

    /// Image extensions tried for every asset, in order
    pub const ASSET_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

    /// Filename suffixes for the full-size image
    pub const IMAGE_SUFFIXES: &[&str] = &["", "_large", "_main"];

    /// Filename suffixes for the thumbnail
    pub const THUMBNAIL_SUFFIXES: &[&str] = &["", "_thumb", "-thumb", "_main", "_large", "_re1", "_old", "_new"];

    /// Slug fallback enabled by default
    pub const SLUG_FALLBACK: bool = true;

    /// Default user agent
    pub const USER_AGENT: &str = "artframe/0.2 (+asset resolver)";

    /// Default request timeout in seconds
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 15;

    /// Default client-side rate limit (0 = unlimited)
    pub const MAX_REQUESTS_PER_SECOND: u32 = 0;

    /// Default log level
    pub const LOG_LEVEL: &str = "info";

    /// Default JSON format setting
    pub const LOG_JSON_FORMAT: bool = false;

    /// Default console output setting
    pub const LOG_CONSOLE_OUTPUT: bool = true;

    /// Default file output setting
    pub const LOG_FILE_OUTPUT: bool = false;

    /// Default log file name
    pub const LOG_FILE_NAME: &str = "artframe.log";
}
