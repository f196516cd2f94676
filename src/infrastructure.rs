//! Infrastructure layer: parsing, matching, probing and external integrations
//!
//! Pure pieces (identifier extraction, catalog parsing, matching) take their
//! inputs as values. Anything touching the network or the file system sits
//! behind the `CatalogSource` and `AssetExistence` traits.

pub mod asset_check;
pub mod asset_probe;
pub mod catalog_matcher;
pub mod catalog_source;
pub mod config;
pub mod http_client;
pub mod identifier_resolver;
pub mod logging;
pub mod parsing;
pub mod parsing_error;
pub mod slug;

// Re-export commonly used items
pub use asset_check::{FsAssetCheck, HttpAssetCheck};
pub use asset_probe::{AssetExistence, AssetProbe, ProbeLatch, ProbeOptions};
pub use catalog_matcher::{CatalogMatcher, MatchKind, MatchQuery};
pub use catalog_source::{CatalogSource, FileCatalogSource, HttpCatalogSource};
pub use config::{AppConfig, ConfigManager, SiteRoot};
pub use http_client::HttpClient;
pub use identifier_resolver::IdentifierResolver;
pub use logging::{get_log_directory, init_logging_with_config, scoped_console_logging};
pub use parsing::{CatalogParser, ParsingError, ParsingResult, TextParser};
pub use slug::slugify;
