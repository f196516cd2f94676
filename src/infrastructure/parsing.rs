//! Catalog parsing infrastructure
//!
//! The catalog format is contractually loose: the delimiter and the column
//! layout are guessed from the text, not declared. The heuristics live in
//! `catalog_parser` as pure functions.

pub mod catalog_parser;
pub mod error;

// Re-export public types
pub use catalog_parser::{CatalogParser, derive_asset_id, detect_delimiter, normalize_cell, resolve_columns};
pub use error::{ParsingError, ParsingResult};

/// Parser from raw text to a typed value
pub trait TextParser {
    type Output;

    /// Parse the raw text content
    fn parse(&self, raw: &str) -> ParsingResult<Self::Output>;
}
