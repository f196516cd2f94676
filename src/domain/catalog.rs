//! Parsed catalog types
//!
//! A catalog is built once from the raw `paintings.csv` text and is read-only
//! afterwards. See `infrastructure::parsing` for how the text is interpreted.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Cell delimiter detected for a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Delimiter {
    Comma,
    Semicolon,
}

impl Delimiter {
    pub const fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Semicolon => ';',
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.as_char())
    }
}

/// Logical column kinds recognized in the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Identifier,
    Sku,
    Title,
    Description,
}

impl ColumnKind {
    pub const ALL: [Self; 4] = [Self::Identifier, Self::Sku, Self::Title, Self::Description];

    /// Header keywords in priority order; matched as substrings of the
    /// lower-cased header cell.
    pub const fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Identifier => &["tilda uid", "uid", "tilda"],
            Self::Sku => &["sku", "code", "article", "арт"],
            Self::Title => &["title", "name", "название"],
            Self::Description => &["description", "описание"],
        }
    }
}

/// Resolved column-kind to header-index mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    indices: BTreeMap<ColumnKind, usize>,
}

impl ColumnMap {
    pub fn insert(&mut self, kind: ColumnKind, index: usize) {
        self.indices.insert(kind, index);
    }

    pub fn index_of(&self, kind: ColumnKind) -> Option<usize> {
        self.indices.get(&kind).copied()
    }

    pub fn contains(&self, kind: ColumnKind) -> bool {
        self.indices.contains_key(&kind)
    }
}

/// One data row of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogRecord {
    /// Raw (normalized) cells of the identifying columns that were present
    pub raw_identifier_columns: BTreeMap<ColumnKind, String>,
    /// Numeric-ish id used to name image assets; never empty
    pub derived_asset_id: String,
    pub title: String,
    pub description: String,
    /// 1-based position among the data rows
    pub row_position: usize,
}

impl CatalogRecord {
    pub fn identifier_cell(&self) -> Option<&str> {
        self.raw_identifier_columns
            .get(&ColumnKind::Identifier)
            .map(String::as_str)
    }

    pub fn sku_cell(&self) -> Option<&str> {
        self.raw_identifier_columns.get(&ColumnKind::Sku).map(String::as_str)
    }
}

/// A parsed catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    pub delimiter: Delimiter,
    pub columns: ColumnMap,
    pub records: Vec<CatalogRecord>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn derived_asset_ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.derived_asset_id.as_str())
    }
}
