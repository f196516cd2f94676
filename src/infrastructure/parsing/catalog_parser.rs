//! Catalog parser for the `paintings.csv` text
//!
//! This is deliberately not a CSV parser. The rules are:
//! - delimiter is `;` only when the text has `;` and no `,` at all
//! - cells are split on the delimiter as-is; quoted delimiters are not honored
//! - each cell is trimmed and loses one wrapping pair of double quotes
//! - columns are found by keyword substrings in the lower-cased header
//!
//! A description containing a comma in a comma-delimited catalog shifts the
//! following cells of that row. Known limitation, kept as is.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::{ParsingError, ParsingResult, TextParser};
use crate::domain::{Catalog, CatalogRecord, ColumnKind, ColumnMap, Delimiter};

/// Title used when a row has no title cell
pub const DEFAULT_TITLE_PREFIX: &str = "Картина";

/// Parser for delimiter-ambiguous catalog text
#[derive(Debug, Clone)]
pub struct CatalogParser {
    default_title_prefix: String,
}

impl Default for CatalogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogParser {
    pub fn new() -> Self {
        Self {
            default_title_prefix: DEFAULT_TITLE_PREFIX.to_string(),
        }
    }

    /// Use a different prefix for generated titles
    #[must_use]
    pub fn with_default_title_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.default_title_prefix = prefix.into();
        self
    }

    fn parse_row(
        &self,
        line: &str,
        row_position: usize,
        delimiter: Delimiter,
        columns: &ColumnMap,
    ) -> CatalogRecord {
        let cells = split_cells(line, delimiter);
        let cell = |kind: ColumnKind| {
            columns
                .index_of(kind)
                .and_then(|index| cells.get(index))
                .map(String::as_str)
        };

        let mut raw_identifier_columns = BTreeMap::new();
        for kind in [ColumnKind::Identifier, ColumnKind::Sku] {
            if let Some(value) = cell(kind) {
                raw_identifier_columns.insert(kind, value.to_string());
            }
        }

        let derived_asset_id = derive_asset_id(cell(ColumnKind::Sku), row_position);
        let title = cell(ColumnKind::Title)
            .filter(|title| !title.is_empty())
            .map_or_else(
                || format!("{} {}", self.default_title_prefix, derived_asset_id),
                str::to_string,
            );
        let description = cell(ColumnKind::Description).unwrap_or_default().to_string();

        CatalogRecord {
            raw_identifier_columns,
            derived_asset_id,
            title,
            description,
            row_position,
        }
    }
}

impl TextParser for CatalogParser {
    type Output = Catalog;

    fn parse(&self, raw: &str) -> ParsingResult<Catalog> {
        let lines = non_empty_lines(raw);
        if lines.len() < 2 {
            return Err(ParsingError::empty_catalog(lines.len()));
        }

        let delimiter = detect_delimiter(raw);
        let headers = split_cells(lines[0], delimiter);
        let columns = resolve_columns(&headers);

        if !columns.contains(ColumnKind::Identifier) {
            warn!("Catalog header has no identifier column: {:?}", headers);
        }
        if !columns.contains(ColumnKind::Sku) {
            debug!("Catalog header has no sku column, asset ids fall back to row positions");
        }

        let records: Vec<CatalogRecord> = lines[1..]
            .iter()
            .enumerate()
            .map(|(index, line)| self.parse_row(line, index + 1, delimiter, &columns))
            .collect();

        debug!(
            "Parsed catalog: {} rows, delimiter {}, columns {:?}",
            records.len(),
            delimiter,
            columns
        );

        Ok(Catalog {
            delimiter,
            columns,
            records,
        })
    }
}

/// `;` if the text contains `;` and no `,` anywhere, otherwise `,`
pub fn detect_delimiter(text: &str) -> Delimiter {
    if text.contains(';') && !text.contains(',') {
        Delimiter::Semicolon
    } else {
        Delimiter::Comma
    }
}

/// Trim whitespace, then drop one wrapping pair of double quotes
pub fn normalize_cell(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(trimmed)
        .to_string()
}

/// Map each column kind to the first header containing one of its keywords.
///
/// Keywords are tried in priority order, so a header `Tilda UID` wins over an
/// earlier `uid_old` column only if `tilda uid` is tried first (it is).
pub fn resolve_columns(headers: &[String]) -> ColumnMap {
    let lower: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    let mut columns = ColumnMap::default();
    for kind in ColumnKind::ALL {
        if let Some(index) = find_header_index(&lower, kind.keywords()) {
            columns.insert(kind, index);
        }
    }
    columns
}

fn find_header_index(lower_headers: &[String], keywords: &[&str]) -> Option<usize> {
    keywords
        .iter()
        .find_map(|keyword| lower_headers.iter().position(|h| h.contains(keyword)))
}

/// All ASCII digits of the SKU cell, leading zeros stripped; the 1-based row
/// position when the cell is missing or has no digits.
pub fn derive_asset_id(sku_cell: Option<&str>, row_position: usize) -> String {
    let digits: String = sku_cell
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    if digits.is_empty() {
        return row_position.to_string();
    }

    match digits.trim_start_matches('0') {
        "" => "0".to_string(),
        stripped => stripped.to_string(),
    }
}

fn non_empty_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .collect()
}

fn split_cells(line: &str, delimiter: Delimiter) -> Vec<String> {
    line.split(delimiter.as_char()).map(normalize_cell).collect()
}
