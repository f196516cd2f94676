//! Finding the catalog record for a resolved identifier

use serde::Serialize;
use tracing::{debug, info};

use super::slug::{slug_hint_from_path, slugify};
use crate::domain::{Catalog, CatalogRecord, Identifier, ResolvedIdentifier};

/// What the matcher looks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchQuery {
    pub identifier: Identifier,
    /// Raw slug text from the URL the identifier came from
    pub slug_hint: Option<String>,
}

impl MatchQuery {
    pub const fn new(identifier: Identifier) -> Self {
        Self {
            identifier,
            slug_hint: None,
        }
    }

    #[must_use]
    pub fn with_slug_hint(mut self, hint: impl Into<String>) -> Self {
        self.slug_hint = Some(hint.into());
        self
    }

    /// Query for a resolved identifier, taking the slug hint from its origin path
    pub fn from_resolved(resolved: &ResolvedIdentifier) -> Self {
        Self {
            identifier: resolved.identifier.clone(),
            slug_hint: slug_hint_from_path(&resolved.origin_path),
        }
    }
}

/// Which rule produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    ExactIdentifier,
    TitleSlug,
}

/// Exact identifier match with an optional title-slug fallback
#[derive(Debug, Clone, Copy)]
pub struct CatalogMatcher {
    slug_fallback: bool,
}

impl Default for CatalogMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogMatcher {
    /// Matcher with the slug fallback enabled
    pub const fn new() -> Self {
        Self { slug_fallback: true }
    }

    /// Matcher that only compares identifiers
    pub const fn exact_only() -> Self {
        Self { slug_fallback: false }
    }

    pub const fn with_slug_fallback(slug_fallback: bool) -> Self {
        Self { slug_fallback }
    }

    /// First record matching the query, or `None`
    pub fn find<'c>(&self, catalog: &'c Catalog, query: &MatchQuery) -> Option<&'c CatalogRecord> {
        self.find_with_kind(catalog, query).map(|(record, _)| record)
    }

    /// Like [`find`](Self::find), also reporting which rule matched
    pub fn find_with_kind<'c>(
        &self,
        catalog: &'c Catalog,
        query: &MatchQuery,
    ) -> Option<(&'c CatalogRecord, MatchKind)> {
        let wanted = query.identifier.as_str();
        if let Some(record) = catalog
            .records
            .iter()
            .find(|record| record.identifier_cell() == Some(wanted))
        {
            info!("Matched row {} by identifier {}", record.row_position, wanted);
            return Some((record, MatchKind::ExactIdentifier));
        }

        if !self.slug_fallback {
            debug!("No row with identifier {}, slug fallback disabled", wanted);
            return None;
        }

        let hint = query.slug_hint.as_deref().map(slugify).filter(|s| !s.is_empty())?;
        let matched = catalog
            .records
            .iter()
            .find(|record| slugify(&record.title) == hint);

        match matched {
            Some(record) => {
                info!("Matched row {} by title slug '{}'", record.row_position, hint);
                Some((record, MatchKind::TitleSlug))
            }
            None => {
                debug!("No row with identifier {} or title slug '{}'", wanted, hint);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IdentifierSource;
    use crate::infrastructure::parsing::{CatalogParser, TextParser};

    fn catalog() -> Catalog {
        let raw = "\
Tilda UID,SKU,Название,Описание
\"782957961992\",P-045,Sunrise,Warm
100,P-046,Новые фрески Альтамира,Cave
100,P-047,Duplicate,Second";
        CatalogParser::new().parse(raw).unwrap()
    }

    #[test]
    fn test_exact_identifier_match() {
        let catalog = catalog();
        let query = MatchQuery::new(Identifier::new("782957961992"));
        let record = CatalogMatcher::new().find(&catalog, &query).unwrap();
        assert_eq!(record.title, "Sunrise");
        assert_eq!(record.derived_asset_id, "45");
    }

    #[test]
    fn test_first_duplicate_wins() {
        let catalog = catalog();
        let record = CatalogMatcher::new()
            .find(&catalog, &MatchQuery::new(Identifier::new("100")))
            .unwrap();
        assert_eq!(record.derived_asset_id, "46");
    }

    #[test]
    fn test_identifier_is_not_numeric() {
        let catalog = catalog();
        let query = MatchQuery::new(Identifier::new("0100"));
        assert!(CatalogMatcher::exact_only().find(&catalog, &query).is_none());
    }

    #[test]
    fn test_slug_fallback() {
        let catalog = catalog();
        let query = MatchQuery::new(Identifier::new("999")).with_slug_hint("novie-freski-altamira");
        let (record, kind) = CatalogMatcher::new().find_with_kind(&catalog, &query).unwrap();
        assert_eq!(record.title, "Новые фрески Альтамира");
        assert_eq!(kind, MatchKind::TitleSlug);

        assert!(CatalogMatcher::exact_only().find(&catalog, &query).is_none());
    }

    #[test]
    fn test_exact_match_preferred_over_slug() {
        let catalog = catalog();
        let query = MatchQuery::new(Identifier::new("782957961992")).with_slug_hint("duplicate");
        let (record, kind) = CatalogMatcher::new().find_with_kind(&catalog, &query).unwrap();
        assert_eq!(record.title, "Sunrise");
        assert_eq!(kind, MatchKind::ExactIdentifier);
    }

    #[test]
    fn test_query_from_resolved_identifier() {
        let resolved = ResolvedIdentifier::new(
            Identifier::new("999"),
            IdentifierSource::Path,
            "/tproduct/999-novie-freski-altamira",
        );
        let query = MatchQuery::from_resolved(&resolved);
        assert_eq!(query.slug_hint.as_deref(), Some("novie-freski-altamira"));
        assert!(CatalogMatcher::new().find(&catalog(), &query).is_some());
    }

    #[test]
    fn test_cyrillic_url_slug_matches_cyrillic_title() {
        let url = url::Url::parse("https://shop.test/tproduct/999-новые-фрески-альтамира").unwrap();
        let resolved = ResolvedIdentifier::new(Identifier::new("999"), IdentifierSource::Path, url.path());
        let query = MatchQuery::from_resolved(&resolved);

        let records = catalog();
        let (record, kind) = CatalogMatcher::new().find_with_kind(&records, &query).unwrap();
        assert_eq!(record.title, "Новые фрески Альтамира");
        assert_eq!(kind, MatchKind::TitleSlug);
    }

    #[test]
    fn test_no_match() {
        let query = MatchQuery::new(Identifier::new("1")).with_slug_hint("nothing-here");
        assert!(CatalogMatcher::new().find(&catalog(), &query).is_none());
    }
}
