//! Product identifier extraction from the page URL and referrer
//!
//! Sources are consulted in a fixed order and the first hit wins:
//! current query, current fragment, current path, then the same three on
//! the referrer, and finally any long digit run in the referrer URL.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};
use url::{Url, form_urlencoded};

use crate::domain::{Environment, Identifier, IdentifierSource, ResolutionError, ResolvedIdentifier};

/// Query keys in priority order
pub const QUERY_KEYS: [&str; 7] = ["pid", "uid", "sku", "product_uid", "external_id", "tilda_uid", "id"];

/// Fragment keys in priority order
pub const FRAGMENT_KEYS: [&str; 2] = ["uid", "id"];

/// Digits at the start of a path segment, followed by `-` or the segment end
static PATH_SEGMENT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)(?:-|$)").expect("path segment id regex"));

/// Six or more consecutive digits anywhere
static LONG_DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{6,}").expect("long digit regex"));

/// Resolves a single identifier from an [`Environment`] snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierResolver;

impl IdentifierResolver {
    pub const fn new() -> Self {
        Self
    }

    /// First identifier found in precedence order, or `None`
    pub fn resolve(&self, env: &Environment) -> Option<ResolvedIdentifier> {
        let resolved = Self::from_url(env.current(), false).or_else(|| {
            env.referrer()
                .and_then(Self::parse_referrer)
                .and_then(|referrer| Self::from_referrer(&referrer))
        });

        match &resolved {
            Some(found) => info!("Resolved identifier {}", found),
            None => debug!("No identifier in {} (referrer: {:?})", env.current(), env.referrer()),
        }
        resolved
    }

    fn parse_referrer(raw: &str) -> Option<Url> {
        match Url::parse(raw) {
            Ok(url) => Some(url),
            Err(e) => {
                let skipped = ResolutionError::MalformedReferrer {
                    referrer: raw.to_string(),
                };
                debug!("Skipping referrer ({}): {}", e, skipped);
                None
            }
        }
    }

    fn from_referrer(referrer: &Url) -> Option<ResolvedIdentifier> {
        Self::from_url(referrer, true).or_else(|| {
            LONG_DIGIT_RUN.find(referrer.as_str()).map(|m| {
                ResolvedIdentifier::new(
                    Identifier::new(m.as_str()),
                    IdentifierSource::ReferrerDigits,
                    referrer.path(),
                )
            })
        })
    }

    /// Query, fragment, then path of one URL
    fn from_url(url: &Url, is_referrer: bool) -> Option<ResolvedIdentifier> {
        let (query_source, fragment_source, path_source) = if is_referrer {
            (
                IdentifierSource::ReferrerQuery,
                IdentifierSource::ReferrerFragment,
                IdentifierSource::ReferrerPath,
            )
        } else {
            (IdentifierSource::Query, IdentifierSource::Fragment, IdentifierSource::Path)
        };

        let found = query_value(url.query(), &QUERY_KEYS)
            .map(|value| (value, query_source))
            .or_else(|| query_value(url.fragment(), &FRAGMENT_KEYS).map(|value| (value, fragment_source)))
            .or_else(|| path_identifier(url.path()).map(|value| (value, path_source)));

        found.map(|(value, source)| ResolvedIdentifier::new(Identifier::new(value), source, url.path()))
    }
}

/// Value of the first key (in `keys` order) present with a non-empty value.
///
/// Only the first occurrence of a key is looked at, like
/// `URLSearchParams.get`. One leading `?` is ignored (`#?uid=4`).
pub fn query_value(query: Option<&str>, keys: &[&str]) -> Option<String> {
    let query = query?;
    let query = query.strip_prefix('?').unwrap_or(query);
    let pairs: Vec<_> = form_urlencoded::parse(query.as_bytes()).collect();
    keys.iter().find_map(|key| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .filter(|v| !v.is_empty())
            .map(ToString::to_string)
    })
}

/// Digits leading the first path segment that is digits followed by `-` or
/// nothing
pub fn path_identifier(path: &str) -> Option<String> {
    path.split('/')
        .find_map(|segment| PATH_SEGMENT_ID.captures(segment).map(|caps| caps[1].to_string()))
}
