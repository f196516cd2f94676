use serde::{Deserialize, Serialize};
use std::fmt;

/// Product identifier token taken from the page URL or referrer.
///
/// Compared by exact string equality against catalog cells; never parsed as
/// a number ("00123" and "123" are different identifiers).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Where an identifier was found, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierSource {
    Query,
    Fragment,
    Path,
    ReferrerQuery,
    ReferrerFragment,
    ReferrerPath,
    ReferrerDigits,
}

impl IdentifierSource {
    pub const fn is_referrer(self) -> bool {
        matches!(
            self,
            Self::ReferrerQuery | Self::ReferrerFragment | Self::ReferrerPath | Self::ReferrerDigits
        )
    }
}

impl fmt::Display for IdentifierSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Query => "query",
            Self::Fragment => "fragment",
            Self::Path => "path",
            Self::ReferrerQuery => "referrer query",
            Self::ReferrerFragment => "referrer fragment",
            Self::ReferrerPath => "referrer path",
            Self::ReferrerDigits => "referrer digits",
        };
        f.write_str(name)
    }
}

/// An identifier together with its origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedIdentifier {
    pub identifier: Identifier,
    pub source: IdentifierSource,
    /// Path of the URL the identifier came from, used for slug matching
    pub origin_path: String,
}

impl ResolvedIdentifier {
    pub fn new(identifier: Identifier, source: IdentifierSource, origin_path: impl Into<String>) -> Self {
        Self {
            identifier,
            source,
            origin_path: origin_path.into(),
        }
    }
}

impl fmt::Display for ResolvedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (from {})", self.identifier, self.source)
    }
}
