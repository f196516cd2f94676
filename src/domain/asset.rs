use serde::{Deserialize, Serialize};
use std::fmt;

/// Relative path of one image file that may exist under the site root
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AssetCandidate(String);

impl AssetCandidate {
    /// `{folder}/{padded_id}{suffix}.{extension}`
    pub fn new(folder: &str, padded_id: &str, suffix: &str, extension: &str) -> Self {
        let folder = folder.trim_end_matches('/');
        Self(format!("{folder}/{padded_id}{suffix}.{extension}"))
    }

    pub fn path(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetCandidate {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

/// A candidate that was confirmed to exist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedAsset {
    pub url: String,
}

impl From<AssetCandidate> for ResolvedAsset {
    fn from(candidate: AssetCandidate) -> Self {
        Self { url: candidate.0 }
    }
}

impl fmt::Display for ResolvedAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Probe discipline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMode {
    /// One check in flight; the lowest-index existing candidate wins.
    #[default]
    Sequential,
    /// All checks issued at once; the first to complete successfully wins.
    Parallel,
}
