//! Resolution outcome and the user-facing failure taxonomy

use serde::Serialize;
use thiserror::Error;

use super::{CatalogRecord, ResolvedAsset, ResolvedIdentifier};

/// Every way a resolution can stop short of a full artwork view.
///
/// None of these are faults: each one is either shown to the shopper as a
/// short message or skipped silently.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("no identifier in link")]
    NoIdentifierResolved,

    #[error("catalog unavailable: {reason}")]
    CatalogUnreachable { reason: String },

    #[error("catalog empty ({non_empty_lines} non-empty lines)")]
    EmptyCatalog { non_empty_lines: usize },

    #[error("item not found: {identifier}")]
    NoMatchingRecord { identifier: String },

    #[error("image not found for asset id {asset_id}")]
    NoAssetResolved { asset_id: String },

    #[error("malformed referrer: {referrer}")]
    MalformedReferrer { referrer: String },
}

impl ResolutionError {
    /// Short message for the presentation layer; `None` when the failure is
    /// not surfaced at all.
    pub const fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::NoIdentifierResolved => Some("no identifier in link"),
            Self::CatalogUnreachable { .. } => Some("catalog unavailable"),
            Self::EmptyCatalog { .. } => Some("catalog empty"),
            Self::NoMatchingRecord { .. } => Some("item not found"),
            Self::NoAssetResolved { .. } => Some("image not found"),
            Self::MalformedReferrer { .. } => None,
        }
    }

    pub const fn is_user_visible(&self) -> bool {
        self.user_message().is_some()
    }
}

/// Everything the presentation layer needs for a matched catalog record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtworkView {
    pub identifier: ResolvedIdentifier,
    pub record: CatalogRecord,
    pub image: Option<ResolvedAsset>,
    pub thumbnail: Option<ResolvedAsset>,
}

impl ArtworkView {
    /// The non-fatal notice to show next to the record, if any
    pub fn notice(&self) -> Option<ResolutionError> {
        if self.image.is_none() {
            Some(ResolutionError::NoAssetResolved {
                asset_id: self.record.derived_asset_id.clone(),
            })
        } else {
            None
        }
    }
}
