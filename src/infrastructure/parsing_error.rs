//! Catalog parsing error types
//!
//! The catalog is human-curated, so almost nothing in it is an error: short
//! rows, missing columns and stray quotes all degrade to defaults. What is
//! left here are the conditions under which no catalog can be built at all.

use thiserror::Error;

use crate::domain::ResolutionError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Catalog has {non_empty_lines} non-empty lines, need a header and at least one row")]
    EmptyCatalog { non_empty_lines: usize },

    #[error("Catalog source unreachable: {location} - {reason}")]
    SourceUnreachable { location: String, reason: String },
}

impl ParsingError {
    /// Create an empty catalog error
    pub const fn empty_catalog(non_empty_lines: usize) -> Self {
        Self::EmptyCatalog { non_empty_lines }
    }

    /// Create a source unreachable error
    pub fn source_unreachable(location: &str, reason: impl ToString) -> Self {
        Self::SourceUnreachable {
            location: location.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<ParsingError> for ResolutionError {
    fn from(error: ParsingError) -> Self {
        match error {
            ParsingError::EmptyCatalog { non_empty_lines } => Self::EmptyCatalog { non_empty_lines },
            ParsingError::SourceUnreachable { location, reason } => Self::CatalogUnreachable {
                reason: format!("{location}: {reason}"),
            },
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
