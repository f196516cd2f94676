//! Domain module - Core types of the artwork resolution pipeline
//!
//! This module contains the value objects that flow between the pipeline
//! stages: the page environment snapshot, resolved identifiers, parsed
//! catalog records, asset candidates and the resolution outcome.
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod asset;
pub mod catalog;
pub mod environment;
pub mod identifier;
pub mod outcome;

// Re-export commonly used items for convenience
pub use asset::{AssetCandidate, ProbeMode, ResolvedAsset};
pub use catalog::{Catalog, CatalogRecord, ColumnKind, ColumnMap, Delimiter};
pub use environment::Environment;
pub use identifier::{Identifier, IdentifierSource, ResolvedIdentifier};
pub use outcome::{ArtworkView, ResolutionError};
