//! Application layer module
//!
//! This module contains the resolution use case and the presentation
//! boundary it reports to.

pub mod presentation;
pub mod resolution_service;

pub use presentation::{ConsoleAdapter, PresentationAdapter, Presented, RecordingAdapter};
pub use resolution_service::ArtworkResolver;
