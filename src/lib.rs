//! Artframe - artwork asset resolution for framed painting previews
//!
//! Given the page a widget is embedded in, find which painting is being
//! viewed, look it up in the site's catalog and locate its image files.

pub mod application;
pub mod domain;
pub mod infrastructure;
