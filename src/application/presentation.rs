//! Presentation boundary
//!
//! Rendering (canvas preview, pricing, cart) lives outside this crate. The
//! pipeline only hands finished outcomes across this trait.

use std::io::Write;
use std::sync::Mutex;

use serde::Serialize;

use crate::domain::{ArtworkView, ResolvedAsset};

/// Receiver of resolution outcomes
pub trait PresentationAdapter: Send + Sync {
    /// Render a matched record with whatever assets were found
    fn show_artwork(&self, view: &ArtworkView);

    /// Show a short user-facing message
    fn show_message(&self, message: &str);
}

/// Output shape of [`ConsoleAdapter`] in JSON mode
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ConsoleEvent<'a> {
    Artwork(&'a ArtworkView),
    Message { text: &'a str },
}

/// Prints outcomes to stdout, as text or one JSON object per line
#[derive(Debug, Default)]
pub struct ConsoleAdapter {
    json: bool,
}

impl ConsoleAdapter {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    fn emit(&self, event: &ConsoleEvent<'_>, text: impl FnOnce() -> String) {
        let line = if self.json {
            match serde_json::to_string(event) {
                Ok(line) => line,
                Err(e) => {
                    tracing::error!("Failed to serialize output: {}", e);
                    return;
                }
            }
        } else {
            text()
        };

        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{line}") {
            tracing::error!("Failed to write output: {}", e);
        }
    }
}

fn url_or_dash(asset: Option<&ResolvedAsset>) -> &str {
    asset.map_or("-", |asset| asset.url.as_str())
}

impl PresentationAdapter for ConsoleAdapter {
    fn show_artwork(&self, view: &ArtworkView) {
        self.emit(&ConsoleEvent::Artwork(view), || {
            format!(
                "{}\n  title:       {}\n  description: {}\n  asset id:    {}\n  image:       {}\n  thumbnail:   {}",
                view.identifier,
                view.record.title,
                view.record.description,
                view.record.derived_asset_id,
                url_or_dash(view.image.as_ref()),
                url_or_dash(view.thumbnail.as_ref()),
            )
        });
    }

    fn show_message(&self, message: &str) {
        self.emit(&ConsoleEvent::Message { text: message }, || message.to_string());
    }
}

/// What a [`RecordingAdapter`] saw
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presented {
    Artwork(Box<ArtworkView>),
    Message(String),
}

/// Keeps every outcome in memory, in call order
#[derive(Debug, Default)]
pub struct RecordingAdapter {
    events: Mutex<Vec<Presented>>,
}

impl RecordingAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Presented> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Presented::Message(text) => Some(text),
                Presented::Artwork(_) => None,
            })
            .collect()
    }

    pub fn artworks(&self) -> Vec<ArtworkView> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Presented::Artwork(view) => Some(*view),
                Presented::Message(_) => None,
            })
            .collect()
    }

    fn push(&self, event: Presented) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl PresentationAdapter for RecordingAdapter {
    fn show_artwork(&self, view: &ArtworkView) {
        self.push(Presented::Artwork(Box::new(view.clone())));
    }

    fn show_message(&self, message: &str) {
        self.push(Presented::Message(message.to_string()));
    }
}
