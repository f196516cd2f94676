//! Image asset probing
//!
//! Asset files are named after the catalog-derived id, but the naming is not
//! consistent across uploads: the id may be zero-padded, carry a suffix, sit
//! in a folder with different casing and use any of four extensions. The
//! probe enumerates all combinations in a fixed order and asks an
//! [`AssetExistence`] check which of them is real.
//!
//! Two disciplines are supported:
//! - [`ProbeMode::Sequential`]: candidates are checked one at a time in
//!   generated order, so the lowest-index existing candidate always wins.
//! - [`ProbeMode::Parallel`]: every check is spawned at once and the first
//!   one to *complete* successfully wins. The winner is not necessarily the
//!   lowest-index candidate.

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::domain::{AssetCandidate, ProbeMode, ResolvedAsset};
use crate::infrastructure::config::defaults;

/// Existence check for one candidate path.
///
/// Implementations answer `true` only when the resource can be fetched and
/// decodes as an image. Every failure (missing file, HTTP error, timeout,
/// undecodable bytes) is `false`; nothing is propagated.
#[async_trait]
pub trait AssetExistence: Send + Sync {
    async fn exists(&self, candidate: &AssetCandidate) -> bool;
}

/// Candidate space and discipline for one probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOptions {
    /// Folder roots, outermost loop
    pub folders: Vec<String>,
    /// Zero-padding widths applied to the id; 0 keeps the id as is
    pub pad_widths: Vec<usize>,
    /// Filename suffixes placed between the id and the extension
    pub suffixes: Vec<String>,
    /// Extensions without the dot, innermost loop
    pub extensions: Vec<String>,
    #[serde(default)]
    pub mode: ProbeMode,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

impl ProbeOptions {
    /// Profile for the full-size painting image
    pub fn image() -> Self {
        Self {
            folders: owned(defaults::ASSET_FOLDERS),
            pad_widths: defaults::ASSET_PAD_WIDTHS.to_vec(),
            suffixes: owned(defaults::IMAGE_SUFFIXES),
            extensions: owned(defaults::ASSET_EXTENSIONS),
            mode: ProbeMode::Sequential,
        }
    }

    /// Profile for the picker thumbnail
    pub fn thumbnail() -> Self {
        Self {
            folders: owned(defaults::ASSET_FOLDERS),
            pad_widths: defaults::ASSET_PAD_WIDTHS.to_vec(),
            suffixes: owned(defaults::THUMBNAIL_SUFFIXES),
            extensions: owned(defaults::ASSET_EXTENSIONS),
            mode: ProbeMode::Parallel,
        }
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: ProbeMode) -> Self {
        self.mode = mode;
        self
    }

    /// The id padded to each width, duplicates removed, order kept
    pub fn id_variants(&self, asset_id: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.pad_widths
            .iter()
            .map(|&width| format!("{asset_id:0>width$}"))
            .filter(|variant| seen.insert(variant.clone()))
            .collect()
    }

    /// All candidate paths in probe precedence order.
    ///
    /// Nesting is folder, id variant, suffix, extension (innermost). Repeated
    /// paths keep their first position only.
    pub fn candidates(&self, asset_id: &str) -> Vec<AssetCandidate> {
        let variants = self.id_variants(asset_id);
        let mut seen = HashSet::new();
        let mut candidates = Vec::with_capacity(
            self.folders.len() * variants.len() * self.suffixes.len() * self.extensions.len(),
        );

        for folder in &self.folders {
            for variant in &variants {
                for suffix in &self.suffixes {
                    for extension in &self.extensions {
                        let candidate = AssetCandidate::new(folder, variant, suffix, extension);
                        if seen.insert(candidate.clone()) {
                            candidates.push(candidate);
                        }
                    }
                }
            }
        }
        candidates
    }
}

/// Single-assignment result cell shared by parallel checks.
///
/// The first successful check stores its asset; every later success finds
/// the cell set and does nothing.
#[derive(Debug, Clone, Default)]
pub struct ProbeLatch {
    cell: Arc<OnceLock<ResolvedAsset>>,
}

impl ProbeLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the winner; `false` if a winner was already recorded
    pub fn set(&self, asset: ResolvedAsset) -> bool {
        self.cell.set(asset).is_ok()
    }

    pub fn get(&self) -> Option<ResolvedAsset> {
        self.cell.get().cloned()
    }

    pub fn is_set(&self) -> bool {
        self.cell.get().is_some()
    }
}

/// Resolves an asset id to the first existing candidate
#[derive(Clone)]
pub struct AssetProbe {
    checker: Arc<dyn AssetExistence>,
}

impl std::fmt::Debug for AssetProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetProbe").finish_non_exhaustive()
    }
}

impl AssetProbe {
    pub fn new(checker: Arc<dyn AssetExistence>) -> Self {
        Self { checker }
    }

    /// Generate candidates for `asset_id` and probe them with the options' mode
    pub async fn probe(&self, asset_id: &str, options: &ProbeOptions) -> Option<ResolvedAsset> {
        let candidates = options.candidates(asset_id);
        debug!(
            "Probing {} candidates for asset id {} ({:?})",
            candidates.len(),
            asset_id,
            options.mode
        );
        let resolved = self.probe_candidates(candidates, options.mode).await;
        match &resolved {
            Some(asset) => info!("Asset id {} resolved to {}", asset_id, asset),
            None => info!("No asset found for id {}", asset_id),
        }
        resolved
    }

    /// Probe an explicit candidate list
    pub async fn probe_candidates(
        &self,
        candidates: Vec<AssetCandidate>,
        mode: ProbeMode,
    ) -> Option<ResolvedAsset> {
        match mode {
            ProbeMode::Sequential => self.probe_sequential(&candidates).await,
            ProbeMode::Parallel => self.probe_parallel(candidates).await,
        }
    }

    /// One check at a time; candidate N+1 is never tried before N has failed
    pub async fn probe_sequential(&self, candidates: &[AssetCandidate]) -> Option<ResolvedAsset> {
        for (index, candidate) in candidates.iter().enumerate() {
            debug!("Trying asset candidate {}/{}: {}", index + 1, candidates.len(), candidate);
            if self.checker.exists(candidate).await {
                return Some(candidate.clone().into());
            }
            debug!("Asset candidate not found: {}", candidate);
        }
        None
    }

    /// All checks at once; the first success by completion time wins.
    ///
    /// Returns as soon as the latch is set. Checks still in flight keep
    /// running to completion and their results are ignored. When nothing
    /// succeeds, `None` is returned only after every check has finished.
    pub async fn probe_parallel(&self, candidates: Vec<AssetCandidate>) -> Option<ResolvedAsset> {
        let total = candidates.len();
        let latch = ProbeLatch::new();
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<()>();

        for candidate in candidates {
            let checker = Arc::clone(&self.checker);
            let latch = latch.clone();
            let done = done_tx.clone();
            tokio::spawn(async move {
                if checker.exists(&candidate).await {
                    if latch.set(candidate.clone().into()) {
                        debug!("Asset candidate won the probe: {}", candidate);
                    } else {
                        debug!("Asset candidate exists but probe already latched: {}", candidate);
                    }
                } else {
                    debug!("Asset candidate not found: {}", candidate);
                }
                // The receiver is gone once a winner was returned
                let _ = done.send(());
            });
        }
        drop(done_tx);

        let mut completed = 0usize;
        while done_rx.recv().await.is_some() {
            completed += 1;
            if let Some(winner) = latch.get() {
                debug!("Parallel probe latched after {}/{} completions", completed, total);
                return Some(winner);
            }
        }

        // Every sender has been dropped, so every check has finished
        debug!("Parallel probe exhausted {}/{} candidates", completed, total);
        latch.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Existence check backed by a fixed set of paths, with per-path delays
    #[derive(Default)]
    struct MockExistence {
        existing: HashSet<String>,
        delays_ms: HashMap<String, u64>,
        checked: Mutex<Vec<String>>,
        completed: AtomicUsize,
    }

    impl MockExistence {
        fn with_existing(paths: &[&str]) -> Self {
            Self {
                existing: paths.iter().map(ToString::to_string).collect(),
                ..Self::default()
            }
        }

        fn delay(mut self, path: &str, ms: u64) -> Self {
            self.delays_ms.insert(path.to_string(), ms);
            self
        }

        fn checked(&self) -> Vec<String> {
            self.checked.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AssetExistence for MockExistence {
        async fn exists(&self, candidate: &AssetCandidate) -> bool {
            self.checked.lock().unwrap().push(candidate.path().to_string());
            if let Some(ms) = self.delays_ms.get(candidate.path()) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            self.completed.fetch_add(1, Ordering::SeqCst);
            self.existing.contains(candidate.path())
        }
    }

    fn candidates(paths: &[&str]) -> Vec<AssetCandidate> {
        paths.iter().map(|p| AssetCandidate::from(*p)).collect()
    }

    fn small_options() -> ProbeOptions {
        ProbeOptions {
            folders: vec!["a".into(), "b".into()],
            pad_widths: vec![0, 2, 3],
            suffixes: vec![String::new(), "_x".into()],
            extensions: vec!["jpg".into(), "png".into()],
            mode: ProbeMode::Sequential,
        }
    }

    #[test]
    fn test_id_variants_are_deduplicated() {
        let options = small_options();
        assert_eq!(options.id_variants("45"), vec!["45", "045"]);
        assert_eq!(options.id_variants("7"), vec!["7", "07", "007"]);
        assert_eq!(options.id_variants("1234"), vec!["1234"]);
    }

    #[test]
    fn test_candidate_order_is_folder_variant_suffix_extension() {
        let paths: Vec<String> = small_options()
            .candidates("45")
            .iter()
            .map(|c| c.path().to_string())
            .collect();

        assert_eq!(paths.len(), 16);
        assert_eq!(
            &paths[..8],
            &[
                "a/45.jpg", "a/45.png", "a/45_x.jpg", "a/45_x.png", "a/045.jpg", "a/045.png", "a/045_x.jpg",
                "a/045_x.png",
            ]
        );
        assert_eq!(paths[8], "b/45.jpg");
    }

    #[test]
    fn test_repeated_options_do_not_repeat_candidates() {
        let options = ProbeOptions {
            folders: vec!["a".into(), "a/".into()],
            ..small_options()
        };
        assert_eq!(options.candidates("45").len(), 8);
    }

    #[test]
    fn test_default_profiles() {
        let image = ProbeOptions::image();
        assert_eq!(image.mode, ProbeMode::Sequential);
        let paths: Vec<AssetCandidate> = image.candidates("45");
        // 2 folders x 2 variants x 3 suffixes x 4 extensions
        assert_eq!(paths.len(), 48);
        assert_eq!(paths[0].path(), "images/paintings/45.jpg");
        assert!(paths.contains(&AssetCandidate::from("images/Paintings/45_large.jpg")));

        let thumbnail = ProbeOptions::thumbnail();
        assert_eq!(thumbnail.mode, ProbeMode::Parallel);
        assert!(thumbnail.candidates("45").contains(&AssetCandidate::from("images/paintings/045-thumb.webp")));
    }

    #[tokio::test]
    async fn test_sequential_stops_at_first_success() {
        let mock = Arc::new(MockExistence::with_existing(&["B", "C"]));
        let probe = AssetProbe::new(mock.clone());

        let resolved = probe.probe_sequential(&candidates(&["A", "B", "C"])).await;

        assert_eq!(resolved, Some(ResolvedAsset { url: "B".into() }));
        assert_eq!(mock.checked(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_sequential_exhausts_in_order() {
        let mock = Arc::new(MockExistence::with_existing(&[]));
        let probe = AssetProbe::new(mock.clone());

        let resolved = probe.probe_sequential(&candidates(&["A", "B", "C"])).await;

        assert!(resolved.is_none());
        assert_eq!(mock.checked(), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_parallel_first_completion_wins() {
        let mock = Arc::new(MockExistence::with_existing(&["B", "C"]).delay("B", 200).delay("C", 5));
        let probe = AssetProbe::new(mock.clone());

        let resolved = probe.probe_parallel(candidates(&["A", "B", "C"])).await;

        assert_eq!(resolved, Some(ResolvedAsset { url: "C".into() }));
    }

    #[tokio::test]
    async fn test_parallel_absent_only_after_all_checks_completed() {
        let mock = Arc::new(
            MockExistence::with_existing(&[])
                .delay("A", 30)
                .delay("B", 5)
                .delay("C", 60),
        );
        let probe = AssetProbe::new(mock.clone());

        let resolved = probe.probe_parallel(candidates(&["A", "B", "C", "D"])).await;

        assert!(resolved.is_none());
        assert_eq!(mock.completed.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_parallel_with_no_candidates() {
        let probe = AssetProbe::new(Arc::new(MockExistence::default()));
        assert!(probe.probe_parallel(Vec::new()).await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_uses_options_mode() {
        let mock = Arc::new(MockExistence::with_existing(&["a/045_x.png"]));
        let probe = AssetProbe::new(mock.clone());

        let sequential = probe.probe("45", &small_options()).await;
        assert_eq!(sequential.map(|a| a.url), Some("a/045_x.png".to_string()));
        assert_eq!(mock.checked().len(), 8);

        let parallel = probe
            .probe("45", &small_options().with_mode(ProbeMode::Parallel))
            .await;
        assert_eq!(parallel.map(|a| a.url), Some("a/045_x.png".to_string()));
    }

    #[test]
    fn test_latch_keeps_first_value() {
        let latch = ProbeLatch::new();
        assert!(!latch.is_set());
        assert!(latch.set(ResolvedAsset { url: "first".into() }));
        assert!(!latch.set(ResolvedAsset { url: "second".into() }));
        assert_eq!(latch.get().map(|a| a.url), Some("first".to_string()));
    }
}
