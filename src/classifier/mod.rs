//! Icon classification and per-path verdict caching
//!
//! The engine does not decide what counts as an icon; the host injects an
//! [`IconClassifier`] and this module only wraps it. The wrapper adds two
//! behaviors the host should not have to reimplement:
//!
//! 1. **Caching**: classification is pure for a stable path and a stable
//!    configuration, so verdicts are memoized per path in a lock-free map
//!    for the lifetime of one build process. Reclassifying the same path
//!    from many concurrent module-processing tasks costs one lookup.
//! 2. **Background reservation**: a path whose file name starts with the
//!    reserved background prefix (see
//!    [`SpriteOptions::background_prefix`](crate::config::SpriteOptions))
//!    is always rejected before the inner classifier is consulted.
//!    Background images share the `.svg` extension with icons but must
//!    never end up in a sprite.
//!
//! The cache is scoped to the options it was built from. When configuration
//! changes (watch mode reloading options), build a new [`ClassifierCache`];
//! stale verdicts from a previous rule set are never carried over.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use regex::Regex;
use tracing::trace;

use crate::core::Result;

/// Decides whether an asset path is an icon eligible for sprite inclusion.
///
/// Implementations must be pure for a fixed configuration: the same path
/// always yields the same verdict. Send + Sync because classification is
/// called from concurrent module-processing tasks.
pub trait IconClassifier: Send + Sync {
    /// Returns `true` if the asset at `path` should be collected into a
    /// shared sprite.
    fn is_icon(&self, path: &Path) -> bool;
}

/// Built-in classifier matching the full path against a configured regex.
///
/// Hosts with richer rules (module-type inspection, allow-lists) implement
/// [`IconClassifier`] themselves; this covers the common
/// "everything under `icons/` ending in `.svg`" case.
pub struct PatternClassifier {
    pattern: Regex,
}

impl PatternClassifier {
    /// Compiles a pattern classifier from the configured regex.
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl IconClassifier for PatternClassifier {
    fn is_icon(&self, path: &Path) -> bool {
        self.pattern.is_match(&path.to_string_lossy())
    }
}

/// Caching front for an injected classifier.
///
/// One instance per build process and per options generation. Cheap to
/// clone-share via `Arc`; all interior state is concurrency-safe.
pub struct ClassifierCache {
    inner: Arc<dyn IconClassifier>,
    background_prefix: String,
    verdicts: DashMap<PathBuf, bool>,
}

impl ClassifierCache {
    /// Wraps `classifier` with caching and the background-prefix reservation.
    pub fn new(classifier: Arc<dyn IconClassifier>, background_prefix: impl Into<String>) -> Self {
        Self {
            inner: classifier,
            background_prefix: background_prefix.into(),
            verdicts: DashMap::new(),
        }
    }

    /// Classifies `path`, consulting the cache first.
    ///
    /// The reserved background prefix is checked before the inner
    /// classifier, so a `bg-hero.svg` is rejected even when the general
    /// pattern would accept it.
    pub fn is_icon(&self, path: &Path) -> bool {
        if let Some(cached) = self.verdicts.get(path) {
            return *cached;
        }

        let verdict = !self.is_reserved_background(path) && self.inner.is_icon(path);
        trace!(path = %path.display(), verdict, "classified asset");
        self.verdicts.insert(path.to_path_buf(), verdict);
        verdict
    }

    /// Number of cached verdicts, for diagnostics.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.verdicts.len()
    }

    fn is_reserved_background(&self, path: &Path) -> bool {
        if self.background_prefix.is_empty() {
            return false;
        }
        path.file_name()
            .map(|name| {
                name.to_string_lossy()
                    .starts_with(self.background_prefix.as_str())
            })
            .unwrap_or(false)
    }
}

/// Derives the stable symbol identifier for an icon path.
///
/// The id is the file stem (basename without extension). It must be unique
/// across all icons in one build; collisions are surfaced when the symbol is
/// registered, not here.
#[must_use]
pub fn symbol_id(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
