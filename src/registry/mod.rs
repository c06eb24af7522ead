//! Icon usage registry
//!
//! The one piece of mutable shared state in the engine. During the host's
//! module-processing phase, many independent tasks report which build output
//! pulled in which icon, in no particular order and possibly interleaved.
//! The registry is a concurrency-safe append-only multimap from icon path to
//! the set of referencing output names, built on `DashMap` so concurrent
//! reports never lose updates and never block each other on unrelated icons.
//!
//! # Phase discipline
//!
//! The registry has exactly two phases per build pass:
//!
//! 1. **Open**: [`UsageRegistry::report`] and
//!    [`UsageRegistry::supply_symbol`] accept writes from any number of
//!    concurrent callers.
//! 2. **Closed**: [`UsageRegistry::close`] flips the phase and returns a
//!    [`UsageSnapshot`]: an immutable, path-sorted view of the relation.
//!    Partitioning and assembly only ever read this snapshot, so their logic
//!    is sequential and race-free by construction. Late reports after close
//!    are warned about and dropped.
//!
//! [`UsageRegistry::reset`] clears the relation and reopens the registry at
//! the pass boundary, so partition indices always start from zero each pass.
//!
//! # Ownership across nested builds
//!
//! When a build spawns subordinate builds, all of them must write into the
//! top-level build's registry. See [`delegation`] for the context chain that
//! guarantees this.

pub mod delegation;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::classifier::symbol_id;
use crate::config::UsageMode;
use crate::core::{Result, SpritemuxError};

/// Output name used for every icon when partitioning is disabled.
pub const SENTINEL_OUTPUT: &str = "single-entry";

/// One icon known to the registry.
///
/// Created lazily on the first report or symbol registration for a path.
/// The identifier is derived from the path's basename and must be unique
/// across the build; the symbol markup is supplied once and never mutated.
#[derive(Debug, Clone)]
pub struct IconRecord {
    /// Normalized absolute source path (the icon's identity)
    pub path: PathBuf,
    /// Stable symbol identifier derived from the basename
    pub id: String,
    /// Rendered symbol markup, opaque to the engine
    pub symbol: Option<String>,
    /// Filename-template fragment the icon was discovered under
    pub template: Option<String>,
    /// Names of the outputs referencing this icon
    pub outputs: BTreeSet<String>,
}

impl IconRecord {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            id: symbol_id(path),
            symbol: None,
            template: None,
            outputs: BTreeSet::new(),
        }
    }
}

/// Concurrency-safe relation between icons and the outputs that use them.
pub struct UsageRegistry {
    mode: UsageMode,
    closed: AtomicBool,
    icons: DashMap<PathBuf, IconRecord>,
}

impl UsageRegistry {
    /// Creates an empty, open registry for the given usage mode.
    #[must_use]
    pub fn new(mode: UsageMode) -> Self {
        Self {
            mode,
            closed: AtomicBool::new(false),
            icons: DashMap::new(),
        }
    }

    /// The usage mode this registry was created with.
    #[must_use]
    pub fn mode(&self) -> UsageMode {
        self.mode
    }

    /// Whether the current pass's write phase has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Records that `output` uses the icon at `path`.
    ///
    /// Set semantics: reporting the same output for the same icon twice is a
    /// no-op. In single-output mode the reported name is ignored and the
    /// sentinel output is recorded instead. A `None` output (no resolvable
    /// owner) is a defensive no-op, not an error; the icon simply stays
    /// out of any sprite unless some other report claims it.
    ///
    /// Safe to call from any number of concurrent tasks; relative ordering
    /// of calls never changes the final relation.
    pub fn report(&self, path: &Path, output: Option<&str>) {
        if self.is_closed() {
            warn!(path = %path.display(), "usage report after phase close, ignoring");
            return;
        }

        let output = match self.mode {
            UsageMode::SingleOutput => SENTINEL_OUTPUT,
            UsageMode::MultiOutput => match output {
                Some(name) => name,
                None => {
                    debug!(
                        path = %path.display(),
                        "icon reported without a resolvable owning output, skipping"
                    );
                    return;
                }
            },
        };

        let mut record = self
            .icons
            .entry(path.to_path_buf())
            .or_insert_with(|| IconRecord::new(path));
        record.outputs.insert(output.to_string());
    }

    /// Supplies the rendered symbol markup (and the filename-template
    /// fragment it was discovered under) for the icon at `path`.
    ///
    /// The markup is write-once: later calls for the same path keep the
    /// first markup. Lazily creates the icon's record, so symbol
    /// registration and usage reporting may arrive in either order.
    pub fn supply_symbol(&self, path: &Path, markup: impl Into<String>, template: Option<&str>) {
        if self.is_closed() {
            warn!(path = %path.display(), "symbol supplied after phase close, ignoring");
            return;
        }

        let mut record = self
            .icons
            .entry(path.to_path_buf())
            .or_insert_with(|| IconRecord::new(path));
        if record.symbol.is_none() {
            record.symbol = Some(markup.into());
        }
        if record.template.is_none() {
            if let Some(template) = template {
                record.template = Some(template.to_string());
            }
        }
    }

    /// Closes the write phase and returns the read-only relation.
    ///
    /// Icons are keyed and iterated in sorted-path order, which makes every
    /// downstream computation independent of the order reports arrived in.
    /// Calling `close` twice in one pass yields the same snapshot.
    #[must_use]
    pub fn close(&self) -> UsageSnapshot {
        self.closed.store(true, Ordering::Release);
        let icons: BTreeMap<PathBuf, IconRecord> = self
            .icons
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        debug!(icons = icons.len(), "usage registry closed");
        UsageSnapshot { icons }
    }

    /// Clears all per-pass state and reopens the registry.
    ///
    /// Must run at the pass boundary; without it, partition indices would
    /// grow without bound across incremental rebuilds.
    pub fn reset(&self) {
        self.icons.clear();
        self.closed.store(false, Ordering::Release);
    }
}

/// Immutable, path-sorted view of a closed registry.
pub struct UsageSnapshot {
    icons: BTreeMap<PathBuf, IconRecord>,
}

impl UsageSnapshot {
    /// True when the pass discovered no icons at all (a benign no-op pass).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Number of icons in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    /// Icons in deterministic sorted-path order.
    pub fn iter(&self) -> impl Iterator<Item = &IconRecord> {
        self.icons.values()
    }

    /// The filename-template fragment the pass's icons were discovered
    /// under, if any supplied one. All icons of a build share one sprite
    /// rule, so the first fragment found wins.
    #[must_use]
    pub fn template_fragment(&self) -> Option<&str> {
        self.icons
            .values()
            .find_map(|record| record.template.as_deref())
    }

    /// Verifies that symbol identifiers are unique across the snapshot.
    ///
    /// Ids key the symbol definitions inside a composite sprite, so a
    /// collision would make one icon shadow another at point of use.
    pub fn verify_unique_ids(&self) -> Result<()> {
        let mut seen: BTreeMap<&str, &Path> = BTreeMap::new();
        for record in self.icons.values() {
            if let Some(existing) = seen.insert(record.id.as_str(), record.path.as_path()) {
                return Err(SpritemuxError::DuplicateSymbolId {
                    id: record.id.clone(),
                    path: record.path.clone(),
                    existing: existing.to_path_buf(),
                });
            }
        }
        Ok(())
    }
}
