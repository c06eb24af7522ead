//! Cumulative icon → filename mapping
//!
//! After every successful pass, the pipeline records which sprite filename
//! each icon ended up in. The mapping is cumulative across passes: watch
//! and incremental rebuilds only re-report the icons they touched, and
//! consumers (a runtime icon-loading helper, typically) still need the
//! filenames assigned to everything else in earlier passes.
//!
//! Merging is therefore strictly additive: entries present in a pass
//! result overwrite prior values for the same icon id, entries the pass did
//! not touch survive, and nothing is ever deleted. An icon that disappears
//! from the build keeps its stale entry; that retention is deliberate (the
//! mapping is a lookup table, not a manifest of the current pass) and hosts
//! that want eviction must rebuild the tracker from scratch.
//!
//! [`MappingTracker::global`] hands out the one process-wide instance that
//! lives for the whole build-tool lifetime; scoped instances via
//! [`MappingTracker::new`] exist for hosts embedding several independent
//! builds in one process, and for tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, OnceLock};

use serde::Serialize;
use tracing::debug;

/// Snapshot of the cumulative icon-id → sprite-filename table.
///
/// `BTreeMap` keeps serialization deterministic for hosts that persist the
/// mapping as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OutputMapping(pub BTreeMap<String, String>);

impl OutputMapping {
    /// Looks up the sprite filename assigned to an icon id.
    #[must_use]
    pub fn get(&self, icon_id: &str) -> Option<&str> {
        self.0.get(icon_id).map(String::as_str)
    }

    /// Number of mapped icons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no icon has been mapped yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Long-lived tracker owning the cumulative mapping.
///
/// Writes happen only at pass barriers, never on the hot reporting path, so
/// a mutex-guarded map is all the concurrency this needs.
#[derive(Debug, Default)]
pub struct MappingTracker {
    mapping: Mutex<BTreeMap<String, String>>,
}

impl MappingTracker {
    /// Creates an empty tracker scoped to the caller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide tracker, created on first use and alive for the
    /// rest of the build-tool process.
    #[must_use]
    pub fn global() -> Arc<MappingTracker> {
        static GLOBAL: OnceLock<Arc<MappingTracker>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(MappingTracker::new())))
    }

    /// Merges one pass's icon → filename assignments into the table.
    ///
    /// Additive: existing entries not named in `pass_result` remain,
    /// entries that are named are overwritten.
    pub fn merge(&self, pass_result: impl IntoIterator<Item = (String, String)>) {
        let mut mapping = self.mapping.lock().unwrap_or_else(|poisoned| {
            // A panic while holding the lock cannot corrupt a BTreeMap insert
            poisoned.into_inner()
        });
        let before = mapping.len();
        mapping.extend(pass_result);
        debug!(
            added = mapping.len() - before,
            total = mapping.len(),
            "merged pass output mapping"
        );
    }

    /// Read-only snapshot of the cumulative mapping.
    #[must_use]
    pub fn current(&self) -> OutputMapping {
        let mapping = self
            .mapping
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        OutputMapping(mapping.clone())
    }
}
