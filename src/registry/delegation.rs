//! Registry delegation across nested build processes
//!
//! A host build may spawn subordinate builds (a child compiler rendering a
//! derived sub-graph). Usage discovered in a subordinate pass must land in
//! the registry owned by the top-level build, or partitioning would run over
//! a fragmented relation and every nested build would emit its own sprites.
//!
//! [`BuildContext`] models the process hierarchy explicitly: every context
//! holds an optional reference to its parent, and
//! [`BuildContext::registry`] walks that chain to the root and lazily
//! attaches the single [`UsageRegistry`] there. Contexts are passed
//! explicitly, with no ambient global, so two unrelated top-level
//! builds in one process each get their own registry.

use std::sync::{Arc, OnceLock};

use crate::config::UsageMode;
use crate::registry::UsageRegistry;

/// One build process in the host's compiler hierarchy.
pub struct BuildContext {
    mode: UsageMode,
    parent: Option<Arc<BuildContext>>,
    registry: OnceLock<Arc<UsageRegistry>>,
}

impl BuildContext {
    /// Creates a top-level build context. The registry lazily attached to
    /// this context will use `mode`.
    #[must_use]
    pub fn root(mode: UsageMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            parent: None,
            registry: OnceLock::new(),
        })
    }

    /// Creates a context for a subordinate build nested under `parent`.
    ///
    /// The child never owns a registry; all of its reads and writes resolve
    /// to the top-level context's instance.
    #[must_use]
    pub fn child(parent: &Arc<BuildContext>) -> Arc<Self> {
        Arc::new(Self {
            mode: parent.mode,
            parent: Some(Arc::clone(parent)),
            registry: OnceLock::new(),
        })
    }

    /// Whether this context belongs to a subordinate build.
    #[must_use]
    pub fn is_subordinate(&self) -> bool {
        self.parent.is_some()
    }

    /// Resolves the top-level context this build belongs to.
    #[must_use]
    pub fn top_level(self: &Arc<Self>) -> Arc<BuildContext> {
        let mut current = Arc::clone(self);
        while let Some(parent) = current.parent.as_ref() {
            current = Arc::clone(parent);
        }
        current
    }

    /// The single usage registry for this build hierarchy.
    ///
    /// Resolution walks to the root context and lazily attaches one
    /// registry there on first use, so every descendant, however deeply
    /// nested, shares the same instance.
    #[must_use]
    pub fn registry(self: &Arc<Self>) -> Arc<UsageRegistry> {
        let root = self.top_level();
        let registry = root
            .registry
            .get_or_init(|| Arc::new(UsageRegistry::new(root.mode)));
        Arc::clone(registry)
    }
}
