//! Build-pass orchestration
//!
//! [`SpritePipeline`] wires the components together for one build
//! hierarchy: the classifier cache the host consults during module
//! processing, the delegated usage registry collecting reports, and the
//! per-pass sequence that runs when the host signals "usage is now final":
//!
//! 1. close the registry and take the read-only snapshot;
//! 2. short-circuit an empty snapshot into a benign no-op (no assets, no
//!    callback, since nothing was eligible this pass);
//! 3. partition icons by usage signature and assemble every partition
//!    behind a join barrier;
//! 4. on full success only: merge the pass's icon → filename assignments
//!    into the cumulative tracker, invoke the host's mapping callback, and
//!    hand the finished sprite assets back for emission;
//! 5. reset the registry so the next pass starts from a clean relation and
//!    partition indices start again from zero.
//!
//! Assembly failure aborts the pass: the error propagates to the host,
//! nothing is emitted, and the cumulative mapping keeps its previous state.
//! The registry is still reset, so a watch rebuild starts the next pass
//! clean instead of reporting into a closed registry.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing::{debug, info, instrument};

use crate::assembler::{SpriteAsset, assemble_all};
use crate::classifier::{ClassifierCache, IconClassifier, PatternClassifier};
use crate::config::SpriteOptions;
use crate::core::Result as SpriteResult;
use crate::mapping::{MappingTracker, OutputMapping};
use crate::partition::build_partitions;
use crate::registry::UsageRegistry;
use crate::registry::delegation::BuildContext;

/// Host callback receiving the cumulative mapping after each pass.
pub type MappingCallback = dyn Fn(&OutputMapping) + Send + Sync;

/// Orchestrates sprite generation for one top-level build.
pub struct SpritePipeline {
    context: Arc<BuildContext>,
    options: SpriteOptions,
    classifier: ClassifierCache,
    tracker: Arc<MappingTracker>,
    on_mapping: Option<Box<MappingCallback>>,
}

impl SpritePipeline {
    /// Creates a pipeline for `context` using the built-in pattern
    /// classifier from `options` and the process-wide mapping tracker.
    ///
    /// Fails only when the configured icon pattern is not a valid regex.
    pub fn new(context: Arc<BuildContext>, options: SpriteOptions) -> SpriteResult<Self> {
        let classifier: Arc<dyn IconClassifier> =
            Arc::new(PatternClassifier::new(&options.icon_pattern)?);
        Ok(Self::with_classifier(context, options, classifier))
    }

    /// Creates a pipeline with a host-injected classifier.
    #[must_use]
    pub fn with_classifier(
        context: Arc<BuildContext>,
        options: SpriteOptions,
        classifier: Arc<dyn IconClassifier>,
    ) -> Self {
        let classifier = ClassifierCache::new(classifier, options.background_prefix.as_str());
        Self {
            context,
            options,
            classifier,
            tracker: MappingTracker::global(),
            on_mapping: None,
        }
    }

    /// Replaces the process-wide tracker with a scoped one.
    ///
    /// For hosts embedding several independent builds in one process, and
    /// for tests.
    #[must_use]
    pub fn with_tracker(mut self, tracker: Arc<MappingTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    /// Registers the callback invoked with the cumulative mapping after
    /// every successful, non-empty pass.
    #[must_use]
    pub fn on_mapping(
        mut self,
        callback: impl Fn(&OutputMapping) + Send + Sync + 'static,
    ) -> Self {
        self.on_mapping = Some(Box::new(callback));
        self
    }

    /// The build context this pipeline partitions for. Hosts hand clones of
    /// this to subordinate builds so their reports delegate here.
    #[must_use]
    pub fn context(&self) -> &Arc<BuildContext> {
        &self.context
    }

    /// The cached classifier the host consults during module processing.
    #[must_use]
    pub fn classifier(&self) -> &ClassifierCache {
        &self.classifier
    }

    /// Cumulative icon → filename mapping as of the last merged pass.
    #[must_use]
    pub fn current_mapping(&self) -> OutputMapping {
        self.tracker.current()
    }

    /// Runs one build pass over the usage collected since the last reset.
    ///
    /// Returns the sprite assets the host should emit, with
    /// [`SpriteOptions::public_path`] already applied to their filenames.
    /// The cumulative mapping keyed by icon id holds the bare (unprefixed)
    /// filenames, matching what runtime icon helpers resolve against.
    #[instrument(skip_all, fields(public_path = %self.options.public_path))]
    pub async fn run_pass(&self) -> Result<Vec<SpriteAsset>> {
        let registry = self.context.registry();
        let result = self.run_pass_inner(&registry).await;
        // Pass boundary: the next pass always starts from an open, empty
        // relation, whether this one succeeded or not.
        registry.reset();
        result
    }

    async fn run_pass_inner(&self, registry: &UsageRegistry) -> Result<Vec<SpriteAsset>> {
        let snapshot = registry.close();
        if snapshot.is_empty() {
            debug!("no eligible icons this pass, nothing to emit");
            return Ok(Vec::new());
        }

        snapshot
            .verify_unique_ids()
            .context("icon symbol ids must be unique across the build")?;

        let template = snapshot
            .template_fragment()
            .unwrap_or(&self.options.filename_template)
            .to_string();

        let partitions = build_partitions(&snapshot);
        let mut assets = assemble_all(partitions, &template)
            .await
            .context("sprite assembly failed, pass aborted")?;

        // Merge before prefixing: the mapping holds bare filenames
        let pass_result = assets.iter().flat_map(|asset| {
            asset
                .icon_ids
                .iter()
                .map(|id| (id.clone(), asset.filename.clone()))
        });
        self.tracker.merge(pass_result);

        if let Some(callback) = &self.on_mapping {
            callback(&self.tracker.current());
        }

        for asset in &mut assets {
            asset.filename = format!("{}{}", self.options.public_path, asset.filename);
        }

        info!(
            sprites = assets.len(),
            icons = snapshot.len(),
            "sprite pass complete"
        );
        Ok(assets)
    }
}
