//! spritemux - Shared SVG sprite partitioning and assembly
//!
//! A build-tool engine that collects which vector-icon symbols each build
//! output references, collapses outputs with identical icon usage into the
//! smallest number of shared composite sprite files, and names those files
//! deterministically for cache busting. Duplicating icon markup into every
//! bundle wastes bytes; spritemux discovers the usage relation during the
//! host's module-processing phase and lets outputs that need the same icon
//! set reference one shared sprite.
//!
//! # Architecture Overview
//!
//! Data flows through the components in one direction per build pass:
//!
//! ```text
//! classifier ── accepts icon paths
//!      │
//!      ▼
//! usage registry ── concurrent reports: icon → {output names}
//!      │  (phase close)
//!      ▼
//! partitioning ── identical usage signatures share a partition
//!      │
//!      ▼
//! assembler ── one composite sprite + content-hashed filename each
//!      │  (join barrier)
//!      ▼
//! mapping tracker ── cumulative icon id → filename, across passes
//! ```
//!
//! # Core Modules
//!
//! - [`classifier`] - Injectable icon classifier with per-path verdict caching
//! - [`registry`] - Concurrency-safe icon usage relation and its phase boundary
//! - [`registry::delegation`] - One registry per top-level build, shared with
//!   subordinate builds
//! - [`partition`] - Usage-signature grouping into numbered partitions
//! - [`assembler`] - Composite sprite rendering and `[index]`/`[chunkcode]`
//!   filename resolution
//! - [`mapping`] - Process-lifetime cumulative output mapping
//! - [`pipeline`] - Per-pass orchestration the host drives
//! - [`config`] - Host-supplied sprite options
//! - [`core`] - Error types shared by everything above
//!
//! # Example
//!
//! ```rust
//! use std::path::Path;
//! use std::sync::Arc;
//! use spritemux::config::{SpriteOptions, UsageMode};
//! use spritemux::mapping::MappingTracker;
//! use spritemux::pipeline::SpritePipeline;
//! use spritemux::registry::delegation::BuildContext;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let options = SpriteOptions {
//!     filename_template: "sprite-[index]-[chunkcode].svg".to_string(),
//!     mode: UsageMode::MultiOutput,
//!     ..SpriteOptions::default()
//! };
//! let context = BuildContext::root(options.mode);
//! let pipeline = SpritePipeline::new(context, options)?
//!     .with_tracker(Arc::new(MappingTracker::new()));
//!
//! // Module-processing phase: the host reports usage as it encounters it
//! let registry = pipeline.context().registry();
//! let arrow = Path::new("/app/icons/arrow.svg");
//! if pipeline.classifier().is_icon(arrow) {
//!     registry.report(arrow, Some("main"));
//!     registry.supply_symbol(arrow, "<symbol id=\"arrow\"/>", None);
//! }
//!
//! // Usage is final: run the pass and emit the returned assets
//! let assets = pipeline.run_pass().await?;
//! assert_eq!(assets.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Determinism
//!
//! Everything downstream of the registry operates on a closed, path-sorted
//! snapshot, so the emitted filenames and sprite content depend only on the
//! final usage relation and symbol markup, never on report ordering, task
//! interleaving, wall-clock time, or randomness.

#![warn(missing_docs)]

pub mod assembler;
pub mod classifier;
pub mod config;
pub mod core;
pub mod mapping;
pub mod partition;
pub mod pipeline;
pub mod registry;

pub use crate::core::{Result, SpritemuxError};
