//! Error handling for spritemux
//!
//! All fallible operations in this crate return [`SpritemuxError`] (or
//! `anyhow::Result` at the pipeline boundary, where errors from several
//! subsystems are aggregated with context). The variants map directly onto
//! the failure taxonomy of a build pass:
//!
//! - **Recoverable conditions** (an icon reported with no owning output, an
//!   empty pass) are absorbed locally and never surface as errors; the
//!   affected components degrade to empty results.
//! - **Assembly failures** ([`SpritemuxError::AssemblyFailed`],
//!   [`SpritemuxError::MissingSymbol`], [`SpritemuxError::DuplicateSymbolId`])
//!   are fatal for the current pass: no sprite assets are produced and the
//!   cumulative output mapping is left untouched.
//!
//! No retries happen inside the crate; a failed pass is expected to be
//! retried, if at all, by the next build invocation.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for sprite partitioning and assembly operations.
#[derive(Error, Debug)]
pub enum SpritemuxError {
    /// Two distinct icon paths derived the same symbol identifier.
    ///
    /// Symbol ids must be unique across all icons in one build because the
    /// composite sprite keys each symbol definition by id.
    #[error("duplicate symbol id '{id}' for '{path}' (already registered by '{existing}')")]
    DuplicateSymbolId {
        /// The colliding identifier
        id: String,
        /// Path of the icon that triggered the collision
        path: PathBuf,
        /// Path that registered the id first
        existing: PathBuf,
    },

    /// An icon was admitted to the registry but its symbol markup was never
    /// supplied before assembly ran.
    #[error("no symbol markup supplied for icon '{id}' ({path})")]
    MissingSymbol {
        /// Symbol identifier of the incomplete icon
        id: String,
        /// Source path of the incomplete icon
        path: PathBuf,
    },

    /// Composite rendering failed for a partition.
    ///
    /// Fatal for the pass: when any partition fails, no assets are emitted
    /// and the output mapping is not merged.
    #[error("sprite assembly failed for partition {index}: {reason}")]
    AssemblyFailed {
        /// Index of the failing partition
        index: usize,
        /// Why rendering failed
        reason: String,
    },

    /// The icon pattern configured for the built-in classifier is not a
    /// valid regular expression.
    #[error("invalid icon pattern: {0}")]
    InvalidIconPattern(#[from] regex::Error),
}

/// Convenient result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SpritemuxError>;
