//! Sprite generation options
//!
//! [`SpriteOptions`] carries everything the engine needs to know about how
//! the host wants sprites named, scoped, and classified. The crate never
//! loads configuration from disk itself; the host build system
//! deserializes whatever format it uses (JSON, TOML, programmatic) into
//! this struct and hands it over.
//!
//! # Example
//!
//! ```rust
//! use spritemux::config::{SpriteOptions, UsageMode};
//!
//! let options: SpriteOptions = serde_json::from_str(
//!     r#"{
//!         "filename_template": "sprite-[index]-[chunkcode].svg",
//!         "public_path": "assets/",
//!         "mode": "multi-output"
//!     }"#,
//! ).unwrap();
//! assert_eq!(options.mode, UsageMode::MultiOutput);
//! assert_eq!(options.background_prefix, "bg-");
//! ```

use serde::{Deserialize, Serialize};

/// How icon usage is attributed to build outputs.
///
/// In single-output mode every icon is attributed to one fixed sentinel
/// output, so a pass always produces at most one sprite. In multi-output
/// mode each icon is attributed to the top-level consumer that pulled it in,
/// and outputs with identical icon sets share a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UsageMode {
    /// All icons land in one partition under the sentinel output name.
    #[default]
    SingleOutput,
    /// Icons are grouped by which outputs reference them.
    MultiOutput,
}

/// Options controlling sprite partitioning and naming for one build.
///
/// All fields have defaults so hosts can deserialize partial configuration.
/// Changing any field invalidates per-process classification caches; build
/// a fresh [`ClassifierCache`](crate::classifier::ClassifierCache) from the
/// new options rather than reusing one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteOptions {
    /// Filename template for emitted sprites. Supports the `[index]` and
    /// `[chunkcode]` tokens; unknown bracketed tokens are left verbatim.
    pub filename_template: String,

    /// Prefix applied to emitted asset names (the host's public asset root).
    pub public_path: String,

    /// Whether partitioning is enabled (multi-output) or all icons share one
    /// sprite (single-output).
    pub mode: UsageMode,

    /// File-name prefix reserved for background images. Paths whose file
    /// name starts with this prefix are never classified as sprite icons,
    /// regardless of the classifier's general pattern.
    pub background_prefix: String,

    /// Regex applied to the full path by the built-in pattern classifier.
    /// Ignored when the host injects its own classifier.
    pub icon_pattern: String,
}

impl Default for SpriteOptions {
    fn default() -> Self {
        Self {
            filename_template: "sprite-[index].svg".to_string(),
            public_path: String::new(),
            mode: UsageMode::default(),
            background_prefix: "bg-".to_string(),
            icon_pattern: r"\.svg$".to_string(),
        }
    }
}
