//! Sprite assembly and content-addressed naming
//!
//! Turns each [`Partition`](crate::partition::Partition) into one composite
//! sprite document plus a concrete filename resolved from the host's
//! template. Assembly is fully deterministic: for a fixed partition
//! membership and fixed symbol markup, repeated runs produce byte-identical
//! filenames and content. Nothing here looks at the clock or draws random
//! values; the `[chunkcode]` token is a digest of the markup itself, which
//! is what makes it usable as a cache-busting key.
//!
//! Partitions are rendered as independently awaitable tasks and joined with
//! a barrier in [`assemble_all`]: either every partition assembles and the
//! complete asset list is returned, or the first failure aborts the pass
//! with no partial results.
//!
//! # Template tokens
//!
//! - `[index]`: the partition's integer index, substituted immediately.
//! - `[chunkcode]`: 128-bit hex digest (SHA-256 prefix) of the
//!   concatenated symbol markup, substituted only after the partition's
//!   final symbol set is known.
//!
//! Unknown bracketed tokens are left verbatim; they are the host's problem,
//! not an error here.

use futures::future::try_join_all;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::core::{Result, SpritemuxError};
use crate::partition::Partition;

/// Template token substituted with the partition index.
pub const TOKEN_INDEX: &str = "[index]";
/// Template token substituted with the content hash.
pub const TOKEN_CHUNKCODE: &str = "[chunkcode]";

/// Hex characters kept from the SHA-256 digest: 32 nibbles = 128 bits.
const CHUNKCODE_HEX_LEN: usize = 32;

const SPRITE_OPEN: &str = concat!(
    r#"<svg xmlns="http://www.w3.org/2000/svg""#,
    r#" xmlns:xlink="http://www.w3.org/1999/xlink">"#
);
const SPRITE_CLOSE: &str = "</svg>";

/// One assembled sprite, ready for the host to emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteAsset {
    /// Resolved filename (template with all tokens substituted)
    pub filename: String,
    /// Name of the logical output unit the host should register for this
    /// asset (filename without the `.svg` suffix)
    pub chunk_name: String,
    /// Composite sprite document
    pub content: String,
    /// Symbol ids included in this sprite, in document order
    pub icon_ids: Vec<String>,
}

/// Computes the `[chunkcode]` digest for sprite markup.
#[must_use]
pub fn chunkcode(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    let mut hash = hex::encode(digest);
    hash.truncate(CHUNKCODE_HEX_LEN);
    hash
}

/// Substitutes the partition index into a filename template.
///
/// Unknown bracketed tokens survive untouched.
#[must_use]
pub fn resolve_index(template: &str, index: usize) -> String {
    template.replace(TOKEN_INDEX, &index.to_string())
}

/// Assembles one partition into a named composite sprite.
///
/// Fails with [`SpritemuxError::MissingSymbol`] if any icon in the
/// partition was reported but never had its symbol markup supplied; the
/// caller treats that as fatal for the whole pass.
pub fn assemble(partition: &Partition, template: &str) -> Result<SpriteAsset> {
    let mut filename = resolve_index(template, partition.index);

    let mut symbols = Vec::with_capacity(partition.icons.len());
    let mut icon_ids = Vec::with_capacity(partition.icons.len());
    for icon in &partition.icons {
        let markup = icon.symbol.as_deref().ok_or_else(|| SpritemuxError::MissingSymbol {
            id: icon.id.clone(),
            path: icon.path.clone(),
        })?;
        symbols.push(markup);
        icon_ids.push(icon.id.clone());
    }
    let joined = symbols.concat();

    // Hash only once the partition's final symbol set is known
    if filename.contains(TOKEN_CHUNKCODE) {
        filename = filename.replace(TOKEN_CHUNKCODE, &chunkcode(&joined));
    }

    let mut content =
        String::with_capacity(SPRITE_OPEN.len() + joined.len() + SPRITE_CLOSE.len());
    content.push_str(SPRITE_OPEN);
    content.push_str(&joined);
    content.push_str(SPRITE_CLOSE);

    let chunk_name = filename
        .strip_suffix(".svg")
        .unwrap_or(filename.as_str())
        .to_string();

    debug!(
        partition = partition.index,
        filename = %filename,
        symbols = icon_ids.len(),
        "assembled sprite"
    );

    Ok(SpriteAsset {
        filename,
        chunk_name,
        content,
        icon_ids,
    })
}

/// Assembles every partition concurrently and joins at a barrier.
///
/// All-or-nothing: the asset list is returned only when every partition
/// assembled. If any task fails, the error propagates and no assets from
/// sibling tasks are observable; outstanding tasks may still run to
/// completion, but their results are dropped.
pub async fn assemble_all(partitions: Vec<Partition>, template: &str) -> Result<Vec<SpriteAsset>> {
    let tasks = partitions.into_iter().map(|partition| {
        let template = template.to_string();
        tokio::spawn(async move { assemble(&partition, &template) })
    });

    let joined = try_join_all(tasks)
        .await
        .map_err(|join_err| SpritemuxError::AssemblyFailed {
            index: 0,
            reason: format!("assembly task panicked: {join_err}"),
        })?;

    joined.into_iter().collect()
}
