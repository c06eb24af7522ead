//! Partitioning engine
//!
//! Consumes a closed [`UsageSnapshot`](crate::registry::UsageSnapshot) and
//! collapses icons whose usage signatures are equal into numbered
//! partitions. Each partition is later rendered into exactly one shared
//! sprite file, so two outputs that reference the same icon set end up
//! loading one file between them.
//!
//! The signature is canonical: sorted, deduplicated, `&`-joined output
//! names, so equality of usage patterns is tested by string equality and
//! is independent of the order reports arrived in. Index assignment walks
//! the snapshot's deterministic sorted-path scan and hands out
//! `next_index++` the first time a signature is seen, so the whole pass is
//! O(total reported associations) with an amortized O(1) map lookup per
//! icon.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::registry::{IconRecord, UsageSnapshot};

/// Delimiter joining output names inside a usage signature.
const SIGNATURE_DELIMITER: &str = "&";

/// A group of icons sharing one usage signature, rendered into one sprite.
#[derive(Debug)]
pub struct Partition {
    /// Index assigned in first-seen signature order within the pass
    pub index: usize,
    /// Icons assigned to this partition, in snapshot scan order
    pub icons: Vec<IconRecord>,
}

/// Canonical signature of an icon's referencing outputs.
///
/// Sorted and deduplicated by construction (the registry stores outputs in
/// a `BTreeSet`), so two icons used by the same outputs always produce the
/// same string no matter how usage was reported.
#[must_use]
pub fn usage_signature(outputs: &BTreeSet<String>) -> String {
    outputs
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(SIGNATURE_DELIMITER)
}

/// Maps every icon path in the snapshot to its partition index.
///
/// Indices are assigned in first-seen order of distinct signatures over the
/// snapshot's sorted-path scan: index 0 for the first distinct signature,
/// 1 for the next, and so on. Icons with an empty usage set (a
/// configuration problem upstream) are excluded with a warning.
#[must_use]
pub fn signature_indices(snapshot: &UsageSnapshot) -> HashMap<PathBuf, usize> {
    let mut by_signature: HashMap<String, usize> = HashMap::new();
    let mut indices = HashMap::with_capacity(snapshot.len());
    let mut next_index = 0;

    for record in snapshot.iter() {
        if record.outputs.is_empty() {
            warn!(
                path = %record.path.display(),
                "icon has no referencing outputs, excluding from sprites"
            );
            continue;
        }

        let signature = usage_signature(&record.outputs);
        let index = *by_signature.entry(signature).or_insert_with(|| {
            let assigned = next_index;
            next_index += 1;
            assigned
        });
        indices.insert(record.path.clone(), index);
    }

    indices
}

/// Groups the snapshot's icons into partitions.
///
/// Every icon with at least one referencing output lands in exactly one
/// partition; partitions come back ordered by index and hold their icons in
/// scan order.
#[must_use]
pub fn build_partitions(snapshot: &UsageSnapshot) -> Vec<Partition> {
    let indices = signature_indices(snapshot);
    let partition_count = indices.values().copied().max().map_or(0, |max| max + 1);

    let mut partitions: Vec<Partition> = (0..partition_count)
        .map(|index| Partition {
            index,
            icons: Vec::new(),
        })
        .collect();

    for record in snapshot.iter() {
        if let Some(&index) = indices.get(&record.path) {
            partitions[index].icons.push(record.clone());
        }
    }

    debug!(
        partitions = partitions.len(),
        icons = snapshot.len(),
        "partitioned icon usage"
    );
    partitions
}
