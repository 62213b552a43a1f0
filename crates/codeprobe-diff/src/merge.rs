//! Additive three-way merge.

use std::path::Path;

use tracing::debug;

use codeprobe_core::Result;

use crate::differ::{DiffTag, LineDiffer};

/// Merge two derived texts against a common base.
///
/// Computes independent diffs of (base, text1) and (base, text2), then
/// concatenates the kept-or-added lines of the first diff with the added
/// lines of the second. This is an additive union: when both sides modify
/// the same base region, both modifications appear back to back, with
/// text2's unique additions appended after all of text1's content. No
/// conflicts are detected or flagged; duplicates are not removed. That
/// behavior is the contract, not a bug.
pub fn merge<D: LineDiffer>(differ: &D, base: &str, text1: &str, text2: &str) -> String {
    let diff1 = differ.compare(base, text1);
    let diff2 = differ.compare(base, text2);

    let mut merged: Vec<String> = Vec::new();
    for line in diff1 {
        if matches!(line.tag, DiffTag::Kept | DiffTag::Added) {
            merged.push(line.text);
        }
    }
    for line in diff2 {
        if line.tag == DiffTag::Added {
            merged.push(line.text);
        }
    }

    debug!(lines = merged.len(), "merged");
    merged.join("\n")
}

/// Merge and write the result to `output`.
pub fn merge_to_file<D: LineDiffer>(
    differ: &D,
    base: &str,
    text1: &str,
    text2: &str,
    output: &Path,
) -> Result<()> {
    let merged = merge(differ, base, text1, text2);
    std::fs::write(output, merged)?;
    Ok(())
}
