//! Line diffing and merging.
//!
//! Two pieces: a line differ that tags each output line as kept, added,
//! removed, or ambiguous, and an additive three-way merger built on top of
//! two independent diffs against a common base.

pub mod differ;
pub mod input;
pub mod merge;

pub use differ::{render, DiffLine, DiffTag, LineDiffer, SimilarDiffer};
pub use input::TextInput;
pub use merge::{merge, merge_to_file};
