//! Line differ: aligns two line sequences and tags every output line.

use similar::{ChangeTag, TextDiff};

/// Role of a single line in a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTag {
    /// Present unchanged in both inputs.
    Kept,
    /// Present only in the second input.
    Added,
    /// Present only in the first input.
    Removed,
    /// Differ-specific hint for lines that differ only by minor edits.
    /// The default differ never emits this; it exists so differ-style
    /// output (`? ` lines) stays representable.
    Ambiguous,
}

impl DiffTag {
    /// Two-character prefix used in rendered human diffs.
    pub fn prefix(&self) -> &'static str {
        match self {
            DiffTag::Kept => "  ",
            DiffTag::Added => "+ ",
            DiffTag::Removed => "- ",
            DiffTag::Ambiguous => "? ",
        }
    }
}

/// One tagged line of diff output. Ordering is significant and mirrors the
/// underlying matching algorithm's output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub tag: DiffTag,
    pub text: String,
}

impl DiffLine {
    pub fn new(tag: DiffTag, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }
}

/// Pluggable line-diff primitive. The merge and compare logic only depends
/// on this seam, so the matching algorithm can be swapped without touching
/// either.
pub trait LineDiffer {
    /// Compare two texts line by line, producing a tagged line sequence.
    fn compare(&self, old: &str, new: &str) -> Vec<DiffLine>;
}

/// Default differ backed by the `similar` crate's LCS-based line matcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarDiffer;

impl SimilarDiffer {
    pub fn new() -> Self {
        Self
    }
}

impl LineDiffer for SimilarDiffer {
    fn compare(&self, old: &str, new: &str) -> Vec<DiffLine> {
        let diff = TextDiff::from_lines(old, new);

        let mut lines = Vec::new();
        for change in diff.iter_all_changes() {
            let tag = match change.tag() {
                ChangeTag::Equal => DiffTag::Kept,
                ChangeTag::Insert => DiffTag::Added,
                ChangeTag::Delete => DiffTag::Removed,
            };

            let mut value = change.value();
            if let Some(stripped) = value.strip_suffix('\n') {
                value = stripped;
            }

            lines.push(DiffLine::new(tag, value));
        }

        lines
    }
}

/// Render a tagged line sequence as a prefixed human diff, lines joined
/// with `\n` and no extra framing.
pub fn render(lines: &[DiffLine]) -> String {
    lines
        .iter()
        .map(|line| format!("{}{}", line.tag.prefix(), line.text))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(lines: &[DiffLine]) -> Vec<DiffTag> {
        lines.iter().map(|l| l.tag).collect()
    }

    #[test]
    fn test_identical_inputs_all_kept() {
        let differ = SimilarDiffer::new();
        let lines = differ.compare("a\nb\nc", "a\nb\nc");
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.tag == DiffTag::Kept));
    }

    #[test]
    fn test_empty_against_text_all_added() {
        let differ = SimilarDiffer::new();
        let lines = differ.compare("", "a\nb");
        assert!(!lines.is_empty());
        assert!(lines.iter().all(|l| l.tag == DiffTag::Added));
    }

    #[test]
    fn test_text_against_empty_all_removed() {
        let differ = SimilarDiffer::new();
        let lines = differ.compare("a\nb", "");
        assert!(!lines.is_empty());
        assert!(lines.iter().all(|l| l.tag == DiffTag::Removed));
    }

    #[test]
    fn test_trailing_addition() {
        let differ = SimilarDiffer::new();
        let lines = differ.compare("a\nb\nc\n", "a\nb\nc\nd\n");
        assert_eq!(
            tags(&lines),
            vec![DiffTag::Kept, DiffTag::Kept, DiffTag::Kept, DiffTag::Added]
        );
        assert_eq!(lines[3].text, "d");
    }

    #[test]
    fn test_changed_line_is_removed_then_added() {
        let differ = SimilarDiffer::new();
        let lines = differ.compare("Hello", "Hello World");
        assert_eq!(tags(&lines), vec![DiffTag::Removed, DiffTag::Added]);
        assert_eq!(lines[0].text, "Hello");
        assert_eq!(lines[1].text, "Hello World");
    }

    #[test]
    fn test_render_prefixes() {
        let differ = SimilarDiffer::new();
        let rendered = render(&differ.compare("Hello", "Hello World"));
        assert_eq!(rendered, "- Hello\n+ Hello World");
    }

    #[test]
    fn test_render_kept_prefix() {
        let differ = SimilarDiffer::new();
        let rendered = render(&differ.compare("same\n", "same\n"));
        assert_eq!(rendered, "  same");
    }

    #[test]
    fn test_removal_in_the_middle() {
        let differ = SimilarDiffer::new();
        let lines = differ.compare("a\nb\nc\n", "a\nc\n");
        assert_eq!(
            tags(&lines),
            vec![DiffTag::Kept, DiffTag::Removed, DiffTag::Kept]
        );
        assert_eq!(lines[1].text, "b");
    }

    #[test]
    fn test_ambiguous_prefix_round_trip() {
        let line = DiffLine::new(DiffTag::Ambiguous, "    ++++");
        assert_eq!(render(std::slice::from_ref(&line)), "?     ++++");
    }
}
