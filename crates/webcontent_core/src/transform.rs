//! Pure transforms over fetched content.

use unicode_segmentation::UnicodeSegmentation;

/// Stride used by the every-Nth extraction unless configured otherwise.
pub const DEFAULT_NTH: usize = 10;

/// Splits content on whitespace (spaces, tabs, newlines). Runs of whitespace
/// count as one boundary, and leading or trailing whitespace produces no
/// empty token.
pub fn word_counter(content: &str) -> Vec<String> {
    content.split_whitespace().map(ToOwned::to_owned).collect()
}

/// Selects every user-perceived character (extended grapheme cluster) whose
/// zero-based index is a positive multiple of `n`. Index 0 is skipped.
///
/// A base letter plus combining marks, a flag, or a ZWJ emoji sequence each
/// count as one position and are returned as one `String`.
pub fn every_nth_character(content: &str, n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    content
        .graphemes(true)
        .enumerate()
        .filter(|(index, _)| *index >= n && index % n == 0)
        .map(|(_, cluster)| cluster.to_string())
        .collect()
}

/// Joins selected characters with single spaces, e.g. `["s", "r"]` -> `"s r"`.
pub fn format_every_nth(chars: &[String]) -> String {
    chars.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "<p> Compass Hello World </p>";

    fn clusters(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn word_counter_counts_sample_tokens() {
        assert_eq!(
            word_counter(SAMPLE),
            vec!["<p>", "Compass", "Hello", "World", "</p>"]
        );
    }

    #[test]
    fn word_counter_collapses_whitespace_runs() {
        assert_eq!(word_counter("  a \n\n\tb  "), vec!["a", "b"]);
        assert!(word_counter(" \n ").is_empty());
    }

    #[test]
    fn word_counter_drops_edge_whitespace() {
        // A trailing newline is a boundary, not an empty final token.
        assert_eq!(word_counter("<p> a\n"), vec!["<p>", "a"]);
        assert_eq!(word_counter("\n<p> a").len(), 2);
    }

    #[test]
    fn every_nth_skips_index_zero() {
        assert_eq!(every_nth_character(SAMPLE, 10), clusters(&["s", "r"]));
    }

    #[test]
    fn every_nth_indexes_by_char_not_byte() {
        let content = format!("{}x{}y", "é".repeat(10), "é".repeat(9));
        assert_eq!(every_nth_character(&content, 10), clusters(&["x", "y"]));
    }

    #[test]
    fn combining_marks_count_as_one_character() {
        let content = format!("{}abcdefghijklmnopqrstu", "e\u{301}".repeat(10));
        assert_eq!(every_nth_character(&content, 10), clusters(&["a", "k", "u"]));
    }

    #[test]
    fn selected_cluster_keeps_its_combining_mark() {
        let content = format!("0123456789{}", "e\u{301}");
        assert_eq!(every_nth_character(&content, 10), clusters(&["e\u{301}"]));
    }

    #[test]
    fn every_nth_starts_fresh_each_call() {
        let first = every_nth_character(SAMPLE, 10);
        let second = every_nth_character(SAMPLE, 10);
        assert_eq!(first, second);
    }

    #[test]
    fn every_nth_with_zero_stride_selects_nothing() {
        assert!(every_nth_character(SAMPLE, 0).is_empty());
    }

    #[test]
    fn short_content_yields_nothing() {
        assert!(every_nth_character("short", 10).is_empty());
    }

    #[test]
    fn format_joins_with_spaces() {
        assert_eq!(format_every_nth(&clusters(&["s", "r"])), "s r");
        assert_eq!(format_every_nth(&[]), "");
    }
}
