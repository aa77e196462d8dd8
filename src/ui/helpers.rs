//! Shared rendering utilities.
//!
//! Text measurements here are in chars, not bytes, so multi-byte titles can
//! be truncated and highlighted without splitting a code point.

use crate::ui::theme::Theme;

pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Shortens `text` to at most `max_chars` chars, ending in `...` when cut.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }
    if max_chars <= 3 {
        return text.chars().take(max_chars).collect();
    }
    let mut cut: String = text.chars().take(max_chars - 3).collect();
    cut.push_str("...");
    cut
}

/// Non-overlapping case-insensitive occurrences of `query` in `text`.
///
/// Returns `(start, end)` char ranges with exclusive ends. Surrounding
/// whitespace of `query` is ignored; an empty query matches nothing.
#[must_use]
pub fn match_ranges(text: &str, query: &str) -> Vec<(usize, usize)> {
    let needle: Vec<char> = query.trim().to_lowercase().chars().collect();
    if needle.is_empty() {
        return vec![];
    }

    let haystack: Vec<char> = text.chars().collect();
    let matches_at = |start: usize| {
        needle.iter().enumerate().all(|(offset, wanted)| {
            haystack
                .get(start + offset)
                .is_some_and(|c| c.to_lowercase().eq(std::iter::once(*wanted)))
        })
    };

    let mut ranges = Vec::new();
    let mut start = 0;
    while start + needle.len() <= haystack.len() {
        if matches_at(start) {
            ranges.push((start, start + needle.len()));
            start += needle.len();
        } else {
            start += 1;
        }
    }
    ranges
}

/// Prints `text`, drawing `ranges` with the match highlight colors and the
/// rest with `base_fg`.
pub fn render_highlighted_text(text: &str, ranges: &[(usize, usize)], theme: &Theme, base_fg: &str) {
    if ranges.is_empty() {
        print!("{text}");
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start < current_pos || start >= end {
            continue;
        }

        let normal_section: String = chars[current_pos..start].iter().collect();
        print!("{normal_section}");

        print!("{}", Theme::fg(&theme.colors.match_highlight_fg));
        print!("{}", Theme::bg(&theme.colors.match_highlight_bg));
        let highlighted_section: String = chars[start..end].iter().collect();
        print!("{highlighted_section}");
        print!("{}", Theme::reset());
        print!("{}", Theme::fg(base_fg));

        current_pos = end;
    }

    if current_pos < chars.len() {
        let remaining: String = chars[current_pos..].iter().collect();
        print!("{remaining}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_all_case_insensitive_matches() {
        assert_eq!(match_ranges("Rust and rust", "RUST"), vec![(0, 4), (9, 13)]);
        assert_eq!(match_ranges("aaaa", "aa"), vec![(0, 2), (2, 4)]);
        assert!(match_ranges("anything", "  ").is_empty());
        assert!(match_ranges("short", "much longer").is_empty());
    }

    #[test]
    fn ranges_count_chars_not_bytes() {
        assert_eq!(match_ranges("héllo wörld", "wö"), vec![(6, 8)]);
    }

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééééé", 6), "ééé...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }
}
