//! Shared view helpers: fuzzy match highlighting and amount formatting.

use crate::domain::Money;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Character ranges of `text` matched by `term`, merged into contiguous runs.
///
/// Matching is case-insensitive. Each range is `(start, end)` in character
/// indices with an exclusive end. No match yields an empty vector.
///
/// ```
/// use storefront_core::ui::helpers::highlight_ranges;
///
/// assert_eq!(highlight_ranges("Silk Dress", "dress"), vec![(5, 10)]);
/// ```
#[must_use]
pub fn highlight_ranges(text: &str, term: &str) -> Vec<(usize, usize)> {
    let term = term.trim();
    if term.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    let Some((_score, indices)) = matcher.fuzzy_indices(text, term) else {
        return Vec::new();
    };

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end += 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }
    ranges
}

/// Wraps each highlighted range of `text` in `open`/`close` markers.
#[must_use]
pub fn apply_highlights(text: &str, ranges: &[(usize, usize)], open: &str, close: &str) -> String {
    if ranges.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + ranges.len() * (open.len() + close.len()));
    let mut ranges = ranges.iter().peekable();

    for (idx, ch) in text.chars().enumerate() {
        if ranges.peek().is_some_and(|(start, _)| *start == idx) {
            out.push_str(open);
        }
        out.push(ch);
        if ranges.peek().is_some_and(|(_, end)| *end == idx + 1) {
            out.push_str(close);
            ranges.next();
        }
    }
    out
}

/// `240.00 SAR`.
#[must_use]
pub fn format_amount(amount: Money, currency: &str) -> String {
    format!("{amount} {currency}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scattered_matches_become_separate_ranges() {
        let ranges = highlight_ranges("Gold Cuff", "gc");
        assert_eq!(ranges, vec![(0, 1), (5, 6)]);
        assert_eq!(apply_highlights("Gold Cuff", &ranges, "[", "]"), "[G]old [C]uff");
    }

    #[test]
    fn no_match_or_blank_term_highlights_nothing() {
        assert!(highlight_ranges("Gold Cuff", "zz").is_empty());
        assert!(highlight_ranges("Gold Cuff", "  ").is_empty());
        assert_eq!(apply_highlights("Gold", &[], "[", "]"), "Gold");
    }

    #[test]
    fn formats_amount_with_currency() {
        assert_eq!(format_amount(Money::from_minor(24_050), "SAR"), "240.50 SAR");
    }
}
