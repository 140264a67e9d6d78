#![forbid(unsafe_code)]

//! Highlight formatter: wrap matched query substrings in display text.
//!
//! A thin transform over the matcher's predicate. In substring mode every
//! non-overlapping occurrence is wrapped; in anchored (`match_start`) mode
//! only the first occurrence is. The wrapped slice always preserves the
//! candidate's original casing; only the search is case-folded.

use crate::matcher::MatchOptions;

/// Marker pair wrapped around each matched slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightMarkers {
    /// Text inserted before a matched slice.
    pub open: String,
    /// Text inserted after a matched slice.
    pub close: String,
}

impl Default for HighlightMarkers {
    fn default() -> Self {
        Self {
            open: "<b>".to_string(),
            close: "</b>".to_string(),
        }
    }
}

impl HighlightMarkers {
    /// Create a marker pair.
    #[must_use]
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

/// Wrap occurrences of `query` within `text`.
///
/// An empty query returns `text` unchanged. Only `ignore_case` and
/// `match_start` are consulted from `options`; the limit does not apply
/// here.
#[must_use]
pub fn highlight(
    text: &str,
    query: &str,
    options: &MatchOptions,
    markers: &HighlightMarkers,
) -> String {
    if query.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + markers.open.len() + markers.close.len());
    let mut pos = 0;
    while pos < text.len() {
        let Some((offset, len)) = next_match(&text[pos..], query, options.ignore_case) else {
            break;
        };
        let start = pos + offset;
        let end = start + len;
        out.push_str(&text[pos..start]);
        out.push_str(&markers.open);
        out.push_str(&text[start..end]);
        out.push_str(&markers.close);
        pos = end;
        if options.match_start {
            break;
        }
    }
    out.push_str(&text[pos..]);
    out
}

/// Locate the next occurrence of `query` in `tail`, returning its byte
/// offset and the byte length of the matched slice in the original text.
fn next_match(tail: &str, query: &str, ignore_case: bool) -> Option<(usize, usize)> {
    if !ignore_case {
        return tail.find(query).map(|i| (i, query.len()));
    }
    tail.char_indices()
        .find_map(|(offset, _)| match_len_at(&tail[offset..], query).map(|len| (offset, len)))
}

/// Case-folded prefix match of `query` against `tail`.
///
/// Both sides are compared as flattened lowercase character streams, so a
/// single source character may satisfy several query characters (and vice
/// versa). The query must end on a source-character boundary; a match that
/// would split a character is rejected.
fn match_len_at(tail: &str, query: &str) -> Option<usize> {
    let mut want = query.chars().flat_map(char::to_lowercase).peekable();
    let mut len = 0;
    for ch in tail.chars() {
        if want.peek().is_none() {
            break;
        }
        for low in ch.to_lowercase() {
            match want.next() {
                Some(w) if w == low => {}
                _ => return None,
            }
        }
        len += ch.len_utf8();
    }
    if want.peek().is_none() { Some(len) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(ignore_case: bool, match_start: bool) -> MatchOptions {
        MatchOptions {
            ignore_case,
            match_start,
            limit: 10,
        }
    }

    #[test]
    fn wraps_single_occurrence() {
        let out = highlight("Banana", "ban", &opts(true, false), &HighlightMarkers::default());
        assert_eq!(out, "<b>Ban</b>ana");
    }

    #[test]
    fn wraps_every_occurrence_in_substring_mode() {
        let out = highlight("Banana", "an", &opts(true, false), &HighlightMarkers::default());
        assert_eq!(out, "B<b>an</b><b>an</b>a");
    }

    #[test]
    fn wraps_first_occurrence_only_when_anchored() {
        let out = highlight("Banana", "an", &opts(true, true), &HighlightMarkers::default());
        assert_eq!(out, "B<b>an</b>ana");
    }

    #[test]
    fn preserves_original_casing() {
        let out = highlight("APPLE", "app", &opts(true, false), &HighlightMarkers::default());
        assert_eq!(out, "<b>APP</b>LE");
    }

    #[test]
    fn case_sensitive_mode_respects_case() {
        let out = highlight("Apple", "app", &opts(false, false), &HighlightMarkers::default());
        assert_eq!(out, "Apple");
        let out = highlight("Apple", "App", &opts(false, false), &HighlightMarkers::default());
        assert_eq!(out, "<b>App</b>le");
    }

    #[test]
    fn empty_query_is_identity() {
        let out = highlight("Apple", "", &opts(true, false), &HighlightMarkers::default());
        assert_eq!(out, "Apple");
    }

    #[test]
    fn no_occurrence_is_identity() {
        let out = highlight("Apple", "zzz", &opts(true, false), &HighlightMarkers::default());
        assert_eq!(out, "Apple");
    }

    #[test]
    fn custom_markers() {
        let markers = HighlightMarkers::new("[", "]");
        let out = highlight("Apricot", "apr", &opts(true, false), &markers);
        assert_eq!(out, "[Apr]icot");
    }

    #[test]
    fn unicode_fold_keeps_boundaries() {
        let out = highlight("Ärmel", "ärm", &opts(true, false), &HighlightMarkers::default());
        assert_eq!(out, "<b>Ärm</b>el");
    }
}
