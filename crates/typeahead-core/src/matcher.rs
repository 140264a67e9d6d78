#![forbid(unsafe_code)]

//! The substring/prefix matcher.
//!
//! [`filter`] scans a candidate list in order, keeping the candidates whose
//! extracted text matches the query, and stops the moment the limit is
//! reached. The scan is deliberately not exhaustive-then-truncate: when the
//! candidate list exceeds the limit, the earliest candidates in list order
//! win, not the "best" matches.
//!
//! [`truncate`] is the bypass path for pre-filtered sequences (remote and
//! callback sources are assumed already filtered server-side): limit
//! enforcement without re-running the predicate.
//!
//! # Invariants
//!
//! 1. `filter(..).len() <= options.limit` for any input.
//! 2. Output order is input order.
//! 3. An empty query matches every candidate (position 0), so the first
//!    `limit` candidates are returned.

use std::borrow::Cow;

use crate::text::{CandidateText, TextError};

/// Matching policy: case folding, anchoring, and the result limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Case-insensitive matching (Unicode lowercasing of both sides).
    pub ignore_case: bool,
    /// Anchor the match to the start of the candidate text.
    pub match_start: bool,
    /// Maximum number of candidates surfaced. Must be greater than zero.
    pub limit: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            ignore_case: true,
            match_start: false,
            limit: 10,
        }
    }
}

fn fold(text: &str, ignore_case: bool) -> Cow<'_, str> {
    if ignore_case {
        Cow::Owned(text.to_lowercase())
    } else {
        Cow::Borrowed(text)
    }
}

/// Scan `candidates` in order, collecting those whose text matches `query`.
///
/// The scan terminates early once `options.limit` matches are collected.
/// With `match_start` the match position must be zero (anchored prefix);
/// otherwise any substring occurrence qualifies.
///
/// # Errors
///
/// Propagates [`TextError`] from the first candidate whose text cannot be
/// extracted, a caller configuration error rather than a silent skip.
pub fn filter<T>(
    query: &str,
    candidates: &[T],
    field: Option<&str>,
    options: &MatchOptions,
) -> Result<Vec<T>, TextError>
where
    T: CandidateText + Clone,
{
    let needle = fold(query, options.ignore_case);
    let mut matches = Vec::new();
    for candidate in candidates {
        let text = candidate.candidate_text(field)?;
        let haystack = fold(&text, options.ignore_case);
        let hit = match haystack.find(needle.as_ref()) {
            Some(0) => true,
            Some(_) => !options.match_start,
            None => false,
        };
        if hit {
            matches.push(candidate.clone());
        }
        if matches.len() >= options.limit {
            break;
        }
    }
    Ok(matches)
}

/// Bypass matching: enforce the limit on an already-filtered sequence.
#[must_use]
pub fn truncate<T>(mut items: Vec<T>, limit: usize) -> Vec<T> {
    items.truncate(limit);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FRUIT: [&str; 3] = ["Apple", "Banana", "Apricot"];

    fn opts(ignore_case: bool, match_start: bool, limit: usize) -> MatchOptions {
        MatchOptions {
            ignore_case,
            match_start,
            limit,
        }
    }

    #[test]
    fn prefix_match_ignoring_case() {
        let out = filter("ap", &FRUIT, None, &opts(true, true, 10)).unwrap();
        assert_eq!(out, vec!["Apple", "Apricot"]);
    }

    #[test]
    fn substring_match() {
        let out = filter("an", &FRUIT, None, &opts(true, false, 10)).unwrap();
        assert_eq!(out, vec!["Banana"]);
    }

    #[test]
    fn earliest_in_list_wins_under_limit() {
        // Early termination, not best-match: "Apple" is first in list order.
        let out = filter("a", &FRUIT, None, &opts(true, false, 1)).unwrap();
        assert_eq!(out, vec!["Apple"]);
    }

    #[test]
    fn case_sensitive_match() {
        let out = filter("ap", &FRUIT, None, &opts(false, true, 10)).unwrap();
        assert!(out.is_empty());
        let out = filter("Ap", &FRUIT, None, &opts(false, true, 10)).unwrap();
        assert_eq!(out, vec!["Apple", "Apricot"]);
    }

    #[test]
    fn anchored_rejects_interior_occurrence() {
        let out = filter("pp", &FRUIT, None, &opts(true, true, 10)).unwrap();
        assert!(out.is_empty());
        let out = filter("pp", &FRUIT, None, &opts(true, false, 10)).unwrap();
        assert_eq!(out, vec!["Apple"]);
    }

    #[test]
    fn empty_query_matches_everything_up_to_limit() {
        let out = filter("", &FRUIT, None, &opts(true, false, 2)).unwrap();
        assert_eq!(out, vec!["Apple", "Banana"]);
    }

    #[test]
    fn keyed_json_candidates() {
        let people = [
            json!({"name": "Ada", "id": 1}),
            json!({"name": "Grace", "id": 2}),
        ];
        let out = filter("gr", &people, Some("name"), &opts(true, true, 10)).unwrap();
        assert_eq!(out, vec![people[1].clone()]);
    }

    #[test]
    fn extraction_error_propagates() {
        let broken = [json!({"name": "Ada"}), json!({"other": 1})];
        let err = filter("a", &broken, Some("name"), &opts(true, false, 10)).unwrap_err();
        assert_eq!(
            err,
            TextError::MissingField {
                field: "name".into()
            }
        );
    }

    #[test]
    fn unicode_case_folding() {
        let words = ["Ärmel", "arm"];
        let out = filter("ärm", &words, None, &opts(true, true, 10)).unwrap();
        assert_eq!(out, vec!["Ärmel"]);
    }

    #[test]
    fn truncate_enforces_limit() {
        let out = truncate(vec![1, 2, 3, 4], 2);
        assert_eq!(out, vec![1, 2]);
        let out = truncate(vec![1], 5);
        assert_eq!(out, vec![1]);
    }
}
