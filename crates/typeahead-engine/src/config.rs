#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! [`TypeaheadConfig`] carries every recognized option with its default.
//! Fields are public for struct-literal construction; `with_*` builders
//! are provided for the common chained style.

use std::time::Duration;

use typeahead_core::MatchOptions;

/// Relevance policy for asynchronous results arriving out of order.
///
/// The input-focus check applies under both policies; this only decides
/// whether a result is additionally matched against the request generation
/// that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Discard results whose request generation is no longer the newest
    /// dispatched one. Fixes the fast-typing/slow-network overwrite.
    #[default]
    Generation,
    /// Historical behavior: focus is the only gate, so a slow response for
    /// an older query can overwrite a newer, more specific result.
    FocusOnly,
}

/// Configuration for a [`Typeahead`](crate::Typeahead) instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeaheadConfig {
    /// Field name extracting comparable text from structured candidates.
    pub item_key: Option<String>,
    /// Case-insensitive matching.
    pub ignore_case: bool,
    /// Anchor matches to the start of the candidate text.
    pub match_start: bool,
    /// Maximum candidates surfaced. Values of zero are clamped to one.
    pub limit: usize,
    /// Delay before issuing asynchronous lookups.
    pub debounce: Duration,
    /// Trigger a zero-delay fetch when the input gains focus.
    pub open_on_focus: bool,
    /// Allow suggestions to open for an empty query.
    pub open_on_empty: bool,
    /// Auto-activate the first result.
    pub preselect: bool,
    /// Do not propagate raw typed text as the bound value until a
    /// candidate is explicitly selected.
    pub force_select: bool,
    /// Clear the input's displayed text on blur when no valid value was
    /// ultimately selected.
    pub force_clear: bool,
    /// Field name extracting the item array from a remote JSON payload.
    pub response_key: Option<String>,
    /// An "empty" view is available, so the menu may open with zero items.
    pub empty_presentation: bool,
    /// Relevance guard for asynchronous results.
    pub stale_policy: StalePolicy,
}

impl Default for TypeaheadConfig {
    fn default() -> Self {
        Self {
            item_key: None,
            ignore_case: true,
            match_start: false,
            limit: 10,
            debounce: Duration::from_millis(200),
            open_on_focus: true,
            open_on_empty: false,
            preselect: true,
            force_select: false,
            force_clear: false,
            response_key: None,
            empty_presentation: false,
            stale_policy: StalePolicy::default(),
        }
    }
}

impl TypeaheadConfig {
    /// Create a configuration with the documented defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the item key for structured candidates.
    #[must_use]
    pub fn with_item_key(mut self, key: impl Into<String>) -> Self {
        self.item_key = Some(key.into());
        self
    }

    /// Set case sensitivity.
    #[must_use]
    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// Set match anchoring.
    #[must_use]
    pub fn with_match_start(mut self, match_start: bool) -> Self {
        self.match_start = match_start;
        self
    }

    /// Set the result limit.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the debounce delay.
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set whether gaining focus triggers a zero-delay fetch.
    #[must_use]
    pub fn with_open_on_focus(mut self, open_on_focus: bool) -> Self {
        self.open_on_focus = open_on_focus;
        self
    }

    /// Set whether an empty query may open suggestions.
    #[must_use]
    pub fn with_open_on_empty(mut self, open_on_empty: bool) -> Self {
        self.open_on_empty = open_on_empty;
        self
    }

    /// Set first-result preselection.
    #[must_use]
    pub fn with_preselect(mut self, preselect: bool) -> Self {
        self.preselect = preselect;
        self
    }

    /// Set force-select behavior.
    #[must_use]
    pub fn with_force_select(mut self, force_select: bool) -> Self {
        self.force_select = force_select;
        self
    }

    /// Set force-clear behavior.
    #[must_use]
    pub fn with_force_clear(mut self, force_clear: bool) -> Self {
        self.force_clear = force_clear;
        self
    }

    /// Set the response key for remote payload extraction.
    #[must_use]
    pub fn with_response_key(mut self, key: impl Into<String>) -> Self {
        self.response_key = Some(key.into());
        self
    }

    /// Declare that an empty presentation is available.
    #[must_use]
    pub fn with_empty_presentation(mut self, available: bool) -> Self {
        self.empty_presentation = available;
        self
    }

    /// Set the staleness policy for async results.
    #[must_use]
    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    /// Matcher options derived from this configuration.
    ///
    /// The limit is clamped to at least one, so a misconfigured zero never
    /// produces an engine that can surface nothing.
    #[must_use]
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            ignore_case: self.ignore_case,
            match_start: self.match_start,
            limit: self.limit.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let config = TypeaheadConfig::default();
        assert!(config.ignore_case);
        assert!(!config.match_start);
        assert_eq!(config.limit, 10);
        assert_eq!(config.debounce, Duration::from_millis(200));
        assert!(config.open_on_focus);
        assert!(!config.open_on_empty);
        assert!(config.preselect);
        assert!(!config.force_select);
        assert!(!config.force_clear);
        assert_eq!(config.stale_policy, StalePolicy::Generation);
    }

    #[test]
    fn builder_chain() {
        let config = TypeaheadConfig::new()
            .with_item_key("name")
            .with_match_start(true)
            .with_limit(5)
            .with_debounce(Duration::from_millis(50))
            .with_stale_policy(StalePolicy::FocusOnly);
        assert_eq!(config.item_key.as_deref(), Some("name"));
        assert!(config.match_start);
        assert_eq!(config.limit, 5);
        assert_eq!(config.debounce, Duration::from_millis(50));
        assert_eq!(config.stale_policy, StalePolicy::FocusOnly);
    }

    #[test]
    fn zero_limit_is_clamped() {
        let config = TypeaheadConfig::new().with_limit(0);
        assert_eq!(config.match_options().limit, 1);
    }
}
