#![forbid(unsafe_code)]

//! Candidate sources.
//!
//! [`CandidateSource`] is a tagged variant resolved once at configuration
//! time: the engine never re-derives the source kind by presence checks,
//! and configuring two sources at once is unrepresentable through this
//! enum. [`SourceParts`] exists for callers that assemble configuration
//! from independent options and reproduces the historical precedence
//! (static over remote over callback), warning when a part is shadowed.

use std::fmt;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::transport::TransportError;
use crate::typeahead::Applier;

/// A remote lookup source: a URL template plus the payload decoder
/// captured at construction.
pub struct RemoteSource<T> {
    url_template: String,
    decoder: Rc<dyn Fn(Value) -> Result<Vec<T>, TransportError>>,
}

impl<T: DeserializeOwned> RemoteSource<T> {
    /// Create a remote source.
    ///
    /// `url_template` either carries a `{query}` placeholder or is used as
    /// a prefix the encoded query is appended to.
    #[must_use]
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            decoder: Rc::new(|value| {
                serde_json::from_value(value).map_err(|err| TransportError::Decode {
                    reason: err.to_string(),
                })
            }),
        }
    }
}

impl<T> RemoteSource<T> {
    /// The configured URL template.
    #[must_use]
    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    pub(crate) fn decode(&self, value: Value) -> Result<Vec<T>, TransportError> {
        (self.decoder)(value)
    }
}

impl<T> Clone for RemoteSource<T> {
    fn clone(&self) -> Self {
        Self {
            url_template: self.url_template.clone(),
            decoder: Rc::clone(&self.decoder),
        }
    }
}

impl<T> fmt::Debug for RemoteSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSource")
            .field("url_template", &self.url_template)
            .finish_non_exhaustive()
    }
}

/// A caller-supplied asynchronous source.
///
/// The function receives the query and a one-shot [`Applier`]; invoking
/// the applier delivers the (pre-filtered) candidates through the same
/// bypass-matching and relevance-guard path as a remote response.
pub struct CallbackSource<T> {
    fetch: Rc<dyn Fn(&str, Applier<T>)>,
}

impl<T> CallbackSource<T> {
    /// Wrap a fetch function.
    #[must_use]
    pub fn new(fetch: impl Fn(&str, Applier<T>) + 'static) -> Self {
        Self {
            fetch: Rc::new(fetch),
        }
    }

    pub(crate) fn invoke(&self, query: &str, applier: Applier<T>) {
        (self.fetch)(query, applier);
    }
}

impl<T> Clone for CallbackSource<T> {
    fn clone(&self) -> Self {
        Self {
            fetch: Rc::clone(&self.fetch),
        }
    }
}

impl<T> fmt::Debug for CallbackSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSource").finish_non_exhaustive()
    }
}

/// Where candidates come from. Exactly one source is active per engine.
#[derive(Clone)]
pub enum CandidateSource<T> {
    /// A fixed in-memory list, matched synchronously.
    Static(Vec<T>),
    /// A remote lookup, debounced and fetched through the transport.
    Remote(RemoteSource<T>),
    /// A caller-supplied async function, debounced like a remote lookup.
    Callback(CallbackSource<T>),
}

impl<T> fmt::Debug for CandidateSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(items) => f
                .debug_struct("Static")
                .field("candidates", &items.len())
                .finish(),
            Self::Remote(remote) => remote.fmt(f),
            Self::Callback(cb) => cb.fmt(f),
        }
    }
}

/// Piecemeal source assembly with the historical precedence.
///
/// When more than one part is present, static data wins over a remote
/// source, which wins over a callback; shadowed parts are dropped with a
/// warning. Prefer constructing [`CandidateSource`] directly; the enum
/// cannot express the ambiguity in the first place.
#[derive(Debug)]
pub struct SourceParts<T> {
    /// Static candidate list.
    pub static_data: Option<Vec<T>>,
    /// Remote lookup source.
    pub remote: Option<RemoteSource<T>>,
    /// Callback source.
    pub callback: Option<CallbackSource<T>>,
}

impl<T> Default for SourceParts<T> {
    fn default() -> Self {
        Self {
            static_data: None,
            remote: None,
            callback: None,
        }
    }
}

impl<T> SourceParts<T> {
    /// Resolve to at most one source, applying the precedence.
    pub fn resolve(self) -> Option<CandidateSource<T>> {
        let shadowed = |winner: &str| {
            warn!(target: "typeahead", winner, "multiple candidate sources configured; applying precedence");
        };
        if let Some(data) = self.static_data {
            if self.remote.is_some() || self.callback.is_some() {
                shadowed("static");
            }
            return Some(CandidateSource::Static(data));
        }
        if let Some(remote) = self.remote {
            if self.callback.is_some() {
                shadowed("remote");
            }
            return Some(CandidateSource::Remote(remote));
        }
        self.callback.map(CandidateSource::Callback)
    }
}
