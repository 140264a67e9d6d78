#![forbid(unsafe_code)]

//! The typeahead engine: shared state, fetch orchestration, navigation.
//!
//! [`Typeahead`] owns the `{items, active_index, open}` triple, the
//! single-slot debounce deadline, and the request generation counter. The
//! host forwards input notifications and drives the clock through
//! [`Typeahead::poll`]; the dropdown collaborator reads [`Typeahead::view`]
//! and commits clicks through [`Typeahead::select`].
//!
//! # Invariants
//!
//! 1. At most one pending debounce deadline exists at any time; every
//!    query change replaces it (cancel-then-set).
//! 2. The result set and active index are replaced wholesale per fetch
//!    completion, never patched incrementally.
//! 3. Async results are applied only if still relevant at arrival time:
//!    the input must be focused, and under
//!    [`StalePolicy::Generation`](crate::StalePolicy) the result's request
//!    generation must still be the newest dispatched one.
//! 4. `RefCell` borrows are never held across a port, transport, or
//!    subscriber call, so collaborators may re-enter the engine freely.
//!
//! # Failure Modes
//!
//! - Transport or payload-decode failure: suggestion list left unchanged,
//!   `LoadedError` emitted, failure logged. No retry.
//! - Candidate text extraction failure (static matching, value sync):
//!   propagated as [`TextError`], a caller configuration error.
//! - Late result for a dropped engine: silent no-op (weak handle).

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};
use web_time::Instant;

use typeahead_core::matcher;
use typeahead_core::text::{CandidateText, TextError};
use typeahead_core::Key;

use crate::config::{StalePolicy, TypeaheadConfig};
use crate::nav::{self, KeyOutcome, NavAction};
use crate::signal::{BoundValue, SignalHub, Subscription, TypeaheadSignal};
use crate::source::{CallbackSource, CandidateSource};
use crate::transport::{Transport, TransportError};
use crate::url::build_request_url;

/// The bound input control, as seen by the engine.
///
/// Focus is polled at decision points (async result arrival, blur), never
/// observed continuously. `set_text` is only written for value sync and
/// force-clear; the engine otherwise does not own the input's text.
pub trait InputPort {
    /// Whether the input currently holds focus.
    fn is_focused(&self) -> bool;
    /// Replace the input's displayed text.
    fn set_text(&self, text: &str);
}

/// The dropdown/menu collaborator, as seen by the engine.
pub trait MenuPort {
    /// Whether the pointer is currently over the menu. Blur does not close
    /// the suggestion list while this holds.
    fn is_hovered(&self) -> bool;
}

/// Snapshot of the shared state consumed by the dropdown collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView<T> {
    /// Current result set, in source order, at most `limit` long.
    pub items: Vec<T>,
    /// Active (keyboard-highlighted) index, `-1` for none.
    pub active_index: isize,
    /// Whether the suggestion list is presented.
    pub open: bool,
}

struct PendingFetch {
    deadline: Instant,
    query: String,
}

struct Inner<T> {
    config: TypeaheadConfig,
    source: Option<CandidateSource<T>>,
    transport: Option<Rc<dyn Transport>>,
    input: Option<Rc<dyn InputPort>>,
    menu: Option<Rc<dyn MenuPort>>,
    signals: SignalHub<T>,
    items: Vec<T>,
    active_index: isize,
    open: bool,
    pending: Option<PendingFetch>,
    generation: u64,
    has_bound_value: bool,
}

impl<T: CandidateText + Clone> Inner<T> {
    /// Replace the result set wholesale and re-derive the active index and
    /// open flag. Applies to every fetch completion, bypass included.
    fn apply_results(&mut self, items: Vec<T>) {
        let limit = self.config.match_options().limit;
        self.items = matcher::truncate(items, limit);
        self.active_index = if self.config.preselect && !self.items.is_empty() {
            0
        } else {
            -1
        };
        self.open = self.config.empty_presentation || !self.items.is_empty();
    }

    /// Cancel the pending slot, short-circuit the empty query, then match
    /// synchronously (static) or arm the debounce deadline (async).
    fn fetch_items(&mut self, value: &str, delay: Duration, now: Instant) -> Result<(), TextError> {
        self.pending = None;
        if value.is_empty() && !self.config.open_on_empty {
            self.open = false;
            return Ok(());
        }
        match &self.source {
            Some(CandidateSource::Static(data)) => {
                let options = self.config.match_options();
                let items = matcher::filter(value, data, self.config.item_key.as_deref(), &options)?;
                self.apply_results(items);
            }
            Some(CandidateSource::Remote(_) | CandidateSource::Callback(_)) => {
                self.pending = Some(PendingFetch {
                    deadline: now + delay,
                    query: value.to_string(),
                });
            }
            None => {}
        }
        Ok(())
    }

    fn is_relevant(&self, focused: bool, generation: u64) -> bool {
        focused
            && match self.config.stale_policy {
                StalePolicy::FocusOnly => true,
                StalePolicy::Generation => generation == self.generation,
            }
    }
}

enum Dispatch<T> {
    Remote {
        url: String,
        transport: Rc<dyn Transport>,
    },
    Callback(CallbackSource<T>),
}

/// A typeahead widget engine.
///
/// Cheap to clone (shared handle); all state lives behind the handle and
/// is mutated from the single event-processing thread.
pub struct Typeahead<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Typeahead<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Typeahead<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Typeahead")
            .field("items", &inner.items.len())
            .field("active_index", &inner.active_index)
            .field("open", &inner.open)
            .field("pending", &inner.pending.is_some())
            .field("generation", &inner.generation)
            .finish_non_exhaustive()
    }
}

impl<T: CandidateText + Clone + 'static> Typeahead<T> {
    /// Create an engine with no source, ports, or transport bound yet.
    #[must_use]
    pub fn new(config: TypeaheadConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                config,
                source: None,
                transport: None,
                input: None,
                menu: None,
                signals: SignalHub::new(),
                items: Vec::new(),
                active_index: -1,
                open: false,
                pending: None,
                generation: 0,
                has_bound_value: false,
            })),
        }
    }

    /// Set the candidate source (builder style).
    #[must_use]
    pub fn with_source(self, source: CandidateSource<T>) -> Self {
        self.inner.borrow_mut().source = Some(source);
        self
    }

    /// Set the transport used by a remote source (builder style).
    #[must_use]
    pub fn with_transport(self, transport: Rc<dyn Transport>) -> Self {
        self.inner.borrow_mut().transport = Some(transport);
        self
    }

    /// Replace the candidate source at runtime.
    pub fn set_source(&self, source: Option<CandidateSource<T>>) {
        self.inner.borrow_mut().source = source;
    }

    /// Bind (or rebind) the input port. The previous binding, if any, is
    /// released. Without a bound input the engine treats the input as
    /// focused.
    pub fn bind_input(&self, port: Rc<dyn InputPort>) {
        self.inner.borrow_mut().input = Some(port);
    }

    /// Release the input binding.
    pub fn unbind_input(&self) {
        self.inner.borrow_mut().input = None;
    }

    /// Bind (or rebind) the menu port. Without a bound menu the engine
    /// treats the menu as not hovered.
    pub fn bind_menu(&self, port: Rc<dyn MenuPort>) {
        self.inner.borrow_mut().menu = Some(port);
    }

    /// Release the menu binding.
    pub fn unbind_menu(&self) {
        self.inner.borrow_mut().menu = None;
    }

    /// Subscribe to engine signals. The guard detaches on drop.
    #[must_use]
    pub fn subscribe(&self, f: impl Fn(&TypeaheadSignal<T>) + 'static) -> Subscription {
        self.inner.borrow().signals.subscribe(f)
    }

    /// The input's text changed.
    ///
    /// Re-matches (static source) or re-arms the debounce deadline (async
    /// sources), then reports the new bound value: the raw text, or
    /// [`BoundValue::Unset`] under force-select.
    ///
    /// # Errors
    ///
    /// Propagates [`TextError`] from static matching: a configuration
    /// error (wrong item key), never a silent skip.
    pub fn input_changed(&self, value: &str, now: Instant) -> Result<(), TextError> {
        let (hub, signal) = {
            let mut inner = self.inner.borrow_mut();
            let delay = inner.config.debounce;
            inner.fetch_items(value, delay, now)?;
            let bound = if inner.config.force_select {
                BoundValue::Unset
            } else {
                BoundValue::Text(value.to_string())
            };
            (inner.signals.clone(), TypeaheadSignal::ValueChanged(bound))
        };
        hub.emit(&signal);
        Ok(())
    }

    /// The input gained focus. Triggers a zero-delay fetch when
    /// `open_on_focus` is set; the deadline still fires through
    /// [`Typeahead::poll`].
    ///
    /// # Errors
    ///
    /// Propagates [`TextError`] from static matching.
    pub fn focus_gained(&self, value: &str, now: Instant) -> Result<(), TextError> {
        let mut inner = self.inner.borrow_mut();
        if inner.config.open_on_focus {
            inner.fetch_items(value, Duration::ZERO, now)?;
        }
        Ok(())
    }

    /// The input lost focus.
    ///
    /// Closes the suggestion list unless the menu is currently hovered
    /// (the pointer may be mid-click on an item), then applies
    /// force-clear: if no valid value was ultimately selected, the input's
    /// displayed text is erased through the port.
    pub fn focus_lost(&self) {
        let menu = self.inner.borrow().menu.clone();
        let hovered = menu.is_some_and(|m| m.is_hovered());
        let (input, clear) = {
            let mut inner = self.inner.borrow_mut();
            if !hovered {
                inner.open = false;
            }
            let clear = inner.config.force_clear && !inner.has_bound_value;
            (inner.input.clone(), clear)
        };
        if clear && let Some(input) = input {
            input.set_text("");
        }
    }

    /// Feed a key event through the navigation state machine.
    ///
    /// Returns the disposition the host must honor: while open, every key
    /// stops propagation; the Enter path additionally suppresses the
    /// event's default action. A committed selection is emitted as
    /// [`TypeaheadSignal::ValueChanged`] with the chosen candidate.
    pub fn handle_key(&self, key: Key) -> KeyOutcome {
        let (hub, signal, outcome) = {
            let mut inner = self.inner.borrow_mut();
            let (action, outcome) = nav::step(key, inner.open, inner.active_index, inner.items.len());
            let signal = match action {
                NavAction::Commit(index) => {
                    let item = inner.items[index].clone();
                    inner.open = false;
                    Some(TypeaheadSignal::ValueChanged(BoundValue::Candidate(item)))
                }
                NavAction::Close => {
                    inner.open = false;
                    None
                }
                NavAction::Activate(index) => {
                    inner.active_index = index as isize;
                    None
                }
                NavAction::None => None,
            };
            (inner.signals.clone(), signal, outcome)
        };
        if let Some(signal) = signal {
            hub.emit(&signal);
        }
        outcome
    }

    /// Commit the item at `index` (the menu's click path).
    ///
    /// Returns `false` when the index is out of range.
    pub fn select(&self, index: usize) -> bool {
        let (hub, signal) = {
            let mut inner = self.inner.borrow_mut();
            let Some(item) = inner.items.get(index).cloned() else {
                return false;
            };
            inner.open = false;
            (
                inner.signals.clone(),
                TypeaheadSignal::ValueChanged(BoundValue::Candidate(item)),
            )
        };
        hub.emit(&signal);
        true
    }

    /// Explicit bound-value setter, invoked by the owning caller whenever
    /// the bound value changes (including after acting on a
    /// `ValueChanged` signal).
    ///
    /// `Some(Text)` and `Some(Candidate)` write the display text through
    /// the input port and mark a value as bound; `Some(Unset)` marks it
    /// unbound without touching the text; `None` clears the text.
    ///
    /// # Errors
    ///
    /// Propagates [`TextError`] when a candidate's display text cannot be
    /// extracted with the configured item key.
    pub fn sync_value(&self, value: Option<BoundValue<T>>) -> Result<(), TextError> {
        let (input, item_key) = {
            let inner = self.inner.borrow();
            (inner.input.clone(), inner.config.item_key.clone())
        };
        let (text, bound) = match &value {
            Some(BoundValue::Text(s)) => (Some(s.clone()), true),
            Some(BoundValue::Candidate(c)) => (
                Some(c.candidate_text(item_key.as_deref())?.into_owned()),
                true,
            ),
            Some(BoundValue::Unset) => (None, false),
            None => (Some(String::new()), false),
        };
        self.inner.borrow_mut().has_bound_value = bound;
        if let (Some(text), Some(input)) = (text, input) {
            input.set_text(&text);
        }
        Ok(())
    }

    /// Fire the pending deadline if it is due, then report the next one so
    /// the host can schedule its wakeup.
    ///
    /// # Panics
    ///
    /// Panics when a remote source's deadline fires with no transport
    /// bound, a configuration error (bind a transport before polling).
    pub fn poll(&self, now: Instant) -> Option<Instant> {
        let due = {
            let mut inner = self.inner.borrow_mut();
            match &inner.pending {
                Some(pending) if now >= pending.deadline => inner.pending.take(),
                _ => None,
            }
        };
        if let Some(pending) = due {
            self.dispatch(&pending.query);
        }
        self.inner.borrow().pending.as_ref().map(|p| p.deadline)
    }

    /// The pending debounce deadline, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.inner.borrow().pending.as_ref().map(|p| p.deadline)
    }

    /// Snapshot of `{items, active_index, open}` for the dropdown.
    #[must_use]
    pub fn view(&self) -> MenuView<T> {
        let inner = self.inner.borrow();
        MenuView {
            items: inner.items.clone(),
            active_index: inner.active_index,
            open: inner.open,
        }
    }

    /// Whether the suggestion list is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.borrow().open
    }

    /// The active index, `-1` for none.
    #[must_use]
    pub fn active_index(&self) -> isize {
        self.inner.borrow().active_index
    }

    /// Dispatch the debounced lookup for `query`.
    fn dispatch(&self, query: &str) {
        let (hub, generation, dispatch) = {
            let mut inner = self.inner.borrow_mut();
            inner.generation += 1;
            let hub = inner.signals.clone();
            let dispatch = match &inner.source {
                Some(CandidateSource::Remote(remote)) => {
                    let transport = inner.transport.clone().expect(
                        "remote candidate source requires a transport; bind one before polling",
                    );
                    Some(Dispatch::Remote {
                        url: build_request_url(remote.url_template(), query),
                        transport,
                    })
                }
                Some(CandidateSource::Callback(callback)) => {
                    Some(Dispatch::Callback(callback.clone()))
                }
                // A static or absent source never arms the deadline; if the
                // source was swapped while debouncing, drop the fetch.
                _ => None,
            };
            (hub, inner.generation, dispatch)
        };
        let Some(dispatch) = dispatch else {
            debug!(target: "typeahead", "pending fetch dropped: source no longer asynchronous");
            return;
        };

        hub.emit(&TypeaheadSignal::Loading);
        match dispatch {
            Dispatch::Remote { url, transport } => {
                debug!(target: "typeahead", %url, generation, "issuing remote lookup");
                let weak = Rc::downgrade(&self.inner);
                let hub = hub.clone();
                transport.request(
                    &url,
                    Box::new(move |result| match result {
                        Ok(payload) => apply_remote_payload(&weak, generation, payload),
                        Err(err) => {
                            warn!(target: "typeahead", error = %err, "remote lookup failed");
                            hub.emit(&TypeaheadSignal::LoadedError(err));
                        }
                    }),
                );
            }
            Dispatch::Callback(callback) => {
                debug!(target: "typeahead", generation, "invoking callback lookup");
                callback.invoke(
                    query,
                    Applier {
                        inner: Rc::downgrade(&self.inner),
                        generation,
                    },
                );
            }
        }
    }
}

/// Apply a remote payload if it is still relevant.
fn apply_remote_payload<T: CandidateText + Clone>(
    weak: &Weak<RefCell<Inner<T>>>,
    generation: u64,
    payload: Value,
) {
    let Some(rc) = weak.upgrade() else {
        return;
    };
    let focused = {
        let input = rc.borrow().input.clone();
        input.is_none_or(|p| p.is_focused())
    };
    let (hub, signal) = {
        let mut inner = rc.borrow_mut();
        let hub = inner.signals.clone();
        if !inner.is_relevant(focused, generation) {
            debug!(target: "typeahead", generation, "discarding stale remote result");
            (hub, TypeaheadSignal::Loaded)
        } else {
            match decode_payload(&inner, payload) {
                Ok(items) => {
                    inner.apply_results(items);
                    (hub, TypeaheadSignal::Loaded)
                }
                Err(err) => {
                    warn!(target: "typeahead", error = %err, "remote payload rejected");
                    (hub, TypeaheadSignal::LoadedError(err))
                }
            }
        }
    };
    hub.emit(&signal);
}

/// Extract the item array (via the optional response key) and decode it.
fn decode_payload<T>(inner: &Inner<T>, payload: Value) -> Result<Vec<T>, TransportError> {
    let value = match inner.config.response_key.as_deref() {
        Some(key) => payload
            .get(key)
            .cloned()
            .ok_or_else(|| TransportError::Decode {
                reason: format!("response has no field named {key:?}"),
            })?,
        None => payload,
    };
    match &inner.source {
        Some(CandidateSource::Remote(remote)) => remote.decode(value),
        _ => Err(TransportError::Decode {
            reason: "source is no longer remote".to_string(),
        }),
    }
}

/// One-shot handle delivering a callback source's results.
///
/// Carries the request generation of the dispatch that produced it and a
/// weak engine reference: applying after the engine is gone, after focus
/// moved on, or after a newer dispatch (under the generation policy) is a
/// silent no-op apart from the `Loaded` signal.
pub struct Applier<T> {
    pub(crate) inner: Weak<RefCell<Inner<T>>>,
    pub(crate) generation: u64,
}

impl<T> std::fmt::Debug for Applier<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Applier")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl<T: CandidateText + Clone> Applier<T> {
    /// Deliver pre-filtered candidates through bypass matching.
    ///
    /// Emits `Loaded` whether or not the results were applied.
    pub fn apply(self, items: Vec<T>) {
        let Some(rc) = self.inner.upgrade() else {
            return;
        };
        let focused = {
            let input = rc.borrow().input.clone();
            input.is_none_or(|p| p.is_focused())
        };
        let hub = {
            let mut inner = rc.borrow_mut();
            if inner.is_relevant(focused, self.generation) {
                inner.apply_results(items);
            } else {
                debug!(target: "typeahead", generation = self.generation, "discarding stale callback result");
            }
            inner.signals.clone()
        };
        hub.emit(&TypeaheadSignal::Loaded);
    }
}
