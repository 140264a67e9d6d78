#![forbid(unsafe_code)]

//! The typeahead suggestion engine.
//!
//! This crate owns the stateful half of the widget: configuration, the
//! tagged candidate source, the debounced fetch orchestrator, the keyboard
//! navigation state machine, and the signal hub with RAII subscriptions.
//! Rendering, the concrete input element, and the HTTP primitive stay
//! outside, behind the [`InputPort`], [`MenuPort`], and [`Transport`]
//! seams.
//!
//! # Execution model
//!
//! Single-threaded and cooperative. The engine never blocks and never owns
//! a thread: the host forwards input notifications
//! ([`Typeahead::input_changed`], [`Typeahead::focus_gained`],
//! [`Typeahead::focus_lost`], [`Typeahead::handle_key`]) and drives the
//! debounce clock by calling [`Typeahead::poll`] with the current instant.
//! Async completions re-enter through one-shot handles that hold weak
//! references, so a dropped engine turns late results into no-ops.

pub mod config;
pub mod nav;
pub mod signal;
pub mod source;
pub mod transport;
pub mod typeahead;
pub mod url;

pub use config::{StalePolicy, TypeaheadConfig};
pub use nav::KeyOutcome;
pub use signal::{BoundValue, SignalHub, Subscription, TypeaheadSignal};
pub use source::{CallbackSource, CandidateSource, RemoteSource, SourceParts};
pub use transport::{Transport, TransportDone, TransportError};
pub use typeahead::{Applier, InputPort, MenuPort, MenuView, Typeahead};

pub use typeahead_core::{CandidateText, Key, MatchOptions, TextError};
