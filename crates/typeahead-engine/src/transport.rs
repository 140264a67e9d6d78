#![forbid(unsafe_code)]

//! The request seam for remote lookups.
//!
//! The engine never speaks HTTP itself; it hands a fully-built URL and a
//! one-shot completion to a [`Transport`]. A synchronous implementation may
//! invoke the completion before `request` returns; an event-loop-driven one
//! may hold it and invoke it later. Either way the completion runs on the
//! engine's (single) thread.

use serde_json::Value;
use thiserror::Error;

/// Failures surfaced from a remote lookup.
///
/// Stored as plain data (not source errors) so signals carrying them stay
/// cloneable and comparable in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request could not be issued or completed.
    #[error("request to {url} failed: {reason}")]
    Request {
        /// Request URL.
        url: String,
        /// Human-readable failure description.
        reason: String,
    },
    /// The server answered with a non-success status.
    #[error("request to {url} returned status {status}")]
    Status {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// The response payload could not be decoded into candidates.
    #[error("response payload could not be decoded: {reason}")]
    Decode {
        /// Human-readable decode failure.
        reason: String,
    },
}

/// One-shot completion for a [`Transport::request`] call.
pub type TransportDone = Box<dyn FnOnce(Result<Value, TransportError>)>;

/// Issues remote lookup requests.
pub trait Transport {
    /// Fetch `url` and invoke `done` exactly once with the JSON payload or
    /// the failure.
    fn request(&self, url: &str, done: TransportDone);
}
