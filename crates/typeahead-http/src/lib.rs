#![forbid(unsafe_code)]

//! Blocking HTTP implementation of the engine's transport seam.
//!
//! [`HttpTransport`] issues a JSON GET for each lookup and invokes the
//! completion before `request` returns. The engine treats completions as
//! arrival-time events either way, so the synchronous shape changes
//! nothing in its semantics, but it does mean a slow endpoint stalls the
//! caller's event turn. Hosts with an event loop of their own can keep
//! this transport on a worker and forward completions, or implement
//! [`Transport`] directly against their I/O layer.
//!
//! No retries and no request timeout beyond what the underlying client is
//! configured with; failures are logged and reported through the
//! completion.

use std::time::Duration;

use serde_json::Value;
use tracing::warn;
use typeahead_engine::{Transport, TransportDone, TransportError};

/// Default request timeout applied by [`HttpTransport::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking HTTP transport over a shared [`reqwest`] client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Create a transport with the default client configuration
    /// (10-second request timeout).
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Request`] when the TLS backend cannot be
    /// initialized.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|err| TransportError::Request {
                url: String::new(),
                reason: err.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Wrap an already-configured client.
    #[must_use]
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }

    fn fetch(&self, url: &str) -> Result<Value, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| TransportError::Request {
                url: url.to_string(),
                reason: err.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response
            .json::<Value>()
            .map_err(|err| TransportError::Decode {
                reason: err.to_string(),
            })
    }
}

impl Transport for HttpTransport {
    fn request(&self, url: &str, done: TransportDone) {
        let result = self.fetch(url);
        if let Err(err) = &result {
            warn!(target: "typeahead", error = %err, "lookup request failed");
        }
        done(result);
    }
}
