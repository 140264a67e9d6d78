#![forbid(unsafe_code)]

//! Request URL construction for remote lookups.
//!
//! The query is percent-encoded with the RFC 3986 unreserved set and
//! substituted for the `{query}` placeholder in the configured template;
//! templates without a placeholder get the encoded query appended, which
//! keeps the common `"https://host/suggest?q="` prefix style working.

use std::fmt::Write as _;

/// Placeholder replaced by the encoded query in a URL template.
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Build the lookup URL for `query` from `template`.
#[must_use]
pub fn build_request_url(template: &str, query: &str) -> String {
    let encoded = percent_encode_component(query);
    if template.contains(QUERY_PLACEHOLDER) {
        template.replace(QUERY_PLACEHOLDER, &encoded)
    } else {
        let mut url = String::with_capacity(template.len() + encoded.len());
        url.push_str(template);
        url.push_str(&encoded);
        url
    }
}

fn percent_encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.as_bytes() {
        match *b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(*b as char);
            }
            other => {
                let _ = write!(out, "%{other:02X}");
            }
        }
    }
    out
}
