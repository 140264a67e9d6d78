#![forbid(unsafe_code)]

//! Matching primitives for the typeahead suggestion engine.
//!
//! This crate is the pure leaf of the workspace: candidate text extraction,
//! the substring/prefix matcher, and the highlight formatter. It performs no
//! I/O and reads no clocks, so every function here is deterministic and
//! directly testable. The stateful pieces (debounced fetching, keyboard
//! navigation, signals) live in `typeahead-engine`.

pub mod highlight;
pub mod key;
pub mod matcher;
pub mod text;

pub use highlight::{HighlightMarkers, highlight};
pub use key::Key;
pub use matcher::{MatchOptions, filter, truncate};
pub use text::{CandidateText, TextError};
