#![forbid(unsafe_code)]

//! Candidate text extraction.
//!
//! Candidates are opaque to the engine; the [`CandidateText`] trait is the
//! single seam through which the matcher and the highlight formatter obtain
//! a comparable string. Plain string candidates are their own text;
//! structured JSON candidates are indexed by a configured field name.
//!
//! # Invariants
//!
//! 1. Extraction is a pure read: no allocation beyond what coercion
//!    requires, no side effects.
//! 2. A candidate whose text cannot be extracted is a caller configuration
//!    error. Extraction fails fast with a [`TextError`]; candidates are
//!    never silently skipped.

use std::borrow::Cow;

use serde_json::Value;
use thiserror::Error;

/// Failure to obtain comparable text from a candidate.
///
/// These are programmer errors (wrong `item_key`, non-textual field), not
/// runtime conditions to recover from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    /// The configured field name is absent from the candidate record.
    #[error("candidate has no field named {field:?}")]
    MissingField {
        /// The field name that was looked up.
        field: String,
    },
    /// The candidate (or its extracted field) is not text-coercible.
    #[error("candidate value cannot be coerced to text")]
    NotText,
}

/// Extracts the comparable text of a candidate.
///
/// `field` is the configured item key for structured candidates; plain
/// string candidates ignore it.
pub trait CandidateText {
    /// Return the text used for matching and display.
    ///
    /// # Errors
    ///
    /// Returns [`TextError`] when the candidate cannot produce text for the
    /// given field, a configuration error on the caller's side.
    fn candidate_text(&self, field: Option<&str>) -> Result<Cow<'_, str>, TextError>;
}

impl CandidateText for String {
    fn candidate_text(&self, _field: Option<&str>) -> Result<Cow<'_, str>, TextError> {
        Ok(Cow::Borrowed(self))
    }
}

impl CandidateText for &str {
    fn candidate_text(&self, _field: Option<&str>) -> Result<Cow<'_, str>, TextError> {
        Ok(Cow::Borrowed(*self))
    }
}

impl CandidateText for Value {
    /// String and number leaves coerce to text; any other shape is an
    /// error. With a `field`, the candidate must be an object carrying it.
    fn candidate_text(&self, field: Option<&str>) -> Result<Cow<'_, str>, TextError> {
        let leaf = match field {
            Some(name) => self.get(name).ok_or_else(|| TextError::MissingField {
                field: name.to_string(),
            })?,
            None => self,
        };
        match leaf {
            Value::String(s) => Ok(Cow::Borrowed(s)),
            Value::Number(n) => Ok(Cow::Owned(n.to_string())),
            _ => Err(TextError::NotText),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_is_its_own_text() {
        let s = String::from("Apple");
        assert_eq!(s.candidate_text(None).unwrap(), "Apple");
        // A field name is ignored for plain strings.
        assert_eq!(s.candidate_text(Some("name")).unwrap(), "Apple");
    }

    #[test]
    fn str_slice_is_its_own_text() {
        let s = "Banana";
        assert_eq!(s.candidate_text(None).unwrap(), "Banana");
    }

    #[test]
    fn json_object_indexed_by_field() {
        let v = json!({"name": "Apple", "id": 1});
        assert_eq!(v.candidate_text(Some("name")).unwrap(), "Apple");
    }

    #[test]
    fn json_number_field_coerces() {
        let v = json!({"id": 42});
        assert_eq!(v.candidate_text(Some("id")).unwrap(), "42");
    }

    #[test]
    fn json_string_leaf_without_field() {
        let v = json!("Cherry");
        assert_eq!(v.candidate_text(None).unwrap(), "Cherry");
    }

    #[test]
    fn missing_field_fails_fast() {
        let v = json!({"name": "Apple"});
        assert_eq!(
            v.candidate_text(Some("label")),
            Err(TextError::MissingField {
                field: "label".into()
            })
        );
    }

    #[test]
    fn non_text_leaf_fails_fast() {
        let v = json!({"name": ["not", "text"]});
        assert_eq!(v.candidate_text(Some("name")), Err(TextError::NotText));
        assert_eq!(json!(null).candidate_text(None), Err(TextError::NotText));
        assert_eq!(json!(true).candidate_text(None), Err(TextError::NotText));
    }

    #[test]
    fn field_on_non_object_fails_fast() {
        let v = json!("plain");
        assert!(matches!(
            v.candidate_text(Some("name")),
            Err(TextError::MissingField { .. })
        ));
    }
}
