//! Field-level validation results shared by the API and the terminal client.
//!
//! Input types derive [`validator::Validate`]; [`field_errors`] flattens the
//! result into the `field → message` map that travels on the wire.

use std::{borrow::Cow, collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Field name → human-readable message. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
  pub fn new() -> Self { Self::default() }

  pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
    self.0.insert(field.into(), message.into());
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn get(&self, field: &str) -> Option<&str> {
    self.0.get(field).map(String::as_str)
  }
}

impl From<validator::ValidationErrors> for ValidationErrors {
  /// Keeps the first message reported for each field.
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut out = Self::new();
    for (field, errs) in errors.field_errors() {
      if let Some(err) = errs.first() {
        let message = err
          .message
          .as_ref()
          .map_or_else(|| err.code.to_string(), |m| m.to_string());
        out.add(field.to_string(), message);
      }
    }
    out
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, message) in &self.0 {
      if !first {
        f.write_str("; ")?;
      }
      write!(f, "{field}: {message}")?;
      first = false;
    }
    Ok(())
  }
}

/// Validate `value`, returning every failing field. Empty when valid.
pub fn field_errors(value: &impl Validate) -> ValidationErrors {
  value.validate().map_or_else(ValidationErrors::from, |()| ValidationErrors::new())
}

// ─── Custom rules ────────────────────────────────────────────────────────────

fn failure(code: &'static str) -> ValidationError {
  let mut err = ValidationError::new(code);
  err.message = Some(Cow::Borrowed(code));
  err
}

/// Rejects empty or whitespace-only text.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
  if value.trim().is_empty() {
    return Err(failure("blank"));
  }
  Ok(())
}

/// Rejects a list containing an empty or whitespace-only entry.
pub fn no_blank_entries(entries: &[String]) -> Result<(), ValidationError> {
  if entries.iter().any(|e| e.trim().is_empty()) {
    return Err(failure("blank_entry"));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Validate)]
  struct Sample {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    name:  String,
    #[validate(email(message = "A valid email is required"))]
    email: String,
  }

  #[test]
  fn display_joins_fields_in_name_order() {
    let mut errs = ValidationErrors::new();
    errs.add("title", "Title is required");
    errs.add("tags", "All tags must be filled");
    assert_eq!(
      errs.to_string(),
      "tags: All tags must be filled; title: Title is required"
    );
  }

  #[test]
  fn derive_failures_become_field_messages() {
    let errs = field_errors(&Sample { name: "  ".into(), email: "nope".into() });
    assert_eq!(errs.get("name"), Some("Name is required"));
    assert_eq!(errs.get("email"), Some("A valid email is required"));

    let ok = field_errors(&Sample { name: "Ada".into(), email: "ada@example.com".into() });
    assert!(ok.is_empty());
  }

  #[test]
  fn blank_entries_are_rejected() {
    assert!(no_blank_entries(&["a".into(), "b".into()]).is_ok());
    assert!(no_blank_entries(&["a".into(), " ".into()]).is_err());
    assert!(no_blank_entries(&[]).is_ok());
  }
}
