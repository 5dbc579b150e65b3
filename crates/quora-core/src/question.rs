//! Questions: the top-level forum posts.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Server-assigned identifier of a question.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct QuestionId(pub i64);

impl fmt::Display for QuestionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// A persisted question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
  pub id:          QuestionId,
  pub title:       String,
  pub description: String,
  pub category:    String,
  pub created_at:  DateTime<Utc>,
}

/// The client-editable fields of a question, already validated.
///
/// Used for both creation and full replacement (`PUT`). The only way to build
/// one is [`QuestionFields::new`], so a store never sees an empty field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionFields {
  title:       String,
  description: String,
  category:    String,
}

impl QuestionFields {
  /// Validate raw input. Missing and empty (or whitespace-only) values are
  /// both rejected.
  pub fn new(
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
  ) -> Result<Self> {
    Ok(Self {
      title:       required("title", title)?,
      description: required("description", description)?,
      category:    required("category", category)?,
    })
  }

  pub fn title(&self) -> &str { &self.title }

  pub fn description(&self) -> &str { &self.description }

  pub fn category(&self) -> &str { &self.category }
}

fn required(field: &str, value: Option<String>) -> Result<String> {
  match value {
    Some(v) if !v.trim().is_empty() => Ok(v),
    _ => Err(Error::InvalidInput(format!("{field} is required"))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn some(s: &str) -> Option<String> { Some(s.to_owned()) }

  #[test]
  fn accepts_all_fields_present() {
    let fields = QuestionFields::new(some("Q1"), some("D1"), some("C1")).unwrap();
    assert_eq!(fields.title(), "Q1");
    assert_eq!(fields.description(), "D1");
    assert_eq!(fields.category(), "C1");
  }

  #[test]
  fn rejects_empty_title() {
    let err = QuestionFields::new(some(""), some("x"), some("y")).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(ref m) if m.contains("title")));
  }

  #[test]
  fn rejects_missing_category() {
    let err = QuestionFields::new(some("t"), some("d"), None).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(ref m) if m.contains("category")));
  }

  #[test]
  fn rejects_whitespace_description() {
    assert!(QuestionFields::new(some("t"), some("  "), some("c")).is_err());
  }
}
