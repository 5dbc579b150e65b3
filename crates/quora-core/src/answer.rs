//! Answers: responses scoped to exactly one question.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, question::QuestionId};

/// Longest accepted answer body, in characters.
pub const MAX_ANSWER_LEN: usize = 300;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AnswerId(pub i64);

impl fmt::Display for AnswerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// A persisted answer. `question_id` never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
  pub id:          AnswerId,
  pub question_id: QuestionId,
  pub content:     String,
  pub created_at:  DateTime<Utc>,
}

/// Validated answer body: non-empty and at most [`MAX_ANSWER_LEN`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerContent(String);

impl AnswerContent {
  pub fn new(content: Option<String>) -> Result<Self> {
    let content = content.unwrap_or_default();
    if content.trim().is_empty() {
      return Err(Error::InvalidInput("content is required".into()));
    }
    if content.chars().count() > MAX_ANSWER_LEN {
      return Err(Error::InvalidInput(format!(
        "content must be at most {MAX_ANSWER_LEN} characters"
      )));
    }
    Ok(Self(content))
  }

  pub fn into_inner(self) -> String { self.0 }
}
