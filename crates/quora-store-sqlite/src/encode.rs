//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings with microsecond
//! precision, so ordering by the text column is chronological.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use quora_core::{
  answer::{Answer, AnswerId},
  question::{Question, QuestionId},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// The current time, truncated to what survives a round-trip through
/// [`encode_dt`].
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// Column list matching [`RawQuestion::from_row`].
pub const QUESTION_COLUMNS: &str = "id, title, description, category, created_at";

/// A `questions` row before timestamp decoding.
pub struct RawQuestion {
  pub id:          i64,
  pub title:       String,
  pub description: String,
  pub category:    String,
  pub created_at:  String,
}

impl RawQuestion {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      title:       row.get(1)?,
      description: row.get(2)?,
      category:    row.get(3)?,
      created_at:  row.get(4)?,
    })
  }

  pub fn into_question(self) -> Result<Question> {
    Ok(Question {
      id:          QuestionId(self.id),
      title:       self.title,
      description: self.description,
      category:    self.category,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Column list matching [`RawAnswer::from_row`].
pub const ANSWER_COLUMNS: &str = "id, question_id, content, created_at";

/// An `answers` row before timestamp decoding.
pub struct RawAnswer {
  pub id:          i64,
  pub question_id: i64,
  pub content:     String,
  pub created_at:  String,
}

impl RawAnswer {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      question_id: row.get(1)?,
      content:     row.get(2)?,
      created_at:  row.get(3)?,
    })
  }

  pub fn into_answer(self) -> Result<Answer> {
    Ok(Answer {
      id:          AnswerId(self.id),
      question_id: QuestionId(self.question_id),
      content:     self.content,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}
