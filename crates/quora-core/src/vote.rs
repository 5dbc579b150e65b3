//! Votes: immutable up/down events on a question or an answer.
//!
//! Votes are append-only. Nothing in the system sums them; each vote is an
//! independent row.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{Error, answer::AnswerId, question::QuestionId};

/// A single up (+1) or down (-1) vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "i64")]
pub enum Vote {
  Up,
  Down,
}

impl Vote {
  pub fn value(self) -> i64 {
    match self {
      Vote::Up => 1,
      Vote::Down => -1,
    }
  }
}

impl TryFrom<i64> for Vote {
  type Error = Error;

  fn try_from(v: i64) -> Result<Self, Self::Error> {
    match v {
      1 => Ok(Vote::Up),
      -1 => Ok(Vote::Down),
      other => Err(Error::InvalidInput(format!(
        "vote must be 1 or -1, got {other}"
      ))),
    }
  }
}

impl From<Vote> for i64 {
  fn from(v: Vote) -> i64 { v.value() }
}

/// What a vote is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum VoteTarget {
  Question(QuestionId),
  Answer(AnswerId),
}

/// A recorded vote event, echoed back to the voter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteRecord {
  pub id:         i64,
  pub target:     VoteTarget,
  pub vote:       Vote,
  pub created_at: DateTime<Utc>,
}
