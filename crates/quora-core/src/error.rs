//! Error types for `quora-core`.

use thiserror::Error;

use crate::{answer::AnswerId, question::QuestionId};

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("question not found: {0}")]
  QuestionNotFound(QuestionId),

  #[error("answer not found: {0}")]
  AnswerNotFound(AnswerId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Classification ──────────────────────────────────────────────────────────

/// The three outcomes a caller has to distinguish when a store operation
/// fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Malformed or missing input, or an out-of-range vote value.
  InvalidInput,
  /// The referenced question or answer does not exist.
  NotFound,
  /// Connectivity, constraint, or transaction failure inside the store.
  Storage,
}

/// Implemented by every store error so that higher layers can map failures to
/// a response without knowing the backend.
pub trait Classify {
  fn kind(&self) -> ErrorKind;
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::InvalidInput(_) => ErrorKind::InvalidInput,
      Error::QuestionNotFound(_) | Error::AnswerNotFound(_) => ErrorKind::NotFound,
    }
  }
}
