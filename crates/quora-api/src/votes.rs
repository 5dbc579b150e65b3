//! Handlers for `POST /questions/:id/vote` and `POST /answers/:id/vote`.
//!
//! Body: `{"vote": 1}` or `{"vote": -1}`. Anything else is a 400. The
//! recorded vote is echoed under `data`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
};
use quora_core::{answer::AnswerId, question::QuestionId, store::ForumStore, vote::Vote};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct VoteBody {
  pub vote: Option<i64>,
}

impl TryFrom<VoteBody> for Vote {
  type Error = quora_core::Error;

  fn try_from(b: VoteBody) -> Result<Self, Self::Error> {
    let v = b
      .vote
      .ok_or_else(|| quora_core::Error::InvalidInput("vote is required".into()))?;
    Vote::try_from(v)
  }
}

/// `POST /questions/:id/vote`
pub async fn question<S>(
  State(store): State<Arc<S>>,
  question_id: Result<Path<i64>, PathRejection>,
  body: Result<Json<VoteBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError>
where
  S: ForumStore,
{
  let Path(question_id) = question_id?;
  let Json(body) = body?;
  let vote = Vote::try_from(body)?;

  let record = store
    .vote_question(QuestionId(question_id), vote)
    .await
    .map_err(|e| ApiError::from_store("Unable to vote question.", e))?;
  Ok(Json(json!({
    "message": "Vote on the question has been recorded successfully.",
    "data": record,
  })))
}

/// `POST /answers/:id/vote`
pub async fn answer<S>(
  State(store): State<Arc<S>>,
  answer_id: Result<Path<i64>, PathRejection>,
  body: Result<Json<VoteBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError>
where
  S: ForumStore,
{
  let Path(answer_id) = answer_id?;
  let Json(body) = body?;
  let vote = Vote::try_from(body)?;

  let record = store
    .vote_answer(AnswerId(answer_id), vote)
    .await
    .map_err(|e| ApiError::from_store("Unable to vote answer.", e))?;
  Ok(Json(json!({
    "message": "Vote on the answer has been recorded successfully.",
    "data": record,
  })))
}
