//! Handlers for `/questions/:id/answers`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/questions/:id/answers` | Oldest first; 404 if the question is missing |
//! | `POST`   | `/questions/:id/answers` | Body: `{"content":"..."}`, at most 300 characters |
//! | `DELETE` | `/questions/:id/answers` | Deletes every answer; the question stays |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use quora_core::{answer::AnswerContent, question::QuestionId, store::ForumStore};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct AnswerBody {
  pub content: Option<String>,
}

/// `POST /questions/:id/answers` returns 201 with the stored answer.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  question_id: Result<Path<i64>, PathRejection>,
  body: Result<Json<AnswerBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ForumStore,
{
  let Path(question_id) = question_id?;
  let Json(body) = body?;
  let content = AnswerContent::new(body.content)?;

  let answer = store
    .create_answer(QuestionId(question_id), content)
    .await
    .map_err(|e| ApiError::from_store("Unable to create answer.", e))?;
  Ok((
    StatusCode::CREATED,
    Json(json!({ "message": "Answer created successfully.", "data": answer })),
  ))
}

/// `GET /questions/:id/answers`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  question_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ApiError>
where
  S: ForumStore,
{
  let Path(question_id) = question_id?;
  let answers = store
    .list_answers(QuestionId(question_id))
    .await
    .map_err(|e| ApiError::from_store("Unable to fetch answers.", e))?;
  Ok(Json(json!({ "data": answers })))
}

/// `DELETE /questions/:id/answers`
pub async fn delete_all<S>(
  State(store): State<Arc<S>>,
  question_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ApiError>
where
  S: ForumStore,
{
  let Path(question_id) = question_id?;
  let deleted = store
    .delete_answers(QuestionId(question_id))
    .await
    .map_err(|e| ApiError::from_store("Unable to delete answers.", e))?;
  Ok(Json(json!({
    "message": "All answers for the question have been deleted successfully.",
    "deleted": deleted,
  })))
}
