//! Handlers for `/questions` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/questions` | Newest first |
//! | `GET`    | `/questions/search` | `?title=...&category=...`, at least one required |
//! | `GET`    | `/questions/:id` | 404 if not found |
//! | `POST`   | `/questions` | Body: `{"title","description","category"}` |
//! | `PUT`    | `/questions/:id` | Same body; replaces all three fields |
//! | `DELETE` | `/questions/:id` | Also deletes every answer of the question |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use quora_core::{
  question::{QuestionFields, QuestionId},
  search::QuestionSearch,
  store::ForumStore,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ApiError;

/// JSON body accepted by `POST /questions` and `PUT /questions/:id`.
#[derive(Debug, Deserialize)]
pub struct QuestionBody {
  pub title:       Option<String>,
  pub description: Option<String>,
  pub category:    Option<String>,
}

impl TryFrom<QuestionBody> for QuestionFields {
  type Error = quora_core::Error;

  fn try_from(b: QuestionBody) -> Result<Self, Self::Error> {
    QuestionFields::new(b.title, b.description, b.category)
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /questions`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Value>, ApiError>
where
  S: ForumStore,
{
  let questions = store
    .list_questions()
    .await
    .map_err(|e| ApiError::from_store("Unable to fetch questions.", e))?;
  Ok(Json(json!({ "data": questions })))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  pub title:    Option<String>,
  pub category: Option<String>,
}

/// `GET /questions/search[?title=...][&category=...]`
pub async fn search<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError>
where
  S: ForumStore,
{
  let Query(params) = params?;
  let query = QuestionSearch::new(params.title, params.category);
  tracing::debug!(?query, "searching questions");

  let questions = store
    .search_questions(&query)
    .await
    .map_err(|e| ApiError::from_store("Unable to fetch questions.", e))?;
  Ok(Json(json!({ "data": questions })))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /questions/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ApiError>
where
  S: ForumStore,
{
  let Path(id) = id?;
  let question = store
    .get_question(QuestionId(id))
    .await
    .map_err(|e| ApiError::from_store("Unable to fetch question.", e))?;
  Ok(Json(json!({ "data": question })))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /questions` returns 201 with the stored question.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<QuestionBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ForumStore,
{
  let Json(body) = body?;
  let fields = QuestionFields::try_from(body)?;

  let question = store
    .create_question(fields)
    .await
    .map_err(|e| ApiError::from_store("Unable to create question.", e))?;
  Ok((
    StatusCode::CREATED,
    Json(json!({ "message": "Question created successfully.", "data": question })),
  ))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /questions/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
  body: Result<Json<QuestionBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError>
where
  S: ForumStore,
{
  let Path(id) = id?;
  let Json(body) = body?;
  let fields = QuestionFields::try_from(body)?;

  store
    .update_question(QuestionId(id), fields)
    .await
    .map_err(|e| ApiError::from_store("Unable to update question.", e))?;
  Ok(Json(json!({ "message": "Question updated successfully." })))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /questions/:id` deletes the question and all of its answers.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ApiError>
where
  S: ForumStore,
{
  let Path(id) = id?;
  store
    .delete_question(QuestionId(id))
    .await
    .map_err(|e| ApiError::from_store("Unable to delete question.", e))?;
  Ok(Json(json!({ "message": "Question and related answers deleted successfully." })))
}
