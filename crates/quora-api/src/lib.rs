//! JSON REST API for the Quora Mock forum.
//!
//! Exposes an axum [`Router`] backed by any [`quora_core::store::ForumStore`].
//! Transport concerns (listening, tracing layers, shutdown) are the caller's
//! responsibility.
//!
//! Reads answer `{"data": ...}`, mutations `{"message": ...}` and errors
//! `{"message": ...}` with 400, 404 or 500. Storage failure details are logged,
//! never returned.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(quora_api::api_router(store.clone()))
//! ```

pub mod answers;
pub mod error;
pub mod questions;
pub mod votes;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use quora_core::store::ForumStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ForumStore + 'static,
{
  Router::new()
    // Questions
    .route("/questions", get(questions::list::<S>).post(questions::create::<S>))
    .route("/questions/search", get(questions::search::<S>))
    .route(
      "/questions/{id}",
      get(questions::get_one::<S>)
        .put(questions::update::<S>)
        .delete(questions::delete_one::<S>),
    )
    // Answers
    .route(
      "/questions/{id}/answers",
      get(answers::list::<S>)
        .post(answers::create::<S>)
        .delete(answers::delete_all::<S>),
    )
    // Votes
    .route("/questions/{id}/vote", post(votes::question::<S>))
    .route("/answers/{id}/vote", post(votes::answer::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
