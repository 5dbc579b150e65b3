//! The `ForumStore` trait.
//!
//! Implemented by storage backends (e.g. `quora-store-sqlite`). The HTTP layer
//! depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  answer::{Answer, AnswerContent, AnswerId},
  error::Classify,
  question::{Question, QuestionFields, QuestionId},
  search::QuestionSearch,
  vote::{Vote, VoteRecord},
};

/// Abstraction over a forum store backend.
///
/// Every failure is reported through `Self::Error`, which classifies itself
/// as invalid input, not found, or a storage failure. Implementations never
/// retry internally.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ForumStore: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  // ── Questions ─────────────────────────────────────────────────────────

  /// All questions, newest first.
  fn list_questions(
    &self,
  ) -> impl Future<Output = Result<Vec<Question>, Self::Error>> + Send + '_;

  /// A single question, or a not-found error.
  fn get_question(
    &self,
    id: QuestionId,
  ) -> impl Future<Output = Result<Question, Self::Error>> + Send + '_;

  /// Persist a new question. `id` and `created_at` are assigned by the store.
  fn create_question(
    &self,
    fields: QuestionFields,
  ) -> impl Future<Output = Result<Question, Self::Error>> + Send + '_;

  /// Replace title, description and category of an existing question.
  fn update_question(
    &self,
    id: QuestionId,
    fields: QuestionFields,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete a question together with all of its answers, atomically.
  ///
  /// Either both the answers and the question are gone afterwards, or
  /// nothing changed.
  fn delete_question(
    &self,
    id: QuestionId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Case-insensitive substring search over title and/or category, newest
  /// first. See [`QuestionSearch::filter`] for how the fields combine.
  fn search_questions<'a>(
    &'a self,
    query: &'a QuestionSearch,
  ) -> impl Future<Output = Result<Vec<Question>, Self::Error>> + Send + 'a;

  // ── Answers ───────────────────────────────────────────────────────────

  /// Attach an answer to an existing question.
  fn create_answer(
    &self,
    question_id: QuestionId,
    content: AnswerContent,
  ) -> impl Future<Output = Result<Answer, Self::Error>> + Send + '_;

  /// Answers for a question, oldest first.
  fn list_answers(
    &self,
    question_id: QuestionId,
  ) -> impl Future<Output = Result<Vec<Answer>, Self::Error>> + Send + '_;

  /// Delete every answer of a question and return how many were removed.
  /// Removing zero answers is not an error.
  fn delete_answers(
    &self,
    question_id: QuestionId,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Votes (append-only) ───────────────────────────────────────────────

  fn vote_question(
    &self,
    question_id: QuestionId,
    vote: Vote,
  ) -> impl Future<Output = Result<VoteRecord, Self::Error>> + Send + '_;

  fn vote_answer(
    &self,
    answer_id: AnswerId,
    vote: Vote,
  ) -> impl Future<Output = Result<VoteRecord, Self::Error>> + Send + '_;
}
