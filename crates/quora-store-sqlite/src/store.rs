//! [`SqliteStore`]: the SQLite implementation of [`ForumStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use quora_core::{
  answer::{Answer, AnswerContent, AnswerId},
  question::{Question, QuestionFields, QuestionId},
  search::QuestionSearch,
  store::ForumStore,
  vote::{Vote, VoteRecord, VoteTarget},
};

use crate::{
  Error, Result,
  encode::{ANSWER_COLUMNS, QUESTION_COLUMNS, RawAnswer, RawQuestion, encode_dt, now},
  filter,
  gateway::{Gateway, TxOutcome},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A forum store backed by a single SQLite database.
///
/// Cloning is cheap; clones share the same connection pool.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) gateway: Gateway,
}

impl SqliteStore {
  /// Open (or create) a store at `path` with `pool_size` connections.
  pub async fn open(path: impl AsRef<Path>, pool_size: usize) -> Result<Self> {
    Ok(Self { gateway: Gateway::open(path, pool_size).await? })
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    Ok(Self { gateway: Gateway::open_in_memory().await? })
  }

  /// Drain pending calls and close every pooled connection.
  pub async fn close(&self) -> Result<()> { self.gateway.close().await }

  async fn query_questions(
    &self,
    where_sql: Option<String>,
    params: Vec<String>,
  ) -> Result<Vec<Question>> {
    let raws: Vec<RawQuestion> = self
      .gateway
      .call(move |conn| {
        let where_sql = where_sql.map(|w| format!("WHERE {w}")).unwrap_or_default();
        let sql = format!(
          "SELECT {QUESTION_COLUMNS} FROM questions {where_sql}
           ORDER BY created_at DESC, id DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), RawQuestion::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawQuestion::into_question).collect()
  }
}

fn question_exists(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row("SELECT 1 FROM questions WHERE id = ?1", [id], |_| Ok(()))
      .optional()?
      .is_some(),
  )
}

fn answer_exists(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row("SELECT 1 FROM answers WHERE id = ?1", [id], |_| Ok(()))
      .optional()?
      .is_some(),
  )
}

// ─── ForumStore impl ─────────────────────────────────────────────────────────

impl ForumStore for SqliteStore {
  type Error = Error;

  // ── Questions ─────────────────────────────────────────────────────────────

  async fn list_questions(&self) -> Result<Vec<Question>> {
    self.query_questions(None, Vec::new()).await
  }

  async fn get_question(&self, id: QuestionId) -> Result<Question> {
    let raw: Option<RawQuestion> = self
      .gateway
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE id = ?1"),
              [id.0],
              RawQuestion::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .ok_or(quora_core::Error::QuestionNotFound(id))?
      .into_question()
  }

  async fn create_question(&self, fields: QuestionFields) -> Result<Question> {
    let created_at  = now();
    let at_str      = encode_dt(created_at);
    let title       = fields.title().to_owned();
    let description = fields.description().to_owned();
    let category    = fields.category().to_owned();

    let (t, d, c) = (title.clone(), description.clone(), category.clone());
    let id = self
      .gateway
      .call(move |conn| {
        conn.execute(
          "INSERT INTO questions (title, description, category, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![t, d, c, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(question_id = id, "created question");
    Ok(Question {
      id: QuestionId(id),
      title,
      description,
      category,
      created_at,
    })
  }

  async fn update_question(&self, id: QuestionId, fields: QuestionFields) -> Result<()> {
    let title       = fields.title().to_owned();
    let description = fields.description().to_owned();
    let category    = fields.category().to_owned();

    let affected = self
      .gateway
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE questions SET title = ?1, description = ?2, category = ?3
           WHERE id = ?4",
          rusqlite::params![title, description, category, id.0],
        )?)
      })
      .await?;

    if affected == 0 {
      return Err(quora_core::Error::QuestionNotFound(id).into());
    }
    tracing::debug!(question_id = id.0, "updated question");
    Ok(())
  }

  async fn delete_question(&self, id: QuestionId) -> Result<()> {
    // Answers go first so no answer ever outlives its question.
    let outcome = self
      .gateway
      .transaction(move |tx| {
        let answers = tx.execute("DELETE FROM answers WHERE question_id = ?1", [id.0])?;
        let deleted = tx.execute("DELETE FROM questions WHERE id = ?1", [id.0])?;
        if deleted == 0 {
          Ok(TxOutcome::Rollback(answers))
        } else {
          Ok(TxOutcome::Commit(answers))
        }
      })
      .await?;

    match outcome {
      TxOutcome::Commit(answers) => {
        tracing::debug!(question_id = id.0, answers, "deleted question with answers");
        Ok(())
      }
      TxOutcome::Rollback(_) => Err(quora_core::Error::QuestionNotFound(id).into()),
    }
  }

  async fn search_questions(&self, query: &QuestionSearch) -> Result<Vec<Question>> {
    let clause = filter::render(&query.filter()?);
    self.query_questions(Some(clause.sql), clause.params).await
  }

  // ── Answers ───────────────────────────────────────────────────────────────

  async fn create_answer(
    &self,
    question_id: QuestionId,
    content: AnswerContent,
  ) -> Result<Answer> {
    let created_at = now();
    let at_str     = encode_dt(created_at);
    let body       = content.into_inner();

    let stored = body.clone();
    let id = self
      .gateway
      .call(move |conn| {
        if !question_exists(conn, question_id.0)? {
          return Ok(None);
        }
        conn.execute(
          "INSERT INTO answers (question_id, content, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![question_id.0, stored, at_str],
        )?;
        Ok(Some(conn.last_insert_rowid()))
      })
      .await?
      .ok_or(quora_core::Error::QuestionNotFound(question_id))?;

    tracing::debug!(question_id = question_id.0, answer_id = id, "created answer");
    Ok(Answer { id: AnswerId(id), question_id, content: body, created_at })
  }

  async fn list_answers(&self, question_id: QuestionId) -> Result<Vec<Answer>> {
    let raws: Vec<RawAnswer> = self
      .gateway
      .call(move |conn| {
        if !question_exists(conn, question_id.0)? {
          return Ok(None);
        }
        let mut stmt = conn.prepare(&format!(
          "SELECT {ANSWER_COLUMNS} FROM answers WHERE question_id = ?1
           ORDER BY created_at ASC, id ASC"
        ))?;
        let rows = stmt
          .query_map([question_id.0], RawAnswer::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(Some(rows))
      })
      .await?
      .ok_or(quora_core::Error::QuestionNotFound(question_id))?;

    raws.into_iter().map(RawAnswer::into_answer).collect()
  }

  async fn delete_answers(&self, question_id: QuestionId) -> Result<u64> {
    let deleted = self
      .gateway
      .call(move |conn| {
        if !question_exists(conn, question_id.0)? {
          return Ok(None);
        }
        let n = conn.execute("DELETE FROM answers WHERE question_id = ?1", [question_id.0])?;
        Ok(Some(n as u64))
      })
      .await?
      .ok_or(quora_core::Error::QuestionNotFound(question_id))?;

    tracing::debug!(question_id = question_id.0, deleted, "deleted answers");
    Ok(deleted)
  }

  // ── Votes ─────────────────────────────────────────────────────────────────

  async fn vote_question(&self, question_id: QuestionId, vote: Vote) -> Result<VoteRecord> {
    let created_at = now();
    let at_str     = encode_dt(created_at);

    let id = self
      .gateway
      .call(move |conn| {
        if !question_exists(conn, question_id.0)? {
          return Ok(None);
        }
        conn.execute(
          "INSERT INTO question_votes (question_id, vote, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![question_id.0, vote.value(), at_str],
        )?;
        Ok(Some(conn.last_insert_rowid()))
      })
      .await?
      .ok_or(quora_core::Error::QuestionNotFound(question_id))?;

    tracing::debug!(question_id = question_id.0, vote = vote.value(), "recorded question vote");
    Ok(VoteRecord { id, target: VoteTarget::Question(question_id), vote, created_at })
  }

  async fn vote_answer(&self, answer_id: AnswerId, vote: Vote) -> Result<VoteRecord> {
    let created_at = now();
    let at_str     = encode_dt(created_at);

    let id = self
      .gateway
      .call(move |conn| {
        if !answer_exists(conn, answer_id.0)? {
          return Ok(None);
        }
        conn.execute(
          "INSERT INTO answer_votes (answer_id, vote, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![answer_id.0, vote.value(), at_str],
        )?;
        Ok(Some(conn.last_insert_rowid()))
      })
      .await?
      .ok_or(quora_core::Error::AnswerNotFound(answer_id))?;

    tracing::debug!(answer_id = answer_id.0, vote = vote.value(), "recorded answer vote");
    Ok(VoteRecord { id, target: VoteTarget::Answer(answer_id), vote, created_at })
  }
}
