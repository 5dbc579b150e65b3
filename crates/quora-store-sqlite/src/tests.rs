//! Integration tests for `SqliteStore` against an in-memory database.

use std::{
  io,
  path::PathBuf,
  sync::{Arc, Mutex},
  time::{Duration, Instant},
};

use quora_core::{
  Classify, ErrorKind,
  answer::{AnswerContent, AnswerId},
  question::{QuestionFields, QuestionId},
  search::QuestionSearch,
  store::ForumStore,
  vote::{Vote, VoteTarget},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn fields(title: &str, description: &str, category: &str) -> QuestionFields {
  QuestionFields::new(
    Some(title.into()),
    Some(description.into()),
    Some(category.into()),
  )
  .unwrap()
}

fn content(s: &str) -> AnswerContent { AnswerContent::new(Some(s.into())).unwrap() }

fn search(title: Option<&str>, category: Option<&str>) -> QuestionSearch {
  QuestionSearch::new(title.map(str::to_owned), category.map(str::to_owned))
}

async fn count(s: &SqliteStore, table: &'static str) -> i64 {
  s.gateway
    .call(move |conn| {
      Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?)
    })
    .await
    .unwrap()
}

fn temp_db(name: &str) -> PathBuf {
  std::env::temp_dir().join(format!(
    "quora-{name}-{}-{}.db",
    std::process::id(),
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
  ))
}

fn remove_db(path: &PathBuf) {
  for suffix in ["", "-wal", "-shm"] {
    let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
  }
}

/// Log sink for asserting on emitted events.
#[derive(Clone, Default)]
struct LogBuf(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuf {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.0.lock().unwrap().extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> { Ok(()) }
}

impl LogBuf {
  fn contents(&self) -> String { String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned() }
}

// ─── Questions ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_question() {
  let s = store().await;

  let created = s.create_question(fields("Q1", "D1", "C1")).await.unwrap();
  assert_eq!(created.id, QuestionId(1));

  let fetched = s.get_question(created.id).await.unwrap();
  assert_eq!(fetched, created);
  assert_eq!(fetched.title, "Q1");
  assert_eq!(fetched.description, "D1");
  assert_eq!(fetched.category, "C1");
}

#[tokio::test]
async fn get_missing_question_is_not_found() {
  let s = store().await;
  let err = s.get_question(QuestionId(42)).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn list_questions_newest_first() {
  let s = store().await;
  let a = s.create_question(fields("first", "d", "c")).await.unwrap();
  let b = s.create_question(fields("second", "d", "c")).await.unwrap();
  let c = s.create_question(fields("third", "d", "c")).await.unwrap();

  let ids: Vec<_> = s
    .list_questions()
    .await
    .unwrap()
    .into_iter()
    .map(|q| q.id)
    .collect();
  assert_eq!(ids, vec![c.id, b.id, a.id]);
}

#[tokio::test]
async fn list_questions_is_repeatable() {
  let s = store().await;
  s.create_question(fields("a", "d", "c")).await.unwrap();
  s.create_question(fields("b", "d", "c")).await.unwrap();

  let first  = s.list_questions().await.unwrap();
  let second = s.list_questions().await.unwrap();
  assert_eq!(first, second);
}

#[tokio::test]
async fn update_question_replaces_fields() {
  let s = store().await;
  let q = s.create_question(fields("old", "old d", "old c")).await.unwrap();

  s.update_question(q.id, fields("new", "new d", "new c")).await.unwrap();

  let fetched = s.get_question(q.id).await.unwrap();
  assert_eq!(fetched.title, "new");
  assert_eq!(fetched.description, "new d");
  assert_eq!(fetched.category, "new c");
  assert_eq!(fetched.created_at, q.created_at);
}

#[tokio::test]
async fn update_missing_question_is_not_found() {
  let s = store().await;
  let err = s
    .update_question(QuestionId(7), fields("t", "d", "c"))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
  assert_eq!(count(&s, "questions").await, 0);
}

// ─── Cascading delete ────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_question_removes_all_answers() {
  let s = store().await;
  let q     = s.create_question(fields("Q", "D", "C")).await.unwrap();
  let other = s.create_question(fields("other", "D", "C")).await.unwrap();
  for i in 0..3 {
    s.create_answer(q.id, content(&format!("answer {i}"))).await.unwrap();
  }
  let kept = s.create_answer(other.id, content("keep me")).await.unwrap();

  s.delete_question(q.id).await.unwrap();

  assert_eq!(
    s.get_question(q.id).await.unwrap_err().kind(),
    ErrorKind::NotFound
  );
  assert_eq!(count(&s, "answers").await, 1);
  let remaining = s.list_answers(other.id).await.unwrap();
  assert_eq!(remaining, vec![kept]);
}

#[tokio::test]
async fn delete_question_with_voted_answers() {
  let s = store().await;
  let q = s.create_question(fields("Q", "D", "C")).await.unwrap();
  let a = s.create_answer(q.id, content("A")).await.unwrap();
  s.vote_answer(a.id, Vote::Up).await.unwrap();
  s.vote_question(q.id, Vote::Down).await.unwrap();

  s.delete_question(q.id).await.unwrap();

  assert_eq!(count(&s, "answers").await, 0);
  assert_eq!(count(&s, "answer_votes").await, 0);
  assert_eq!(count(&s, "question_votes").await, 0);
}

#[tokio::test]
async fn delete_missing_question_is_not_found() {
  let s = store().await;
  let q = s.create_question(fields("Q", "D", "C")).await.unwrap();
  s.create_answer(q.id, content("A")).await.unwrap();

  let err = s.delete_question(QuestionId(999)).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
  assert_eq!(count(&s, "questions").await, 1);
  assert_eq!(count(&s, "answers").await, 1);
}

#[tokio::test]
async fn rolled_back_delete_is_logged() {
  let logs = LogBuf::default();
  let sink = logs.clone();
  let subscriber = tracing_subscriber::fmt()
    .with_writer(move || sink.clone())
    .with_ansi(false)
    .finish();
  let _guard = tracing::subscriber::set_default(subscriber);

  let s = store().await;
  s.delete_question(QuestionId(42)).await.unwrap_err();

  let out = logs.contents();
  assert!(out.contains("WARN"), "{out}");
  assert!(out.contains("transaction rolled back"), "{out}");
}

#[tokio::test]
async fn failed_delete_rolls_back_answers() {
  let s = store().await;
  let q = s.create_question(fields("Q", "D", "C")).await.unwrap();
  for i in 0..2 {
    s.create_answer(q.id, content(&format!("answer {i}"))).await.unwrap();
  }

  // Abort after the answers are already gone inside the transaction.
  s.gateway
    .call(|conn| {
      conn.execute_batch(
        "CREATE TRIGGER fail_question_delete BEFORE DELETE ON questions
         BEGIN SELECT RAISE(ABORT, 'simulated failure'); END;",
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let err = s.delete_question(q.id).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Storage);

  assert!(s.get_question(q.id).await.is_ok());
  assert_eq!(s.list_answers(q.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn answers_of_deleted_question_are_not_found() {
  let s = store().await;
  let q = s.create_question(fields("Q", "D", "C")).await.unwrap();
  s.create_answer(q.id, content("A")).await.unwrap();
  s.delete_question(q.id).await.unwrap();

  let err = s.list_answers(q.id).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

// ─── Search ──────────────────────────────────────────────────────────────────

async fn seed_search(s: &SqliteStore) {
  s.create_question(fields("abc in title", "d", "general")).await.unwrap();
  s.create_question(fields("plain", "d", "abc category")).await.unwrap();
  s.create_question(fields("ABC both", "d", "xyz")).await.unwrap();
  s.create_question(fields("nothing", "d", "else")).await.unwrap();
}

#[tokio::test]
async fn search_identical_values_match_either_column() {
  let s = store().await;
  seed_search(&s).await;

  let titles: Vec<_> = s
    .search_questions(&search(Some("abc"), Some("abc")))
    .await
    .unwrap()
    .into_iter()
    .map(|q| q.title)
    .collect();
  assert_eq!(titles, vec!["ABC both", "plain", "abc in title"]);
}

#[tokio::test]
async fn search_distinct_values_match_both_columns() {
  let s = store().await;
  seed_search(&s).await;

  let found = s
    .search_questions(&search(Some("abc"), Some("xyz")))
    .await
    .unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].title, "ABC both");
}

#[tokio::test]
async fn search_by_category_only_is_case_insensitive() {
  let s = store().await;
  seed_search(&s).await;

  let found = s.search_questions(&search(None, Some("ABC CAT"))).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].title, "plain");
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
  let s = store().await;
  s.create_question(fields("50% off", "d", "c")).await.unwrap();
  s.create_question(fields("500 off", "d", "c")).await.unwrap();

  let found = s.search_questions(&search(Some("0%"), None)).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].title, "50% off");
}

#[tokio::test]
async fn search_values_differing_only_in_case_match_both_columns() {
  let s = store().await;
  seed_search(&s).await;
  s.create_question(fields("abc twice", "d", "ABC cat")).await.unwrap();

  // Not byte-identical, so both columns must match.
  let titles: Vec<_> = s
    .search_questions(&search(Some("ABC"), Some("abc")))
    .await
    .unwrap()
    .into_iter()
    .map(|q| q.title)
    .collect();
  assert_eq!(titles, vec!["abc twice"]);
}

#[tokio::test]
async fn search_folds_non_ascii_case() {
  let s = store().await;
  s.create_question(fields("ÉCOLE questions", "d", "Général")).await.unwrap();
  s.create_question(fields("Привет мир", "d", "misc")).await.unwrap();
  s.create_question(fields("ecole without accent", "d", "misc")).await.unwrap();

  let found = s.search_questions(&search(Some("école"), None)).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].title, "ÉCOLE questions");

  let found = s.search_questions(&search(Some("привет"), None)).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].title, "Привет мир");

  let found = s.search_questions(&search(None, Some("GÉNÉRAL"))).await.unwrap();
  assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn search_without_params_is_invalid() {
  let s = store().await;
  let err = s.search_questions(&search(None, Some(""))).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

// ─── Answers ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_answer_for_missing_question_is_not_found() {
  let s = store().await;
  let err = s
    .create_answer(QuestionId(5), content("orphan"))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
  assert_eq!(count(&s, "answers").await, 0);
}

#[tokio::test]
async fn list_answers_oldest_first() {
  let s = store().await;
  let q = s.create_question(fields("Q", "D", "C")).await.unwrap();
  let a1 = s.create_answer(q.id, content("one")).await.unwrap();
  let a2 = s.create_answer(q.id, content("two")).await.unwrap();

  let answers = s.list_answers(q.id).await.unwrap();
  assert_eq!(answers, vec![a1, a2]);
  assert!(answers.iter().all(|a| a.question_id == q.id));
}

#[tokio::test]
async fn delete_answers_reports_count() {
  let s = store().await;
  let q = s.create_question(fields("Q", "D", "C")).await.unwrap();
  s.create_answer(q.id, content("one")).await.unwrap();
  s.create_answer(q.id, content("two")).await.unwrap();

  assert_eq!(s.delete_answers(q.id).await.unwrap(), 2);
  assert!(s.list_answers(q.id).await.unwrap().is_empty());
  // Nothing left to delete is still a success.
  assert_eq!(s.delete_answers(q.id).await.unwrap(), 0);
  // The question itself survives.
  assert!(s.get_question(q.id).await.is_ok());
}

#[tokio::test]
async fn delete_answers_for_missing_question_is_not_found() {
  let s = store().await;
  let err = s.delete_answers(QuestionId(3)).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

// ─── Votes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn votes_are_appended_not_aggregated() {
  let s = store().await;
  let q = s.create_question(fields("Q", "D", "C")).await.unwrap();

  let up   = s.vote_question(q.id, Vote::Up).await.unwrap();
  let down = s.vote_question(q.id, Vote::Down).await.unwrap();
  s.vote_question(q.id, Vote::Up).await.unwrap();

  assert_eq!(up.target, VoteTarget::Question(q.id));
  assert_eq!(down.vote, Vote::Down);
  assert_ne!(up.id, down.id);
  assert_eq!(count(&s, "question_votes").await, 3);
}

#[tokio::test]
async fn vote_on_missing_question_inserts_nothing() {
  let s = store().await;
  let err = s.vote_question(QuestionId(10), Vote::Up).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
  assert_eq!(count(&s, "question_votes").await, 0);
}

#[tokio::test]
async fn vote_on_answer() {
  let s = store().await;
  let q = s.create_question(fields("Q", "D", "C")).await.unwrap();
  let a = s.create_answer(q.id, content("A")).await.unwrap();

  let rec = s.vote_answer(a.id, Vote::Down).await.unwrap();
  assert_eq!(rec.target, VoteTarget::Answer(a.id));
  assert_eq!(count(&s, "answer_votes").await, 1);

  let err = s.vote_answer(AnswerId(a.id.0 + 100), Vote::Up).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
  assert_eq!(count(&s, "answer_votes").await, 1);
}

// ─── Pool ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn pooled_connections_share_one_database() {
  let path = temp_db("pool");
  let s = SqliteStore::open(&path, 3).await.unwrap();
  assert_eq!(s.gateway.pool_size(), 3);

  let q = s.create_question(fields("Q", "D", "C")).await.unwrap();
  for _ in 0..3 {
    assert_eq!(s.get_question(q.id).await.unwrap().title, "Q");
  }

  s.close().await.unwrap();
  let err = s.list_questions().await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Storage);

  remove_db(&path);
}

#[tokio::test]
async fn busy_connection_does_not_block_an_idle_one() {
  let path = temp_db("busy");
  let s = SqliteStore::open(&path, 2).await.unwrap();

  let gateway = s.gateway.clone();
  let slow = tokio::spawn(async move {
    gateway
      .call(|_| {
        std::thread::sleep(Duration::from_millis(1500));
        Ok(())
      })
      .await
  });
  // Let the slow call check out its connection.
  tokio::time::sleep(Duration::from_millis(100)).await;

  let started = Instant::now();
  s.list_questions().await.unwrap();
  s.list_questions().await.unwrap();
  let waited = started.elapsed();
  assert!(waited < Duration::from_millis(1000), "reads waited {waited:?}");

  slow.await.unwrap().unwrap();
  s.close().await.unwrap();
  remove_db(&path);
}
