//! SQL schema for the Quora SQLite store.
//!
//! Executed once when the store is opened. There are no migrations; the
//! `PRAGMA user_version` stamp records which layout a file was created with.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS questions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    category    TEXT NOT NULL,
    created_at  TEXT NOT NULL   -- RFC 3339 UTC, microseconds; server-assigned
);

-- Answers are only ever deleted in bulk for a question.
CREATE TABLE IF NOT EXISTS answers (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    question_id INTEGER NOT NULL REFERENCES questions(id),
    content     TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

-- Votes are append-only events. They follow their target when it is deleted.
CREATE TABLE IF NOT EXISTS question_votes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    question_id INTEGER NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
    vote        INTEGER NOT NULL CHECK (vote IN (1, -1)),
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS answer_votes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    answer_id   INTEGER NOT NULL REFERENCES answers(id) ON DELETE CASCADE,
    vote        INTEGER NOT NULL CHECK (vote IN (1, -1)),
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS questions_created_idx      ON questions(created_at);
CREATE INDEX IF NOT EXISTS answers_question_idx       ON answers(question_id);
CREATE INDEX IF NOT EXISTS question_votes_target_idx  ON question_votes(question_id);
CREATE INDEX IF NOT EXISTS answer_votes_target_idx    ON answer_votes(answer_id);

PRAGMA user_version = 1;
";

/// Per-connection settings. SQLite scopes these to a connection, so every
/// pooled connection runs them on open.
pub const CONNECTION_PRAGMAS: &str = "
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;
";
