//! [`Gateway`]: a checkout pool of SQLite connections with transactional
//! scoping.
//!
//! Each pooled [`tokio_rusqlite::Connection`] owns a dedicated background
//! thread, so statements never block the async runtime. Every call checks a
//! connection out of a [`bb8`] pool, runs on it, and hands it back; a busy
//! connection never delays a call while another one sits idle.

use std::{
  path::{Path, PathBuf},
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
  time::Duration,
};

use bb8::{ManageConnection, Pool};
use rusqlite::{Transaction, TransactionBehavior};
use tokio_rusqlite::Connection;

use crate::{
  Error, Result, filter,
  schema::{CONNECTION_PRAGMAS, SCHEMA},
};

/// Default number of pooled connections for file-backed stores.
pub const DEFAULT_POOL_SIZE: usize = 4;

/// What a transaction body decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxOutcome<T> {
  Commit(T),
  Rollback(T),
}

// ─── Connection manager ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Target {
  File(PathBuf),
  /// Every in-memory connection is its own database, so the schema is
  /// created on connect.
  Memory,
}

/// Opens configured `tokio_rusqlite` connections for the pool.
struct SqliteManager {
  target: Target,
  closed: Arc<AtomicBool>,
}

impl ManageConnection for SqliteManager {
  type Connection = Connection;
  type Error = tokio_rusqlite::Error;

  async fn connect(&self) -> Result<Connection, Self::Error> {
    if self.closed.load(Ordering::Acquire) {
      return Err(tokio_rusqlite::Error::ConnectionClosed);
    }
    let conn = match &self.target {
      Target::File(path) => Connection::open(path).await?,
      Target::Memory => Connection::open_in_memory().await?,
    };
    let with_schema = matches!(self.target, Target::Memory);
    conn
      .call(move |conn| {
        conn.execute_batch(CONNECTION_PRAGMAS)?;
        filter::register_functions(conn)?;
        if with_schema {
          conn.execute_batch(SCHEMA)?;
        }
        Ok(())
      })
      .await?;
    Ok(conn)
  }

  async fn is_valid(&self, conn: &mut Connection) -> Result<(), Self::Error> {
    conn
      .call(|conn| {
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
      })
      .await
  }

  fn has_broken(&self, _conn: &mut Connection) -> bool { self.closed.load(Ordering::Acquire) }
}

// ─── Gateway ─────────────────────────────────────────────────────────────────

/// Pooled access to one SQLite database.
///
/// Cloning is cheap; clones share the same pool.
#[derive(Clone)]
pub struct Gateway {
  pool:   Pool<SqliteManager>,
  closed: Arc<AtomicBool>,
}

impl Gateway {
  /// Create the schema at `path`, then open a pool of `pool_size`
  /// connections to it.
  pub async fn open(path: impl AsRef<Path>, pool_size: usize) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    init_schema(&path).await?;

    let gateway = Self::build(Target::File(path.clone()), pool_size.max(1)).await?;
    tracing::debug!(path = %path.display(), pool_size = gateway.pool_size(), "opened sqlite pool");
    Ok(gateway)
  }

  /// Open an in-memory database.
  ///
  /// Always a single connection that is never recycled: every in-memory
  /// connection is a separate database.
  pub async fn open_in_memory() -> Result<Self> { Self::build(Target::Memory, 1).await }

  async fn build(target: Target, pool_size: usize) -> Result<Self> {
    let closed  = Arc::new(AtomicBool::new(false));
    let manager = SqliteManager { target, closed: closed.clone() };
    let size    = u32::try_from(pool_size).unwrap_or(u32::MAX);

    let pool = Pool::builder()
      .max_size(size)
      .min_idle(Some(size))
      .idle_timeout(None::<Duration>)
      .max_lifetime(None::<Duration>)
      .test_on_check_out(false)
      .build(manager)
      .await?;
    Ok(Self { pool, closed })
  }

  pub fn pool_size(&self) -> usize { self.pool.state().connections as usize }

  /// Check out a connection, run `f` on it, and return it to the pool.
  pub async fn call<F, R>(&self, f: F) -> Result<R>
  where
    F: FnOnce(&mut rusqlite::Connection) -> tokio_rusqlite::Result<R> + Send + 'static,
    R: Send + 'static,
  {
    if self.closed.load(Ordering::Acquire) {
      return Err(tokio_rusqlite::Error::ConnectionClosed.into());
    }
    let conn = self.pool.get().await?;
    Ok(conn.call(f).await?)
  }

  /// Run `f` inside an immediate transaction on one checked-out connection.
  ///
  /// The transaction commits when `f` returns [`TxOutcome::Commit`] and rolls
  /// back when it returns [`TxOutcome::Rollback`] or an error. A transaction
  /// that is dropped without committing is rolled back by rusqlite.
  pub async fn transaction<F, R>(&self, f: F) -> Result<TxOutcome<R>>
  where
    F: FnOnce(&Transaction<'_>) -> tokio_rusqlite::Result<TxOutcome<R>> + Send + 'static,
    R: Send + 'static,
  {
    let outcome = self
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        match f(&tx)? {
          TxOutcome::Commit(v) => {
            tx.commit()?;
            Ok(TxOutcome::Commit(v))
          }
          TxOutcome::Rollback(v) => {
            tx.rollback()?;
            Ok(TxOutcome::Rollback(v))
          }
        }
      })
      .await;

    match &outcome {
      Ok(TxOutcome::Commit(_)) => {}
      Ok(TxOutcome::Rollback(_)) => tracing::warn!("transaction rolled back"),
      Err(e) => tracing::warn!(error = %e, "transaction aborted and rolled back"),
    }
    outcome
  }

  /// Wait for in-flight calls to hand their connections back, then close
  /// every connection.
  ///
  /// Calls through this gateway or any clone fail afterwards.
  pub async fn close(&self) -> Result<()> {
    let size = self.pool.state().connections.max(1);
    let mut held = Vec::with_capacity(size as usize);
    for _ in 0..size {
      held.push(self.pool.get().await?);
    }

    self.closed.store(true, Ordering::Release);
    for conn in &held {
      Connection::clone(conn).close().await?;
    }
    drop(held);

    tracing::debug!("closed sqlite pool");
    Ok(())
  }
}

/// Create the schema through a short-lived connection before the pool opens,
/// so pooled connections never race on DDL.
async fn init_schema(path: &Path) -> Result<()> {
  let conn = Connection::open(path).await?;
  conn
    .call(|conn| {
      conn.execute_batch(CONNECTION_PRAGMAS)?;
      conn.execute_batch(SCHEMA)?;
      Ok(())
    })
    .await?;
  conn.close().await.map_err(Error::from)
}
