//! SQLite backend for the Quora Mock forum store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on dedicated threads
//! without blocking the async runtime.

mod encode;
mod filter;
mod schema;
mod store;

pub mod error;
pub mod gateway;

pub use error::{Error, Result};
pub use gateway::{DEFAULT_POOL_SIZE, Gateway, TxOutcome};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
