//! Core types and trait definitions for the Quora Mock forum.
//!
//! This crate is free of HTTP and database dependencies. Validation lives
//! here, so every value a store receives is already well-formed.

pub mod answer;
pub mod error;
pub mod question;
pub mod search;
pub mod store;
pub mod vote;

pub use error::{Classify, Error, ErrorKind, Result};
