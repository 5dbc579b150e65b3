//! Question search and the typed predicate list it compiles to.
//!
//! Backends never see raw user text spliced into a query: a search becomes a
//! [`Filter`] of [`Predicate`]s whose columns come from a closed enum and whose
//! values are bound as parameters by the store.

use crate::{Error, Result};

// ─── Predicates ──────────────────────────────────────────────────────────────

/// Searchable question columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
  Title,
  Category,
}

impl Column {
  pub fn as_str(self) -> &'static str {
    match self {
      Column::Title => "title",
      Column::Category => "category",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
  /// Case-insensitive substring match.
  Contains,
}

/// One `{column, operator, value}` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
  pub column: Column,
  pub op:     Op,
  pub value:  String,
}

impl Predicate {
  pub fn contains(column: Column, value: impl Into<String>) -> Self {
    Self { column, op: Op::Contains, value: value.into() }
  }
}

/// How a list of predicates combines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
  /// Every predicate must hold.
  All(Vec<Predicate>),
  /// At least one predicate must hold.
  Any(Vec<Predicate>),
}

impl Filter {
  pub fn predicates(&self) -> &[Predicate] {
    match self {
      Filter::All(p) | Filter::Any(p) => p,
    }
  }
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// Parameters for [`ForumStore::search_questions`](crate::store::ForumStore::search_questions).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionSearch {
  pub title:    Option<String>,
  pub category: Option<String>,
}

impl QuestionSearch {
  /// Build a search, treating blank values as absent.
  pub fn new(title: Option<String>, category: Option<String>) -> Self {
    Self { title: non_blank(title), category: non_blank(category) }
  }

  /// Compile to a [`Filter`].
  ///
  /// Fails with [`Error::InvalidInput`] when neither field is supplied. When
  /// both are supplied and byte-identical, either column may match; otherwise
  /// every supplied field must match, even if the values differ only in case.
  pub fn filter(&self) -> Result<Filter> {
    let title    = non_blank(self.title.clone());
    let category = non_blank(self.category.clone());

    match (title, category) {
      (None, None) => Err(Error::InvalidInput(
        "at least one of title or category is required".into(),
      )),
      (Some(t), Some(c)) if t == c => Ok(Filter::Any(vec![
        Predicate::contains(Column::Title, t),
        Predicate::contains(Column::Category, c),
      ])),
      (t, c) => {
        let mut preds = Vec::with_capacity(2);
        if let Some(t) = t {
          preds.push(Predicate::contains(Column::Title, t));
        }
        if let Some(c) = c {
          preds.push(Predicate::contains(Column::Category, c));
        }
        Ok(Filter::All(preds))
      }
    }
  }
}

fn non_blank(v: Option<String>) -> Option<String> {
  v.filter(|s| !s.trim().is_empty())
}
