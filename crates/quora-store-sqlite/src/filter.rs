//! Rendering of [`Filter`]s into a parameterised SQLite `WHERE` clause.
//!
//! SQLite's own `LIKE` only folds ASCII case, so both sides of a `Contains`
//! are folded with [`FOLD_FN`], a Unicode lowercase function registered on
//! every pooled connection.

use quora_core::search::{Filter, Op, Predicate};
use rusqlite::functions::FunctionFlags;

/// Name of the SQL function that lowercases its text argument.
pub const FOLD_FN: &str = "fold";

/// Register [`FOLD_FN`] on `conn`.
pub fn register_functions(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    FOLD_FN,
    1,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| {
      let text: Option<String> = ctx.get(0)?;
      Ok(text.map(|t| fold(&t)))
    },
  )
}

fn fold(s: &str) -> String { s.to_lowercase() }

/// A `WHERE` clause body with `?N` placeholders and the values bound to them,
/// in placeholder order.
#[derive(Debug, PartialEq, Eq)]
pub struct WhereClause {
  pub sql:    String,
  pub params: Vec<String>,
}

pub fn render(filter: &Filter) -> WhereClause {
  let joiner = match filter {
    Filter::All(_) => " AND ",
    Filter::Any(_) => " OR ",
  };

  let mut conds  = Vec::new();
  let mut params = Vec::new();
  for pred in filter.predicates() {
    params.push(bind_value(pred));
    conds.push(condition(pred, params.len()));
  }

  WhereClause { sql: format!("({})", conds.join(joiner)), params }
}

fn condition(pred: &Predicate, placeholder: usize) -> String {
  match pred.op {
    Op::Contains => format!(
      "{FOLD_FN}({}) LIKE ?{placeholder} ESCAPE '\\'",
      pred.column.as_str()
    ),
  }
}

fn bind_value(pred: &Predicate) -> String {
  match pred.op {
    Op::Contains => format!("%{}%", escape_like(&fold(&pred.value))),
  }
}

/// Make `%`, `_` and the escape character itself match literally.
fn escape_like(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    if matches!(c, '\\' | '%' | '_') {
      out.push('\\');
    }
    out.push(c);
  }
  out
}
