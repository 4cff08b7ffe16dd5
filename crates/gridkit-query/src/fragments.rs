//! Textual WHERE-clause fragments
//!
//! Every fragment is either empty (no restriction) or a self-contained,
//! parenthesized boolean group, so fragments can be concatenated with `and`.
//! Field names are written as given; values are single-quoted with embedded
//! quotes doubled.

use std::fmt;

use crate::flagged::FlaggedValue;

/// Double embedded single quotes for use inside a `'...'` literal
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Quote-escape a whole statement once more before it is placed into the
/// `query` string of the generic exec endpoint.
pub fn embed_for_exec(statement: &str) -> String {
    escape_literal(statement)
}

/// Substring conditions of the OR bucket (`and_flag == false`).
///
/// `make_or_list("article", [X, not Y])` gives
/// `(article ilike '%X%' or article not ilike '%Y%')`.
pub fn make_or_list(field: &str, values: &[FlaggedValue]) -> String {
    contains_group(field, values, false, "or")
}

/// Substring conditions of the AND bucket (`and_flag == true`)
pub fn make_and_list(field: &str, values: &[FlaggedValue]) -> String {
    contains_group(field, values, true, "and")
}

/// Exact-match list: `(field in ('a', 'b'))`
pub fn make_in_list<S: AsRef<str>>(field: &str, values: &[S]) -> String {
    let literals: Vec<String> = values
        .iter()
        .map(AsRef::as_ref)
        .filter(|v| !v.trim().is_empty())
        .map(|v| format!("'{}'", escape_literal(v)))
        .collect();

    if literals.is_empty() {
        return String::new();
    }
    format!("({} in ({}))", field, literals.join(", "))
}

fn contains_group(field: &str, values: &[FlaggedValue], and_bucket: bool, joiner: &str) -> String {
    let conditions: Vec<String> = values
        .iter()
        .filter(|v| v.and_flag == and_bucket && !v.is_blank())
        .map(|v| {
            let op = if v.not_flag { "not ilike" } else { "ilike" };
            format!("{} {} '%{}%'", field, op, escape_literal(&v.value))
        })
        .collect();

    if conditions.is_empty() {
        return String::new();
    }
    format!("({})", conditions.join(&format!(" {joiner} ")))
}

/// Conjunction of fragments. Empty fragments are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhereClause {
    fragments: Vec<String>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        if !fragment.trim().is_empty() {
            self.fragments.push(fragment);
        }
    }

    pub fn with(mut self, fragment: impl Into<String>) -> Self {
        self.push(fragment);
        self
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Conditions joined with `and`, without the `where` keyword
    pub fn conditions(&self) -> String {
        self.fragments.join(" and ")
    }

    /// `where ...`, or an empty string when nothing restricts the query
    pub fn render(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("where {}", self.conditions())
        }
    }
}

impl fmt::Display for WhereClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl<S: Into<String>> FromIterator<S> for WhereClause {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut clause = Self::new();
        for fragment in iter {
            clause.push(fragment);
        }
        clause
    }
}
