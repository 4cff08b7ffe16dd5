//! Statement templates using MiniJinja
//!
//! A template is a SELECT statement with a `{{ where_clause }}` slot, for
//! example `select * from products {{ where_clause }} order by article`.
//! Additional context values (`source`, `limit`, ...) can be supplied with
//! [`QueryTemplate::render_with`].

use minijinja::{Environment, Value, context};

use crate::error::QueryResult;
use crate::fragments::WhereClause;

/// Statement template rendered around a WHERE clause
#[derive(Debug)]
pub struct QueryTemplate {
    env: Environment<'static>,
    source: String,
}

impl QueryTemplate {
    /// Parse a template, failing on syntax errors
    pub fn new(source: impl Into<String>) -> QueryResult<Self> {
        let source = source.into();
        let env = Environment::new();
        env.template_from_str(&source)?;
        Ok(Self { env, source })
    }

    /// `select * from <source> {{ where_clause }}`
    pub fn select_all(source: &str) -> QueryResult<Self> {
        Self::new(format!("select * from {source} {{{{ where_clause }}}}"))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn render(&self, where_clause: &WhereClause) -> QueryResult<String> {
        let tmpl = self.env.template_from_str(&self.source)?;
        let rendered = tmpl.render(context! { where_clause => where_clause.render() })?;
        Ok(rendered.trim().to_string())
    }

    /// Render with extra context; `where_clause` always comes from the
    /// clause argument.
    pub fn render_with(&self, where_clause: &WhereClause, extra: Value) -> QueryResult<String> {
        let tmpl = self.env.template_from_str(&self.source)?;
        let rendered = tmpl.render(context! {
            where_clause => where_clause.render(),
            ..extra
        })?;
        Ok(rendered.trim().to_string())
    }
}
