//! Parameterized predicates
//!
//! A [`Predicate`] tree compiles to SQL with PostgreSQL-style positional
//! placeholders (`$1`, `$2`, ...) and an ordered list of bound values. Values
//! never appear in the SQL text and identifiers are validated before quoting.

use serde::{Deserialize, Serialize};

use crate::error::QueryResult;
use crate::flagged::FlaggedValue;
use crate::identifier::quote_identifier;

/// Boolean condition over text columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// Case-insensitive substring match, inverted when `negated`
    Contains {
        field: String,
        value: String,
        #[serde(default)]
        negated: bool,
    },
    /// Exact match against any of `values`
    InList { field: String, values: Vec<String> },
    All { predicates: Vec<Predicate> },
    Any { predicates: Vec<Predicate> },
    Not { predicate: Box<Predicate> },
}

/// SQL with positional placeholders plus the values to bind, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundQuery {
    pub sql: String,
    pub params: Vec<String>,
}

impl Predicate {
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Contains {
            field: field.into(),
            value: value.into(),
            negated: false,
        }
    }

    pub fn not_contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Contains {
            field: field.into(),
            value: value.into(),
            negated: true,
        }
    }

    pub fn in_list<S: Into<String>>(field: impl Into<String>, values: impl IntoIterator<Item = S>) -> Self {
        Self::InList {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn all(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Self::All {
            predicates: predicates.into_iter().collect(),
        }
    }

    pub fn any(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Self::Any {
            predicates: predicates.into_iter().collect(),
        }
    }

    pub fn negate(self) -> Self {
        Self::Not {
            predicate: Box::new(self),
        }
    }

    /// Predicate equivalent of `make_or_list` and `make_and_list` combined.
    ///
    /// OR-bucket items become an [`Predicate::Any`], AND-bucket items an
    /// [`Predicate::All`]; both groups must hold. Blank values are skipped.
    /// Returns `None` when no item restricts the field.
    pub fn from_flagged(field: &str, values: &[FlaggedValue]) -> Option<Self> {
        let bucket = |and_bucket: bool| -> Vec<Predicate> {
            values
                .iter()
                .filter(|v| v.and_flag == and_bucket && !v.is_blank())
                .map(|v| Self::Contains {
                    field: field.to_string(),
                    value: v.value.clone(),
                    negated: v.not_flag,
                })
                .collect()
        };

        let groups: Vec<Predicate> = [(bucket(false), false), (bucket(true), true)]
            .into_iter()
            .filter(|(items, _)| !items.is_empty())
            .map(|(mut items, and_bucket)| {
                if items.len() == 1 {
                    items.remove(0)
                } else if and_bucket {
                    Self::all(items)
                } else {
                    Self::any(items)
                }
            })
            .collect();

        match groups.len() {
            0 => None,
            1 => groups.into_iter().next(),
            _ => Some(Self::all(groups)),
        }
    }

    /// Compile to SQL with `$n` placeholders.
    ///
    /// Empty `All` and empty `InList` compile to `TRUE` (no restriction),
    /// empty `Any` to `FALSE`.
    pub fn compile(&self) -> QueryResult<BoundQuery> {
        let mut params = Vec::new();
        let sql = self.compile_into(&mut params)?;
        Ok(BoundQuery { sql, params })
    }

    fn compile_into(&self, params: &mut Vec<String>) -> QueryResult<String> {
        let sql = match self {
            Self::Contains {
                field,
                value,
                negated,
            } => {
                let column = quote_identifier(field)?;
                params.push(format!("%{}%", escape_like(value)));
                let op = if *negated { "NOT ILIKE" } else { "ILIKE" };
                format!("{} {} ${}", column, op, params.len())
            }
            Self::InList { field, values } => {
                if values.is_empty() {
                    return Ok("TRUE".to_string());
                }
                let column = quote_identifier(field)?;
                let placeholders: Vec<String> = values
                    .iter()
                    .map(|value| {
                        params.push(value.clone());
                        format!("${}", params.len())
                    })
                    .collect();
                format!("{} IN ({})", column, placeholders.join(", "))
            }
            Self::All { predicates } => Self::compile_group(predicates, " AND ", "TRUE", params)?,
            Self::Any { predicates } => Self::compile_group(predicates, " OR ", "FALSE", params)?,
            Self::Not { predicate } => format!("NOT ({})", predicate.compile_into(params)?),
        };
        Ok(sql)
    }

    fn compile_group(
        predicates: &[Predicate],
        joiner: &str,
        empty: &str,
        params: &mut Vec<String>,
    ) -> QueryResult<String> {
        match predicates {
            [] => Ok(empty.to_string()),
            [single] => single.compile_into(params),
            _ => {
                let parts = predicates
                    .iter()
                    .map(|p| p.compile_into(params))
                    .collect::<QueryResult<Vec<_>>>()?;
                Ok(format!("({})", parts.join(joiner)))
            }
        }
    }
}

impl BoundQuery {
    /// `WHERE ...` for a compiled predicate
    pub fn where_clause(&self) -> String {
        format!("WHERE {}", self.sql)
    }
}

/// Escape LIKE wildcards with backslashes (PostgreSQL's default escape)
fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
