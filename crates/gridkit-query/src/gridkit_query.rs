//! gridkit Query - Server-side filter assembly
//!
//! Turns selection state (flagged include/exclude lists, plain value lists)
//! into WHERE clauses for the backend:
//!
//! - [`fragments`] - Textual `ilike`/`in` fragments, wire compatible with the
//!   backend's generic exec endpoint
//! - [`Predicate`] - Tagged predicate tree compiled to `$n` placeholders
//! - [`QueryTemplate`] - MiniJinja statement templates around a WHERE clause
//! - [`SelectionPreset`] - Saved manufacturer/article/name selections

mod error;
mod flagged;
pub mod fragments;
mod identifier;
mod predicate;
mod preset;
mod template;

pub use error::{QueryError, QueryResult};
pub use flagged::FlaggedValue;
pub use fragments::{
    WhereClause, embed_for_exec, escape_literal, make_and_list, make_in_list, make_or_list,
};
pub use identifier::quote_identifier;
pub use predicate::{BoundQuery, Predicate};
pub use preset::{SelectionFields, SelectionPreset};
pub use template::QueryTemplate;
