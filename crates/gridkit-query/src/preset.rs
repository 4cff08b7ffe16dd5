//! Saved selection presets
//!
//! A preset is the JSON blob the backend stores per application and preset
//! name: manufacturer list plus flagged article and name lists.

use serde::{Deserialize, Serialize};

use crate::error::QueryResult;
use crate::flagged::FlaggedValue;
use crate::fragments::{WhereClause, make_and_list, make_in_list, make_or_list};
use crate::predicate::Predicate;

/// Column names the preset lists filter on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectionFields {
    pub manufacturer: String,
    pub article: String,
    pub name: String,
}

impl Default for SelectionFields {
    fn default() -> Self {
        Self {
            manufacturer: "manufacturer".to_string(),
            article: "article".to_string(),
            name: "name".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectionPreset {
    pub manufacturers: Vec<String>,
    pub articles: Vec<FlaggedValue>,
    pub names: Vec<FlaggedValue>,
}

impl SelectionPreset {
    /// Parse a stored blob.
    ///
    /// Empty or malformed data yields an empty preset so callers always have
    /// a valid initial selection.
    pub fn from_blob(blob: &str) -> Self {
        if blob.trim().is_empty() || blob.trim() == "null" {
            tracing::debug!("Empty preset blob, using empty selection");
            return Self::default();
        }
        match serde_json::from_str(blob) {
            Ok(preset) => preset,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed preset blob, using empty selection");
                Self::default()
            }
        }
    }

    /// Same as [`from_blob`](Self::from_blob) for an already parsed value
    pub fn from_value(value: serde_json::Value) -> Self {
        if value.is_null() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Malformed preset value, using empty selection");
            Self::default()
        })
    }

    pub fn to_blob(&self) -> QueryResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_empty(&self) -> bool {
        self.manufacturers.is_empty() && self.articles.is_empty() && self.names.is_empty()
    }

    /// Textual WHERE clause for the backend exec endpoint
    pub fn where_clause(&self, fields: &SelectionFields) -> WhereClause {
        WhereClause::new()
            .with(make_in_list(&fields.manufacturer, &self.manufacturers))
            .with(make_or_list(&fields.article, &self.articles))
            .with(make_and_list(&fields.article, &self.articles))
            .with(make_or_list(&fields.name, &self.names))
            .with(make_and_list(&fields.name, &self.names))
    }

    /// Parameterized equivalent of [`where_clause`](Self::where_clause).
    /// `None` when the preset restricts nothing.
    pub fn predicate(&self, fields: &SelectionFields) -> Option<Predicate> {
        let manufacturers: Vec<&str> = self
            .manufacturers
            .iter()
            .map(String::as_str)
            .filter(|m| !m.trim().is_empty())
            .collect();

        let mut parts = Vec::new();
        if !manufacturers.is_empty() {
            parts.push(Predicate::in_list(fields.manufacturer.as_str(), manufacturers));
        }
        parts.extend(Predicate::from_flagged(&fields.article, &self.articles));
        parts.extend(Predicate::from_flagged(&fields.name, &self.names));

        match parts.len() {
            0 => None,
            1 => parts.pop(),
            _ => Some(Predicate::all(parts)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn preset() -> SelectionPreset {
        SelectionPreset {
            manufacturers: vec!["Acme".to_string()],
            articles: vec![FlaggedValue::new("A1"), FlaggedValue::new("A2").not()],
            names: vec![FlaggedValue::new("bolt").and()],
        }
    }

    #[test]
    fn test_from_blob_reads_wire_format() {
        let blob = r#"{
            "manufacturers": ["Acme"],
            "articles": [
                { "value": "A1", "andFlag": false, "notFlag": false },
                { "value": "A2", "andFlag": false, "notFlag": true }
            ],
            "names": [{ "value": "bolt", "andFlag": true, "notFlag": false }]
        }"#;
        assert_eq!(SelectionPreset::from_blob(blob), preset());
    }

    #[test]
    fn test_unresolvable_blob_defaults_to_empty() {
        for blob in ["", "null", "{not json", "[1, 2]", r#"{"articles": 5}"#] {
            let preset = SelectionPreset::from_blob(blob);
            assert!(preset.is_empty(), "{blob:?} should give an empty preset");
        }
        assert!(SelectionPreset::from_value(serde_json::Value::Null).is_empty());
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let preset = SelectionPreset::from_blob(r#"{ "manufacturers": ["Acme"] }"#);
        assert_eq!(preset.manufacturers, vec!["Acme"]);
        assert!(preset.articles.is_empty());
        assert!(preset.names.is_empty());
    }

    #[test]
    fn test_blob_round_trip() {
        let blob = preset().to_blob().unwrap();
        assert_eq!(SelectionPreset::from_blob(&blob), preset());
    }

    #[test]
    fn test_where_clause() {
        let clause = preset().where_clause(&SelectionFields::default());
        assert_eq!(
            clause.render(),
            "where (manufacturer in ('Acme')) \
             and (article ilike '%A1%' or article not ilike '%A2%') \
             and (name ilike '%bolt%')"
        );
        assert_eq!(
            SelectionPreset::default()
                .where_clause(&SelectionFields::default())
                .render(),
            ""
        );
    }

    #[test]
    fn test_predicate_matches_where_clause_shape() {
        let bound = preset()
            .predicate(&SelectionFields::default())
            .unwrap()
            .compile()
            .unwrap();
        assert_eq!(
            bound.sql,
            "(\"manufacturer\" IN ($1) AND (\"article\" ILIKE $2 OR \"article\" NOT ILIKE $3) AND \"name\" ILIKE $4)"
        );
        assert_eq!(bound.params, vec!["Acme", "%A1%", "%A2%", "%bolt%"]);
        assert_eq!(SelectionPreset::default().predicate(&SelectionFields::default()), None);
    }
}
