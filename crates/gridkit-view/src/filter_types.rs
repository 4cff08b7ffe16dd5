//! Filter and sort types for grids
//!
//! Shared data structures for filtering and sorting.

use gridkit_core::parse_float;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Per-column filter text. An empty string means "no filter on this column".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    filters: IndexMap<String, String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// One empty entry per column key
    pub fn for_columns<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            filters: keys
                .into_iter()
                .map(|key| (key.into(), String::new()))
                .collect(),
        }
    }

    /// Filter text for a column
    pub fn get(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    /// Replace the text of exactly one column, leaving the others untouched.
    /// Returns the previous text.
    pub fn set(&mut self, key: impl Into<String>, text: impl Into<String>) -> Option<String> {
        self.filters.insert(key.into(), text.into())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.filters.contains_key(key)
    }

    /// Reset every entry to the empty string, keeping the keys
    pub fn clear_values(&mut self) {
        for text in self.filters.values_mut() {
            text.clear();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries with non-empty text
    pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(_, text)| !text.is_empty())
    }

    /// Returns true if no entry restricts rows
    pub fn is_unrestricted(&self) -> bool {
        self.active().next().is_none()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilterState {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            filters: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Comparison applied by a numeric filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComparisonOperator {
    #[default]
    Equal,
    LessThan,
    GreaterThan,
}

impl ComparisonOperator {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
        }
    }

    /// Recognize a leading `>`, `<` or `=`
    fn from_prefix(c: char) -> Option<Self> {
        match c {
            '>' => Some(Self::GreaterThan),
            '<' => Some(Self::LessThan),
            '=' => Some(Self::Equal),
            _ => None,
        }
    }
}

/// Filter text interpreted against a numeric cell.
///
/// `">8"` compares with `8`; text without a recognized prefix is read whole
/// and compared for equality. An operand that does not parse never matches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericFilter {
    pub operator: ComparisonOperator,
    pub operand: Option<f64>,
}

impl NumericFilter {
    pub fn parse(text: &str) -> Self {
        let mut chars = text.chars();
        match chars.next().and_then(ComparisonOperator::from_prefix) {
            Some(operator) => Self {
                operator,
                operand: parse_float(chars.as_str()),
            },
            None => Self {
                operator: ComparisonOperator::Equal,
                operand: parse_float(text),
            },
        }
    }

    pub fn matches(&self, value: f64) -> bool {
        let Some(operand) = self.operand else {
            return false;
        };
        match self.operator {
            ComparisonOperator::Equal => value == operand,
            ComparisonOperator::LessThan => value < operand,
            ComparisonOperator::GreaterThan => value > operand,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "ASC")]
    Ascending,
    #[serde(rename = "DESC")]
    Descending,
}

impl SortDirection {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Parse `asc`/`desc` in any case
    pub fn parse(text: &str) -> Option<Self> {
        if text.eq_ignore_ascii_case("asc") || text.eq_ignore_ascii_case("ascending") {
            Some(Self::Ascending)
        } else if text.eq_ignore_ascii_case("desc") || text.eq_ignore_ascii_case("descending") {
            Some(Self::Descending)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_filter_prefixes() {
        let gt = NumericFilter::parse(">8");
        assert_eq!(gt.operator, ComparisonOperator::GreaterThan);
        assert!(gt.matches(10.0));
        assert!(!gt.matches(8.0));

        let lt = NumericFilter::parse("<8");
        assert!(lt.matches(5.0));
        assert!(!lt.matches(20.0));

        let eq = NumericFilter::parse("=20");
        assert!(eq.matches(20.0));
        assert!(!eq.matches(10.0));
    }

    #[test]
    fn test_numeric_filter_without_prefix_is_equality() {
        let filter = NumericFilter::parse("10");
        assert_eq!(filter.operator, ComparisonOperator::Equal);
        assert!(filter.matches(10.0));
        assert!(!filter.matches(100.0));
    }

    #[test]
    fn test_numeric_filter_malformed_fails_closed() {
        assert!(!NumericFilter::parse(">abc").matches(10.0));
        assert!(!NumericFilter::parse(">").matches(10.0));
        // ">=" is not an operator: "=5" is read as the operand and does not parse
        assert!(!NumericFilter::parse(">=5").matches(10.0));
    }

    #[test]
    fn test_filter_state_set_is_shallow() {
        let mut state = FilterState::for_columns(["article", "price"]);
        assert_eq!(state.len(), 2);
        assert!(state.is_unrestricted());

        state.set("price", ">8");
        assert_eq!(state.get("price"), Some(">8"));
        assert_eq!(state.get("article"), Some(""));
        assert_eq!(state.active().count(), 1);

        state.clear_values();
        assert_eq!(state.len(), 2);
        assert!(state.is_unrestricted());
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!(SortDirection::parse("DESC"), Some(SortDirection::Descending));
        assert_eq!(SortDirection::parse("asc"), Some(SortDirection::Ascending));
        assert_eq!(SortDirection::parse("up"), None);
        assert_eq!(SortDirection::Ascending.toggle(), SortDirection::Descending);
    }
}
