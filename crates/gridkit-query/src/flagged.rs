use serde::{Deserialize, Serialize};

/// A selected value plus the flags that place it in a query.
///
/// `and_flag` moves the value from the OR bucket to the AND bucket;
/// `not_flag` turns "contains" into "does not contain".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlaggedValue {
    pub value: String,
    #[serde(default)]
    pub and_flag: bool,
    #[serde(default)]
    pub not_flag: bool,
}

impl FlaggedValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            and_flag: false,
            not_flag: false,
        }
    }

    /// Move the value to the AND bucket
    pub fn and(mut self) -> Self {
        self.and_flag = true;
        self
    }

    /// Invert the match
    pub fn not(mut self) -> Self {
        self.not_flag = true;
        self
    }

    /// Whitespace-only values never produce a condition
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}
