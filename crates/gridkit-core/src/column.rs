//! Column definitions

use serde::{Deserialize, Serialize};

/// Kind of filter input rendered in a column header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    #[default]
    Textbox,
    Select,
    Checkbox,
    Combobox,
}

impl FilterType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Textbox => "textbox",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::Combobox => "combobox",
        }
    }

    /// Returns true if the filter input offers a list of options
    pub fn uses_options(&self) -> bool {
        matches!(self, Self::Select | Self::Combobox)
    }
}

/// An entry of a select/combobox option list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Column metadata, defined independently of the row shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    /// Unique column key
    pub key: String,
    /// Display label
    #[serde(default)]
    pub name: String,
    /// Whether cells of this column can be edited
    #[serde(default)]
    pub editable: bool,
    /// Filter input kind
    #[serde(default)]
    pub filter_type: FilterType,
    /// Options for select/combobox filters, usually derived from the rows
    #[serde(default)]
    pub options: Vec<SelectOption>,
    /// Whether the column is shown
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl ColumnDefinition {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            editable: false,
            filter_type: FilterType::Textbox,
            options: Vec::new(),
            visible: true,
        }
    }

    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    pub fn with_filter_type(mut self, filter_type: FilterType) -> Self {
        self.filter_type = filter_type;
        self
    }

    /// Label to show, falling back to the key when no name was given
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.key
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_from_json_defaults() {
        let column: ColumnDefinition =
            serde_json::from_str(r#"{"key": "price", "filterType": "select"}"#).unwrap();

        assert_eq!(column.key, "price");
        assert_eq!(column.filter_type, FilterType::Select);
        assert!(!column.editable);
        assert!(column.visible);
        assert!(column.options.is_empty());
        assert_eq!(column.label(), "price");
    }

    #[test]
    fn test_uses_options() {
        assert!(FilterType::Select.uses_options());
        assert!(FilterType::Combobox.uses_options());
        assert!(!FilterType::Textbox.uses_options());
        assert!(!FilterType::Checkbox.uses_options());
    }
}
