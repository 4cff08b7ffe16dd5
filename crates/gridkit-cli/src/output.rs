//! Rendering rows for the terminal

use clap::ValueEnum;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use gridkit_core::{ColumnDefinition, Row};
use gridkit_services::export;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

pub fn render(format: OutputFormat, columns: &[ColumnDefinition], rows: &[&Row]) -> anyhow::Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(columns, rows)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Csv => Ok(export::to_csv(columns, rows.iter().copied())),
    }
}

/// Table of the visible columns; missing cells are left empty
pub fn render_table(columns: &[ColumnDefinition], rows: &[&Row]) -> String {
    let visible: Vec<&ColumnDefinition> = columns.iter().filter(|c| c.visible).collect();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(visible.iter().map(|c| c.label()));

    for row in rows {
        table.add_row(visible.iter().map(|c| {
            row.get(&c.key)
                .map(|v| v.display_text())
                .unwrap_or_default()
        }));
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_contains_headers_and_cells() {
        let columns = vec![
            ColumnDefinition::new("article", "Article"),
            ColumnDefinition::new("price", "Price"),
        ];
        let row = Row::new().with("article", "A1").with("price", 10);
        let rendered = render_table(&columns, &[&row]);
        assert!(rendered.contains("Article"));
        assert!(rendered.contains("A1"));
        assert!(rendered.contains("10"));
    }

    #[test]
    fn test_json_output_is_array_of_objects() {
        let columns = vec![ColumnDefinition::new("a", "A")];
        let row = Row::new().with("a", "x");
        let rendered = render(OutputFormat::Json, &columns, &[&row]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, serde_json::json!([{ "a": "x" }]));
    }
}
