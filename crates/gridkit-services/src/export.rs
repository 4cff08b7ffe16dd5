//! Spreadsheet export
//!
//! Both formats write a header row of column labels followed by one row per
//! record, with columns in definition order. Hidden columns are skipped.

use gridkit_core::{CellValue, ColumnDefinition, Row};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::ServiceResult;

fn exported_columns(columns: &[ColumnDefinition]) -> Vec<&ColumnDefinition> {
    columns.iter().filter(|c| c.visible).collect()
}

/// Comma-separated export. Fields containing a comma, quote, or line break
/// are quoted with embedded quotes doubled.
pub fn to_csv<'a>(columns: &[ColumnDefinition], rows: impl IntoIterator<Item = &'a Row>) -> String {
    let columns = exported_columns(columns);
    let mut csv = String::new();

    let header: Vec<String> = columns.iter().map(|c| qualify(c.label())).collect();
    csv.push_str(&header.join(","));
    csv.push('\n');

    for row in rows {
        let fields: Vec<String> = columns
            .iter()
            .map(|c| {
                row.get(&c.key)
                    .map(|v| qualify(&v.display_text()))
                    .unwrap_or_default()
            })
            .collect();
        csv.push_str(&fields.join(","));
        csv.push('\n');
    }
    csv
}

fn qualify(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// XLSX export to an in-memory buffer.
///
/// Numbers and booleans keep their cell type; nulls and missing keys are
/// left blank.
pub fn to_xlsx<'a>(
    columns: &[ColumnDefinition],
    rows: impl IntoIterator<Item = &'a Row>,
) -> ServiceResult<Vec<u8>> {
    let columns = exported_columns(columns);
    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    let header_format = Format::new().set_bold();

    for (col, column) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, column.label(), &header_format)?;
    }

    for (idx, row) in rows.into_iter().enumerate() {
        let r = idx as u32 + 1;
        for (col, column) in columns.iter().enumerate() {
            let c = col as u16;
            match row.get(&column.key) {
                None | Some(CellValue::Null) => {}
                Some(CellValue::Number(n)) => {
                    worksheet.write_number(r, c, *n)?;
                }
                Some(CellValue::Bool(b)) => {
                    worksheet.write_boolean(r, c, *b)?;
                }
                Some(value) => {
                    worksheet.write_string(r, c, &value.display_text())?;
                }
            }
        }
    }

    workbook.push_worksheet(worksheet);
    let buffer = workbook.save_to_buffer()?;
    tracing::debug!(columns = columns.len(), bytes = buffer.len(), "XLSX export written");
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn columns() -> Vec<ColumnDefinition> {
        let mut hidden = ColumnDefinition::new("internal", "Internal");
        hidden.visible = false;
        vec![
            ColumnDefinition::new("article", "Article"),
            hidden,
            ColumnDefinition::new("price", "Price"),
            ColumnDefinition::new("note", "Note"),
        ]
    }

    fn rows() -> Vec<Row> {
        vec![
            Row::new()
                .with("article", "A1")
                .with("internal", "x")
                .with("price", 10)
                .with("note", "big, \"heavy\""),
            Row::new().with("article", "A2").with("price", 2.5),
        ]
    }

    #[test]
    fn test_csv_header_and_rows() {
        let csv = to_csv(&columns(), &rows());
        assert_eq!(
            csv,
            "Article,Price,Note\nA1,10,\"big, \"\"heavy\"\"\"\nA2,2.5,\n"
        );
    }

    #[test]
    fn test_csv_without_rows_has_header_only() {
        assert_eq!(to_csv(&columns(), &[]), "Article,Price,Note\n");
    }

    #[test]
    fn test_xlsx_produces_zip_container() {
        let buffer = to_xlsx(&columns(), &rows()).unwrap();
        assert!(buffer.starts_with(b"PK"));
    }
}
