//! Reading rows, columns, and presets from disk

use std::path::Path;

use anyhow::{Context, Result, bail};
use gridkit_core::{ColumnDefinition, Row};
use gridkit_query::SelectionPreset;
use gridkit_view::{SortColumn, SortDirection};
use indexmap::IndexSet;

/// Rows from a JSON array of objects
pub fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rows from {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse rows in {:?}", path))
}

/// Column definitions from a JSON array, or one textbox column per key seen
/// in `rows` (in first-seen order) when no file is given
pub fn load_columns(path: Option<&Path>, rows: &[Row]) -> Result<Vec<ColumnDefinition>> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read columns from {:?}", path))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse columns in {:?}", path))
        }
        None => Ok(infer_columns(rows)),
    }
}

pub fn infer_columns(rows: &[Row]) -> Vec<ColumnDefinition> {
    let keys: IndexSet<&String> = rows.iter().flat_map(|row| row.keys()).collect();
    keys.into_iter()
        .map(|key| ColumnDefinition::new(key.clone(), key.clone()))
        .collect()
}

/// Preset blob; unreadable content falls back to an empty preset
pub fn load_preset(path: &Path) -> Result<SelectionPreset> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read preset from {:?}", path))?;
    Ok(SelectionPreset::from_blob(&content))
}

/// `key=text`; the text may itself start with `=`, `<`, or `>`
pub fn parse_filter_arg(arg: &str) -> Result<(String, String)> {
    match arg.split_once('=') {
        Some((key, text)) if !key.is_empty() => Ok((key.to_string(), text.to_string())),
        _ => bail!("Invalid filter {:?}, expected KEY=TEXT", arg),
    }
}

/// `key`, `key:asc`, or `key:desc`
pub fn parse_sort_arg(arg: &str) -> Result<SortColumn> {
    let (key, direction) = match arg.rsplit_once(':') {
        Some((key, dir)) => match SortDirection::parse(dir) {
            Some(direction) => (key, direction),
            None => bail!("Invalid sort direction {:?} in {:?}", dir, arg),
        },
        None => (arg, SortDirection::Ascending),
    };
    if key.is_empty() {
        bail!("Invalid sort {:?}, expected KEY[:asc|desc]", arg);
    }
    Ok(SortColumn::new(key, direction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_filter_arg_keeps_operator() {
        assert_eq!(
            parse_filter_arg("price=>8").unwrap(),
            ("price".to_string(), ">8".to_string())
        );
        assert_eq!(
            parse_filter_arg("price==20").unwrap(),
            ("price".to_string(), "=20".to_string())
        );
        assert_eq!(
            parse_filter_arg("article=").unwrap(),
            ("article".to_string(), String::new())
        );
        assert!(parse_filter_arg("price").is_err());
        assert!(parse_filter_arg("=x").is_err());
    }

    #[test]
    fn test_parse_sort_arg() {
        assert_eq!(
            parse_sort_arg("name").unwrap(),
            SortColumn::ascending("name")
        );
        assert_eq!(
            parse_sort_arg("name:desc").unwrap(),
            SortColumn::descending("name")
        );
        assert!(parse_sort_arg("name:sideways").is_err());
        assert!(parse_sort_arg(":asc").is_err());
    }

    #[test]
    fn test_infer_columns_in_first_seen_order() {
        let rows = vec![
            Row::new().with("b", 1).with("a", 2),
            Row::new().with("c", 3).with("a", 4),
        ];
        let keys: Vec<String> = infer_columns(&rows).into_iter().map(|c| c.key).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_load_rows_and_columns_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let rows_path = dir.path().join("rows.json");
        std::fs::write(&rows_path, r#"[{ "article": "A1", "price": 10 }]"#).unwrap();
        let columns_path = dir.path().join("columns.json");
        std::fs::write(
            &columns_path,
            r#"[{ "key": "price", "name": "Price", "editable": true, "filterType": "select" }]"#,
        )
        .unwrap();

        let rows = load_rows(&rows_path).unwrap();
        assert_eq!(rows, vec![Row::new().with("article", "A1").with("price", 10)]);

        let columns = load_columns(Some(&columns_path), &rows).unwrap();
        assert_eq!(columns.len(), 1);
        assert!(columns[0].editable);
        assert!(columns[0].visible);
    }
}
