//! Row filtering
//!
//! A row passes when every non-empty column filter passes (AND across
//! columns). Per column:
//!
//! - numeric cells use [`NumericFilter`] (`>`, `<`, `=` prefixes, equality otherwise)
//! - string cells use case-insensitive substring containment
//! - any other cell (null, boolean, nested JSON, missing key) fails

use gridkit_core::{CellValue, Row};

use crate::filter_types::{FilterState, NumericFilter};

/// Check a single cell against a single column's filter text.
pub fn column_passes(value: Option<&CellValue>, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }

    match value {
        Some(CellValue::Number(n)) => NumericFilter::parse(filter).matches(*n),
        Some(CellValue::String(s)) => contains_ignore_case(s, filter),
        _ => false,
    }
}

/// Check a row against every entry of the filter state.
pub fn evaluate(row: &Row, filters: &FilterState) -> bool {
    filters
        .active()
        .all(|(key, text)| column_passes(row.get(key), text))
}

/// Quick search: true if any string or numeric cell contains `search`
/// (case-insensitive). Empty search matches everything.
pub fn matches_search(row: &Row, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let search_lower = search.to_lowercase();
    row.iter().any(|(_, cell)| match cell {
        CellValue::String(s) => s.to_lowercase().contains(&search_lower),
        CellValue::Number(_) => cell.display_text().contains(&search_lower),
        _ => false,
    })
}

/// Indices of the rows passing `filters` and `search`, in original order.
pub fn filter_indices(rows: &[Row], filters: &FilterState, search: Option<&str>) -> Vec<usize> {
    let search = search.unwrap_or("");
    rows.iter()
        .enumerate()
        .filter(|(_, row)| evaluate(row, filters) && matches_search(row, search))
        .map(|(idx, _)| idx)
        .collect()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
