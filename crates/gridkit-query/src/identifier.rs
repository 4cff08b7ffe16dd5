use gridkit_core::GridError;

/// Validate and double-quote a column identifier.
///
/// Accepts plain names and dotted paths (`schema.table.column`) whose parts
/// start with a letter or underscore and contain only ASCII alphanumerics and
/// underscores. Each part is quoted separately.
pub fn quote_identifier(name: &str) -> Result<String, GridError> {
    let parts: Vec<&str> = name.split('.').collect();
    if parts.iter().any(|part| !is_plain_identifier(part)) {
        return Err(GridError::InvalidIdentifier(name.to_string()));
    }
    Ok(parts
        .iter()
        .map(|part| format!("\"{part}\""))
        .collect::<Vec<_>>()
        .join("."))
}

fn is_plain_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quotes_plain_and_dotted_names() {
        assert_eq!(quote_identifier("article").unwrap(), "\"article\"");
        assert_eq!(
            quote_identifier("shop.items.price_eur").unwrap(),
            "\"shop\".\"items\".\"price_eur\""
        );
    }

    #[test]
    fn test_rejects_injection_attempts() {
        for name in ["", "1abc", "a b", "name\"; drop table x; --", "a..b", "a-b"] {
            assert_eq!(
                quote_identifier(name),
                Err(GridError::InvalidIdentifier(name.to_string())),
                "{name:?} should be rejected"
            );
        }
    }
}
