//! Client-side search over fetched collections.
//!
//! List views fetch the whole collection and narrow it in memory with a
//! case-insensitive substring match over every text and number field.

use serde_json::Value;

/// Returns true if any string or number leaf of `value` contains `needle`,
/// ignoring case. An empty (or all-whitespace) needle matches everything.
pub fn matches_substring(value: &Value, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    needle.is_empty() || contains(value, &needle)
}

/// Keep the items matching `needle`, preserving their order.
pub fn filter_items<'a>(items: &'a [Value], needle: &str) -> Vec<&'a Value> {
    let needle = needle.trim().to_lowercase();
    items
        .iter()
        .filter(|item| needle.is_empty() || contains(item, &needle))
        .collect()
}

fn contains(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Number(n) => n.to_string().contains(needle),
        Value::Array(items) => items.iter().any(|v| contains(v, needle)),
        Value::Object(map) => map.values().any(|v| contains(v, needle)),
        Value::Bool(_) | Value::Null => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn matches_nested_fields_case_insensitively() {
        let case = json!({
            "id": 42,
            "title": "Estate of Harlow",
            "client": {"name": "Mira Okafor"},
            "tags": ["probate", "urgent"]
        });
        assert!(matches_substring(&case, "harlow"));
        assert!(matches_substring(&case, "OKAFOR"));
        assert!(matches_substring(&case, "urg"));
        assert!(matches_substring(&case, "42"));
        assert!(!matches_substring(&case, "divorce"));
    }

    #[test]
    fn empty_needle_matches_everything() {
        assert!(matches_substring(&json!(null), ""));
        assert!(matches_substring(&json!({"a": 1}), "   "));
    }

    #[test]
    fn booleans_and_nulls_never_match() {
        let item = json!({"paid": true, "due": null});
        assert!(!matches_substring(&item, "true"));
        assert!(!matches_substring(&item, "null"));
    }

    #[test]
    fn filter_preserves_order() {
        let invoices = vec![
            json!({"number": "INV-001", "client": "Acme"}),
            json!({"number": "INV-002", "client": "Birch"}),
            json!({"number": "INV-003", "client": "acme holdings"}),
        ];
        let matched = filter_items(&invoices, "acme");
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0]["number"], "INV-001");
        assert_eq!(matched[1]["number"], "INV-003");
    }
}
