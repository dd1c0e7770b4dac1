//! Categories interchange format
//!
//! Clients send categories either as one string or as a list of strings.
//! The store keeps a single comma-joined string.

use serde_json::Value;

/// Join a JSON categories value into its stored form.
///
/// Strings pass through untouched, arrays of strings are joined with `,`.
/// Anything else returns None.
pub fn join_categories(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let names: Option<Vec<&str>> = items.iter().map(Value::as_str).collect();
            names.map(|names| names.join(","))
        }
        _ => None,
    }
}

/// Split a stored categories string back into a list.
///
/// The empty string yields an empty list rather than `[""]`.
pub fn split_categories(stored: &str) -> Vec<String> {
    if stored.is_empty() {
        return Vec::new();
    }
    stored.split(',').map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn joins_arrays() {
        assert_eq!(
            join_categories(&json!(["rust", "web"])),
            Some("rust,web".to_string())
        );
        assert_eq!(join_categories(&json!([])), Some(String::new()));
    }

    #[test]
    fn passes_strings_through() {
        assert_eq!(
            join_categories(&json!("rust,web")),
            Some("rust,web".to_string())
        );
    }

    #[test]
    fn rejects_other_shapes() {
        assert_eq!(join_categories(&json!(42)), None);
        assert_eq!(join_categories(&json!(["rust", 1])), None);
        assert_eq!(join_categories(&json!({"a": "b"})), None);
    }

    #[test]
    fn splits_stored_form() {
        assert_eq!(split_categories("rust,web"), vec!["rust", "web"]);
        assert_eq!(split_categories("solo"), vec!["solo"]);
        assert!(split_categories("").is_empty());
    }
}
