use serde_json::Value;

/// Interprets a stored categories value as a list of strings.
///
/// A JSON array keeps its string elements, de-duplicated in first-seen
/// order. A JSON string is parsed once more and treated the same way
/// (rows written by older clients stored the array string-encoded).
/// Anything else, including an unparseable string, is the empty list;
/// malformed data never surfaces as an error.
pub fn normalize_categories(value: &Value) -> Vec<String> {
    let reparsed;
    let array = match value {
        Value::String(raw) => {
            reparsed = serde_json::from_str::<Value>(raw).unwrap_or(Value::Null);
            reparsed.as_array()
        }
        other => other.as_array(),
    };

    let mut categories: Vec<String> = Vec::new();
    if let Some(items) = array {
        for item in items {
            if let Some(s) = item.as_str() {
                if !categories.iter().any(|existing| existing.as_str() == s) {
                    categories.push(s.to_string());
                }
            }
        }
    }
    categories
}

/// Set union keeping first-occurrence order: everything in `current`, then
/// whatever in `incoming` is not already present. Equality is literal
/// string equality; "Rust" and "rust" are different categories.
pub fn union_categories(current: &[String], incoming: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(current.len() + incoming.len());
    for category in current.iter().chain(incoming) {
        if !merged.iter().any(|existing| existing == category) {
            merged.push(category.clone());
        }
    }
    merged
}
