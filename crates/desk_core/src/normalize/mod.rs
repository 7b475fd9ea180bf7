pub mod payload;
pub mod records;

use serde_json::{Map, Value};

/// Resolve the first usable alias of a raw record.
///
/// A value is usable when it is a non-empty string or a non-zero number (stringified).
/// `null`, booleans, empty strings and nested values are skipped, so resolution order is the
/// only thing that decides which alias wins.
pub fn first_alias(raw: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|key| match raw.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    })
}

/// Copy every raw field except the canonical ones.
pub(crate) fn extra_fields(raw: &Map<String, Value>, canonical: &[&str]) -> Map<String, Value> {
    raw.iter()
        .filter(|(k, _)| !canonical.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
