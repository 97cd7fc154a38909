//! Entity field lookup by path.

use serde_json::Value;

/// Look up a value inside an entity snapshot.
///
/// Two path styles are accepted:
/// - dotted segments into entity attributes: `document.name`
/// - JSON-pointer style into semi-structured content: `/content/amount`
///
/// Dotted segments traverse objects by key and arrays by numeric index.
/// A missing segment resolves to `None`; lookups never fail.
pub fn lookup<'a>(entity: &'a Value, path: &str) -> Option<&'a Value> {
    if path.starts_with('/') {
        return entity.pointer(path);
    }

    let mut current = entity;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}
