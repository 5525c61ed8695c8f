use serde_yaml::Value;

/// Fields tried, in order, to identify a mapping inside a list.
pub const IDENTITY_KEYS: [&str; 3] = ["id", "name", "repo"];

/// Add what `template` has and `existing` lacks. Nested mappings recurse, lists go through
/// [`merge_lists`], and every other conflict keeps the existing value.
pub fn merge_yaml(existing: &Value, template: &Value) -> Value {
    let (Value::Mapping(base), Value::Mapping(overlay)) = (existing, template) else {
        return existing.clone();
    };
    let mut out = base.clone();
    for (key, value) in overlay {
        let merged = match out.get(key) {
            None => value.clone(),
            Some(current @ Value::Mapping(_)) if value.is_mapping() => merge_yaml(current, value),
            Some(Value::Sequence(current)) => match value {
                Value::Sequence(items) => Value::Sequence(merge_lists(current, items)),
                _ => continue,
            },
            Some(_) => continue,
        };
        out.insert(key.clone(), merged);
    }
    Value::Mapping(out)
}

fn identity(item: &Value) -> Option<(&'static str, &Value)> {
    IDENTITY_KEYS.iter().find_map(|k| item.get(*k).map(|v| (*k, v)))
}

/// Append template items not already present. Mappings compare by their first identity
/// field; anything without one compares by full equality.
pub fn merge_lists(existing: &[Value], template: &[Value]) -> Vec<Value> {
    let mut out = existing.to_vec();
    for item in template {
        let present = match item.as_mapping().and_then(|_| identity(item)) {
            Some((key, value)) => out.iter().any(|e| e.is_mapping() && e.get(key) == Some(value)),
            None => out.contains(item),
        };
        if !present {
            out.push(item.clone());
        }
    }
    out
}
