use indexmap::IndexMap;

fn render_value(value: &toml::Value) -> String {
    match value {
        toml::Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(render_value).collect();
            format!("[{}]", inner.join(", "))
        }
        other => other.to_string(),
    }
}

/// Append `section` with `values` unless its header already appears anywhere in `existing`.
///
/// Existing sections are never edited, even when they lack some of `values`.
pub fn merge_toml_section(existing: &str, section: &str, values: &IndexMap<String, toml::Value>) -> String {
    if existing.contains(section) {
        tracing::debug!(section, "section already present; leaving file untouched");
        return existing.to_string();
    }
    let mut lines = vec![existing.trim_end().to_string(), String::new(), section.to_string()];
    lines.extend(values.iter().map(|(k, v)| format!("{k} = {}", render_value(v))));
    lines.join("\n") + "\n"
}
