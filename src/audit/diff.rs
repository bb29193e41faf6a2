//! Field-level change summaries for audit entries

use serde_json::Value;

const MAX_TEXT: usize = 40;

/// Describe what changed between two JSON values
///
/// Objects are compared field by field at the top level; anything else is
/// compared whole. Returns `None` when nothing changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = match (before, after) {
        (Value::Object(old), Value::Object(new)) => {
            let mut changes: Vec<String> = old
                .iter()
                .filter_map(|(field, old_val)| match new.get(field) {
                    Some(new_val) if new_val == old_val => None,
                    Some(new_val) => Some(format!(
                        "{}: {} -> {}",
                        field,
                        describe(old_val),
                        describe(new_val)
                    )),
                    None => Some(format!("{}: {} -> (removed)", field, describe(old_val))),
                })
                .collect();

            changes.extend(
                new.iter()
                    .filter(|(field, _)| !old.contains_key(*field))
                    .map(|(field, val)| format!("{}: (added) -> {}", field, describe(val))),
            );
            changes
        }
        _ if before == after => Vec::new(),
        _ => vec![format!("{} -> {}", describe(before), describe(after))],
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > MAX_TEXT => {
            let head: String = s.chars().take(MAX_TEXT - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} fields}}", fields.len()),
        other => other.to_string(),
    }
}
