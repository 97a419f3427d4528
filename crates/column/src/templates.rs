//! Row-scoped template resolution.
//!
//! Action descriptors may embed `${ ... }` placeholders whose expressions are
//! dot-notation paths into the owning row (`id`, `customer.name`,
//! `items.0.sku`). Resolution happens once per row when the actions
//! collection is rebuilt; an expression whose path does not exist in the row
//! keeps its literal text so the miss stays observable downstream.

use rowgrid_types::{ActionTemplate, CallbackRef, ConfirmPrompt, ResolvedAction, Row};
use serde_json::Value;
use tracing::debug;

/// Materializes one action template against a specific row.
///
/// The identifying triple is merged in, every string field is run through
/// placeholder interpolation, and the template's opaque `extra` fields are
/// interpolated recursively. The programmatic handler is carried through
/// untouched.
pub fn resolve_action(
    template: &ActionTemplate,
    index: &str,
    row_index: usize,
    record_id: &Value,
    row: &Row,
) -> ResolvedAction {
    ResolvedAction {
        index: index.to_string(),
        row_index,
        record_id: record_id.clone(),
        label: template.label.as_deref().map(|text| interpolate_string(text, row)),
        href: template.href.as_deref().map(|text| interpolate_string(text, row)),
        callback: template.callback.as_ref().map(|callback| CallbackRef {
            provider: interpolate_string(&callback.provider, row),
            target: interpolate_string(&callback.target, row),
        }),
        confirm: template.confirm.as_ref().map(|confirm| ConfirmPrompt {
            title: interpolate_string(&confirm.title, row),
            message: interpolate_string(&confirm.message, row),
        }),
        hidden: template.hidden,
        handler: template.handler.clone(),
        extra: template
            .extra
            .iter()
            .map(|(key, value)| (key.clone(), interpolate_value(value, row)))
            .collect(),
    }
}

/// Recursively interpolates placeholders in an arbitrary JSON value.
pub fn interpolate_value(value: &Value, row: &Row) -> Value {
    match value {
        Value::String(text) => Value::String(interpolate_string(text, row)),
        Value::Array(items) => Value::Array(items.iter().map(|item| interpolate_value(item, row)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, nested)| (key.clone(), interpolate_value(nested, row)))
                .collect(),
        ),
        _ => value.clone(),
    }
}

/// Replaces every `${ ... }` placeholder in `input` with the value found at
/// the expression's path in `row`.
///
/// An unterminated placeholder preserves the remainder of the string as-is.
/// An expression whose path cannot be resolved keeps its original `${ ... }`
/// text and logs at debug level.
pub fn interpolate_string(input: &str, row: &Row) -> String {
    let mut output = String::new();
    let mut remaining = input;

    while let Some(start) = remaining.find("${") {
        let (before, after) = remaining.split_at(start);
        output.push_str(before);

        let Some(end) = after.find('}') else {
            // No closing marker; keep the rest verbatim and stop scanning.
            output.push_str(after);
            return output;
        };

        let expression = after[2..end].trim();
        match resolve_row_path(row, expression) {
            Some(resolved) => output.push_str(&resolved),
            None => {
                debug!(expression, "template path not found in row");
                output.push_str(&after[..=end]);
            }
        }
        remaining = &after[end + 1..];
    }

    // With no placeholders processed, `remaining` is still the whole input.
    output.push_str(remaining);
    output
}

/// Resolves a dot-notation path against a row and renders the result.
///
/// Numeric segments index into arrays. Returns `None` when any segment is
/// missing, leaving the caller to decide how a miss degrades.
fn resolve_row_path(row: &Row, path: &str) -> Option<String> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    if first.is_empty() {
        return None;
    }

    let mut current = row.get(first)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(render_value(current))
}

/// Renders a JSON value for placeholder substitution.
///
/// Strings are inserted without quotes; composite values fall back to their
/// compact JSON form.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null => "null".to_string(),
        composite => serde_json::to_string(composite).unwrap_or_default(),
    }
}
