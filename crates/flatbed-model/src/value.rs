use serde_json::{Map, Number, Value};

/// An opaque source record: named fields of unknown completeness, where a
/// field may be absent, scalar, a sequence, or a mapping.
pub type AttributeBag = Map<String, Value>;

/// Render a cell for CSV output. `None` is the null marker (written as an
/// empty field). Structured cells that survived to output time are
/// JSON-encoded so nothing is dropped silently.
pub fn cell_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(format_number(number)),
        Value::Array(_) | Value::Object(_) => {
            Some(serde_json::to_string(value).unwrap_or_default())
        }
    }
}

/// Whole floats render without a fractional part so identifiers that
/// arrived as floating point stay joinable after export.
fn format_number(number: &Number) -> String {
    if number.as_i64().is_none()
        && number.as_u64().is_none()
        && let Some(float) = number.as_f64()
        && float.fract() == 0.0
        && float.abs() < i64::MAX as f64
    {
        return format!("{}", float as i64);
    }
    number.to_string()
}
