//! Live value coercion
//!
//! Values arrive from widgets as loosely typed JSON. Conditions and rules
//! coerce them instead of failing on a type mismatch.

use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;

use crate::domain::value_objects::FieldId;

/// Field id to current value
pub type ValueMap = HashMap<FieldId, Value>;

/// A value counts as empty when absent, null, blank text, an empty
/// selection list or an unticked checkbox. Numbers are never empty.
pub fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Bool(checked)) => !checked,
        Some(Value::Number(_)) | Some(Value::Object(_)) => false,
    }
}

/// String coercion. Lists join with commas.
pub fn to_text(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(Value::Bool(b)) => Cow::Borrowed(if *b { "true" } else { "false" }),
        Some(Value::Number(n)) => Cow::Owned(n.to_string()),
        Some(Value::Array(items)) => Cow::Owned(
            items
                .iter()
                .map(|item| to_text(Some(item)).into_owned())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Some(other @ Value::Object(_)) => Cow::Owned(other.to_string()),
    }
}

/// Numeric coercion. Anything non-numeric becomes 0.
pub fn to_number(value: Option<&Value>) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Length used by length rules: item count for lists, characters otherwise
pub fn length(value: Option<&Value>) -> usize {
    match value {
        Some(Value::Array(items)) => items.len(),
        other => to_text(other).chars().count(),
    }
}

/// Strict equality on the stored value. Numbers compare by magnitude so
/// `5` and `5.0` are equal.
pub fn strict_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => left == right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_values() {
        assert!(is_empty(None));
        assert!(is_empty(Some(&json!(null))));
        assert!(is_empty(Some(&json!("   "))));
        assert!(is_empty(Some(&json!([]))));
        assert!(is_empty(Some(&json!(false))));
        assert!(!is_empty(Some(&json!(0))));
        assert!(!is_empty(Some(&json!("0"))));
    }

    #[test]
    fn test_text_coercion() {
        assert_eq!(to_text(None), "");
        assert_eq!(to_text(Some(&json!(42))), "42");
        assert_eq!(to_text(Some(&json!(["wifi", "parking"]))), "wifi,parking");
    }

    #[test]
    fn test_number_coercion() {
        assert_eq!(to_number(Some(&json!("12.5"))), 12.5);
        assert_eq!(to_number(Some(&json!("twelve"))), 0.0);
        assert_eq!(to_number(Some(&json!("NaN"))), 0.0);
        assert_eq!(to_number(None), 0.0);
    }

    #[test]
    fn test_length_counts_chars_and_items() {
        assert_eq!(length(Some(&json!("café"))), 4);
        assert_eq!(length(Some(&json!(["a", "b", "c"]))), 3);
    }

    #[test]
    fn test_strict_eq() {
        assert!(strict_eq(&json!(5), &json!(5.0)));
        assert!(!strict_eq(&json!("5"), &json!(5)));
    }
}
