//! Conversions of bound JSON values.
//!
//! Bound data comes from JSON, so truthiness and string conversion follow the
//! rules HTML data is usually written against: `0`, `""`, `false` and `null`
//! are falsy, and numbers print in their shortest decimal form.

use serde_json::Value;

/// Whether `value` counts as true in a condition.
///
/// Empty arrays and objects are truthy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Whether `value` loosely equals `true`.
///
/// Holds for `true`, the number `1` and values whose string form is numerically
/// `1` (`"1"`, `" 1.0 "`, `["1"]`).
#[must_use]
pub fn is_loosely_true(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64() == Some(1.0),
        Value::String(_) | Value::Array(_) | Value::Object(_) => {
            string_form(value).trim().parse::<f64>() == Ok(1.0)
        }
    }
}

/// The text a value renders as.
///
/// Strings are verbatim, arrays join their items with `,` (nulls as empty
/// strings) and objects render as `[object Object]`.
#[must_use]
pub fn string_form(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number_form(number),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                _ => string_form(item),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_owned(),
    }
}

fn number_form(number: &serde_json::Number) -> String {
    if number.is_f64()
        && let Some(float) = number.as_f64()
        && float.fract() == 0.0
        && float.abs() < 1e15
    {
        // Whole floats print without a fractional part.
        #[allow(clippy::cast_possible_truncation)]
        let whole = float as i64;
        return whole.to_string();
    }
    number.to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_truthiness() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!is_truthy(&value), "{value} should be falsy");
        }
        for value in [json!(true), json!(1), json!(-2.5), json!("0"), json!([]), json!({})] {
            assert!(is_truthy(&value), "{value} should be truthy");
        }
    }

    #[test]
    fn test_loosely_true() {
        for value in [json!(true), json!(1), json!(1.0), json!("1"), json!(" 1 "), json!("1.0")] {
            assert!(is_loosely_true(&value), "{value} should loosely equal true");
        }
        for value in [json!(false), json!(2), json!("cat"), json!("true"), json!(""), json!(null)] {
            assert!(!is_loosely_true(&value), "{value} should not loosely equal true");
        }
    }

    #[test]
    fn test_string_form_scalars() {
        assert_eq!(string_form(&json!("hello world")), "hello world");
        assert_eq!(string_form(&json!(42)), "42");
        assert_eq!(string_form(&json!(0.5)), "0.5");
        assert_eq!(string_form(&json!(3.0)), "3");
        assert_eq!(string_form(&json!(false)), "false");
        assert_eq!(string_form(&json!(null)), "null");
    }

    #[test]
    fn test_string_form_compound() {
        assert_eq!(string_form(&json!([1, "a", null, true])), "1,a,,true");
        assert_eq!(string_form(&json!({"a": 1})), "[object Object]");
    }
}
