//! Typed accessors over `serde_json::Value` that report missing or
//! mistyped keys as [`DxError::MalformedInput`].

use serde_json::{Map, Value};

use crate::error::{DxError, Result};

/// Indent width used for every pretty-printed JSON snapshot.
pub const JSON_INDENT: usize = 2;

fn join(at: &str, key: &str) -> String {
    if at.is_empty() {
        key.to_string()
    } else {
        format!("{at}.{key}")
    }
}

/// Required key of any type.
pub(crate) fn required<'a>(obj: &'a Value, key: &str, at: &str) -> Result<&'a Value> {
    obj.get(key)
        .ok_or_else(|| DxError::malformed(join(at, key), "required key is missing"))
}

/// Required string key.
pub(crate) fn required_str(obj: &Value, key: &str, at: &str) -> Result<String> {
    required(obj, key, at)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| DxError::malformed(join(at, key), "expected a string"))
}

/// Optional string key; present-but-not-a-string is still an error.
pub(crate) fn optional_str(obj: &Value, key: &str, at: &str) -> Result<Option<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(DxError::malformed(join(at, key), "expected a string")),
    }
}

/// Optional array key; absent or `null` reads as empty.
pub(crate) fn optional_array<'a>(obj: &'a Value, key: &str, at: &str) -> Result<&'a [Value]> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(DxError::malformed(join(at, key), "expected an array")),
    }
}

/// Optional object key; absent or `null` reads as `None`.
pub(crate) fn optional_object<'a>(
    obj: &'a Value,
    key: &str,
    at: &str,
) -> Result<Option<&'a Map<String, Value>>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(DxError::malformed(join(at, key), "expected an object")),
    }
}

/// Required object key, returned as a `Value` so it can be indexed further.
pub(crate) fn required_object<'a>(obj: &'a Value, key: &str, at: &str) -> Result<&'a Value> {
    let value = required(obj, key, at)?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(DxError::malformed(join(at, key), "expected an object"))
    }
}

/// Optional boolean key read with [`to_bool`]; absent means `false`.
pub(crate) fn flag(obj: &Value, key: &str) -> bool {
    obj.get(key).is_some_and(to_bool)
}

/// Lenient boolean extraction.
///
/// JSON booleans read as-is, strings compare case-insensitively to `"true"`,
/// and everything else is `false`.
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Pretty-print a JSON value with [`JSON_INDENT`].
pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
