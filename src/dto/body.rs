//! Raw body decoding shared by the request DTOs.
//!
//! Every helper here is total. Anything that is not the expected shape turns
//! into an empty or default value, and the caller's `validate()` decides
//! whether that is acceptable.

use serde_json::{Map, Value};

pub type Fields = Map<String, Value>;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

// =============================================================================
// BODY
// =============================================================================

/// Decode a request body into a field map.
///
/// Form-encoded bodies win when the content type says so and at least one
/// pair decodes. Otherwise the bytes are tried as JSON. `None` means neither
/// produced an object.
#[must_use]
pub fn parse_fields(content_type: Option<&str>, raw: &[u8]) -> Option<Fields> {
    if is_form(content_type) {
        let fields = parse_form(raw);
        if !fields.is_empty() {
            return Some(fields);
        }
    }
    match serde_json::from_slice::<Value>(raw) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn is_form(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

/// Decode `a=1&b[c]=2` into `{"a": "1", "b": {"c": "2"}}`.
///
/// One level of bracket nesting is honoured so form posts can carry
/// `options[temperature]`. Deeper or malformed brackets keep the raw key.
fn parse_form(raw: &[u8]) -> Fields {
    let mut fields = Fields::new();
    for (key, value) in url::form_urlencoded::parse(raw) {
        let value = Value::String(value.into_owned());
        match split_bracket_key(&key) {
            Some((outer, inner)) => {
                let slot = fields
                    .entry(outer.to_owned())
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(nested) = slot {
                    nested.insert(inner.to_owned(), value);
                }
            }
            None => {
                fields.insert(key.into_owned(), value);
            }
        }
    }
    fields
}

fn split_bracket_key(key: &str) -> Option<(&str, &str)> {
    let (outer, rest) = key.split_once('[')?;
    let inner = rest.strip_suffix(']')?;
    if outer.is_empty() || inner.contains(['[', ']']) {
        return None;
    }
    Some((outer, inner))
}

// =============================================================================
// FIELD COERCION
// =============================================================================

/// Stringify a scalar field. Arrays, objects, null, and absent fields give
/// the empty string; `true` gives `"1"` and `false` gives `""`.
#[must_use]
pub fn scalar_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "1".to_owned(),
        _ => String::new(),
    }
}

/// Like [`scalar_string`], but an empty result is `None`.
#[must_use]
pub fn optional_scalar_string(value: Option<&Value>) -> Option<String> {
    Some(scalar_string(value)).filter(|s| !s.is_empty())
}

/// Integer coercion with a zero fallback.
///
/// Strings contribute their leading integer (`"42abc"` is 42, `"abc"` is 0).
/// Floats truncate toward zero and saturate at the `i64` bounds.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn int_value(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX))
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => leading_int(s),
        Some(Value::Bool(true)) => 1,
        _ => 0,
    }
}

fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits.bytes().position(|b| !b.is_ascii_digit()).unwrap_or(digits.len());
    let magnitude = digits[..end]
        .bytes()
        .fold(0_i64, |acc, b| acc.saturating_mul(10).saturating_add(i64::from(b - b'0')));
    if negative { -magnitude } else { magnitude }
}

/// A finite number from a JSON number or a numeric string.
#[must_use]
pub fn number_value(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

#[cfg(test)]
#[path = "body_test.rs"]
mod tests;
