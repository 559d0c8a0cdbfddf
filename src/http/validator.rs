//! Header name and value validation.
//!
//! Header values may only carry CR or LF as part of a folded continuation:
//! `CRLF` immediately followed by a space or horizontal tab. Every other
//! occurrence of CR or LF (a bare CR, a bare LF, a blank line, or a CRLF
//! that does not start a continuation) is treated as an injection attempt.
//!
//! Header names never permit CR or LF.

use serde_json::Value;

use crate::http::Error;

const CR: u8 = b'\r';
const LF: u8 = b'\n';

fn is_continuation_ws(b: Option<&u8>) -> bool {
    matches!(b, Some(b' ') | Some(b'\t'))
}

/// Returns `true` if `value` contains no CR/LF other than folded continuations.
pub fn is_valid_header_value(value: &str) -> bool {
    let bytes = value.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            CR => {
                // Only CRLF followed by SP/HT is allowed; this also rejects
                // CRLF CRLF since the second CR is not whitespace.
                if bytes.get(i + 1) != Some(&LF) || !is_continuation_ws(bytes.get(i + 2)) {
                    return false;
                }
                i += 2;
            }
            // LF reached on its own was not consumed by a CR above
            LF => return false,
            _ => i += 1,
        }
    }

    true
}

/// Returns `true` if `name` contains neither CR nor LF.
pub fn is_valid_header_name(name: &str) -> bool {
    !name.bytes().any(|b| b == CR || b == LF)
}

pub fn validate_header_name(name: &str) -> Result<(), Error> {
    if is_valid_header_name(name) {
        return Ok(());
    }

    tracing::warn!(name = ?name, "rejected header name containing CR/LF");
    Err(Error::InvalidHeaderName(name.to_string()))
}

pub fn validate_header_value(name: &str, value: &str) -> Result<(), Error> {
    if is_valid_header_value(value) {
        return Ok(());
    }

    tracing::warn!(name = ?name, value = ?value, "rejected header value containing CR/LF injection");
    Err(Error::HeaderInjection(name.to_string()))
}

/// Checks that a dynamic value is a string or an array of strings and
/// returns the strings it carries, in order.
///
/// CR/LF checks are left to the caller, which knows the header name.
pub fn validate_dynamic_header_value(value: &Value) -> Result<Vec<String>, Error> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                _ => Err(Error::InvalidHeaderValue),
            })
            .collect(),
        _ => Err(Error::InvalidHeaderValue),
    }
}

/// Removes every CR/LF that would fail [`is_valid_header_value`], keeping
/// folded continuations intact.
pub fn sanitize_header_value(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            CR if bytes.get(i + 1) == Some(&LF) && is_continuation_ws(bytes.get(i + 2)) => {
                out.extend_from_slice(b"\r\n");
                i += 2;
            }
            CR | LF => i += 1,
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    // Only ASCII CR/LF bytes were dropped, so UTF-8 boundaries are intact.
    String::from_utf8(out).unwrap_or_default()
}
