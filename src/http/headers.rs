//! HTTP headers abstraction for [`Message`](crate::http::message::Message).
//!
//! Headers are kept in two co-indexed ordered maps:
//! - a name index mapping the lowercase name to the casing the header was
//!   first registered with,
//! - a value store mapping that registered casing to the header values.
//!
//! Lookups, replacement and removal are therefore case-insensitive, while
//! enumeration preserves insertion order and the registered casing. A header
//! is never stored with an empty value list.
//!
//! Every name and value entering the store goes through the
//! [`validator`](crate::http::validator) module.

use indexmap::IndexMap;
use serde_json::Value;

use crate::http::Error;
use crate::http::validator::{validate_dynamic_header_value, validate_header_name, validate_header_value};

/// Header values accepted by the `with_header` family.
///
/// Strings and collections of strings convert infallibly; dynamic
/// [`serde_json::Value`]s convert only when they are a string or an array of
/// strings. Numbers and booleans have no conversion at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderValues(Vec<String>);

impl HeaderValues {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl TryFrom<&str> for HeaderValues {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Error> {
        Ok(HeaderValues(vec![value.to_string()]))
    }
}

impl TryFrom<String> for HeaderValues {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Error> {
        Ok(HeaderValues(vec![value]))
    }
}

impl TryFrom<&String> for HeaderValues {
    type Error = Error;

    fn try_from(value: &String) -> Result<Self, Error> {
        Ok(HeaderValues(vec![value.clone()]))
    }
}

impl TryFrom<Vec<String>> for HeaderValues {
    type Error = Error;

    fn try_from(values: Vec<String>) -> Result<Self, Error> {
        Ok(HeaderValues(values))
    }
}

impl TryFrom<Vec<&str>> for HeaderValues {
    type Error = Error;

    fn try_from(values: Vec<&str>) -> Result<Self, Error> {
        Ok(HeaderValues(values.into_iter().map(String::from).collect()))
    }
}

impl TryFrom<&[&str]> for HeaderValues {
    type Error = Error;

    fn try_from(values: &[&str]) -> Result<Self, Error> {
        Ok(HeaderValues(values.iter().map(|v| v.to_string()).collect()))
    }
}

impl<const N: usize> TryFrom<[&str; N]> for HeaderValues {
    type Error = Error;

    fn try_from(values: [&str; N]) -> Result<Self, Error> {
        Ok(HeaderValues(values.iter().map(|v| v.to_string()).collect()))
    }
}

impl TryFrom<&Value> for HeaderValues {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self, Error> {
        validate_dynamic_header_value(value).map(HeaderValues)
    }
}

impl TryFrom<Value> for HeaderValues {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Error> {
        HeaderValues::try_from(&value)
    }
}

/// Normalizes raw header input into the name index and the value store.
///
/// Scalars (string, integer, float) are wrapped into a single-element list,
/// arrays must hold scalars only, and every scalar is stored as a string.
/// The first casing seen for a name wins; later casings append to it.
pub(crate) fn filter_headers<I, K>(
    raw: I,
) -> Result<(IndexMap<String, String>, IndexMap<String, Vec<String>>), Error>
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    let mut names: IndexMap<String, String> = IndexMap::new();
    let mut values: IndexMap<String, Vec<String>> = IndexMap::new();

    for (name, value) in raw {
        let name = name.into();
        let coerced = match value {
            Value::Array(items) => items
                .iter()
                .map(|item| scalar_to_string(item).ok_or_else(|| Error::InvalidHeaderValueType(name.clone())))
                .collect::<Result<Vec<_>, _>>()?,
            scalar => vec![scalar_to_string(&scalar).ok_or_else(|| Error::InvalidHeaderValueType(name.clone()))?],
        };

        if coerced.is_empty() {
            continue;
        }

        let registered = names
            .entry(name.to_ascii_lowercase())
            .or_insert(name)
            .clone();
        values.entry(registered).or_default().extend(coerced);
    }

    Ok((names, values))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeaders {
    names: IndexMap<String, String>,
    values: IndexMap<String, Vec<String>>,
}

impl HttpHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds headers from untyped input, running the same type filtering
    /// and CR/LF validation as the typed setters.
    pub fn from_raw<I, K>(raw: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let (names, values) = filter_headers(raw)?;

        for (name, vals) in &values {
            validate_header_name(name)?;
            for v in vals {
                validate_header_value(name, v)?;
            }
        }

        Ok(Self { names, values })
    }

    fn registered(&self, name: &str) -> Option<&String> {
        self.names.get(&name.to_ascii_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registered(name).is_some()
    }

    /// Values for `name` in any casing, or an empty slice.
    pub fn get(&self, name: &str) -> &[String] {
        self.registered(name)
            .and_then(|registered| self.values.get(registered))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Values for `name` joined with `,`, or an empty string.
    pub fn line(&self, name: &str) -> String {
        self.get(name).join(",")
    }

    /// Replaces any header matching `name` case-insensitively. The new
    /// casing becomes the registered one.
    pub fn set(&mut self, name: &str, values: HeaderValues) -> Result<(), Error> {
        Self::validate(name, &values)?;

        self.remove(name);
        if values.is_empty() {
            return Ok(());
        }

        self.names.insert(name.to_ascii_lowercase(), name.to_string());
        self.values.insert(name.to_string(), values.into_vec());
        Ok(())
    }

    /// Appends to the header matching `name` case-insensitively, keeping its
    /// registered casing, or sets it when absent.
    pub fn append(&mut self, name: &str, values: HeaderValues) -> Result<(), Error> {
        Self::validate(name, &values)?;

        let Some(registered) = self.registered(name).cloned() else {
            return self.set(name, values);
        };

        self.values
            .entry(registered)
            .or_default()
            .extend(values.into_vec());
        Ok(())
    }

    /// Removes the header matching `name` case-insensitively. Returns whether
    /// a header was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.names.shift_remove(&name.to_ascii_lowercase()) {
            Some(registered) => {
                self.values.shift_remove(&registered);
                true
            }
            None => false,
        }
    }

    fn validate(name: &str, values: &HeaderValues) -> Result<(), Error> {
        validate_header_name(name)?;
        for v in values.as_slice() {
            validate_header_value(name, v)?;
        }
        Ok(())
    }

    /// Registered casing → values, in insertion order.
    pub fn as_map(&self) -> &IndexMap<String, Vec<String>> {
        &self.values
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Vec<String>> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'a> IntoIterator for &'a HttpHeaders {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = indexmap::map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(v: &[&str]) -> HeaderValues {
        HeaderValues::try_from(v).unwrap()
    }

    #[test]
    fn filter_coerces_integers_and_floats() {
        for (n, expected) in [(json!(123), "123"), (json!(12.3), "12.3")] {
            let (names, store) = filter_headers([
                ("X-Test-Array", json!([n.clone()])),
                ("X-Test-Scalar", n),
            ])
            .unwrap();

            assert_eq!(
                names.into_iter().collect::<Vec<_>>(),
                vec![
                    ("x-test-array".to_string(), "X-Test-Array".to_string()),
                    ("x-test-scalar".to_string(), "X-Test-Scalar".to_string()),
                ]
            );
            assert_eq!(store["X-Test-Array"], vec![expected.to_string()]);
            assert_eq!(store["X-Test-Scalar"], vec![expected.to_string()]);
        }
    }

    #[test]
    fn filter_rejects_invalid_array_elements() {
        for v in [json!(null), json!(true), json!(false), json!({"header": ["foo", "bar"]}), json!(["INVALID"])] {
            let err = filter_headers([("X-Test-Array", json!([v]))]).unwrap_err();
            assert_eq!(err, Error::InvalidHeaderValueType("X-Test-Array".to_string()));
            assert!(err.to_string().contains("header value type"));
        }
    }

    #[test]
    fn filter_rejects_invalid_scalars() {
        for v in [json!(null), json!(true), json!(false), json!({"header": ["foo", "bar"]})] {
            let err = filter_headers([("X-Test-Scalar", v)]).unwrap_err();
            assert!(err.to_string().contains("header value type"));
        }
    }

    #[test]
    fn filter_keeps_first_casing_and_merges() {
        let (names, store) = filter_headers([
            ("X-Foo", json!("a")),
            ("x-foo", json!(["b", 2])),
            ("X-Empty", json!([])),
        ])
        .unwrap();

        assert_eq!(names.len(), 1);
        assert_eq!(names["x-foo"], "X-Foo");
        assert_eq!(store["X-Foo"], vec!["a", "b", "2"]);
        assert!(!store.contains_key("X-Empty"));
    }

    #[test]
    fn from_raw_validates_crlf() {
        let err = HttpHeaders::from_raw([("X-Foo", json!("a\r\nb"))]).unwrap_err();
        assert_eq!(err, Error::HeaderInjection("X-Foo".to_string()));

        let err = HttpHeaders::from_raw([("X-Foo\n", json!("a"))]).unwrap_err();
        assert_eq!(err, Error::InvalidHeaderName("X-Foo\n".to_string()));
    }

    #[test]
    fn set_replaces_case_insensitively() {
        let mut h = HttpHeaders::new();
        h.set("X-Foo", values(&["foo"])).unwrap();
        h.set("Accept", values(&["*/*"])).unwrap();
        h.set("x-FOO", values(&["bar"])).unwrap();

        assert_eq!(h.len(), 2);
        assert_eq!(h.get("X-Foo"), ["bar"]);
        assert_eq!(h.as_map().keys().collect::<Vec<_>>(), ["Accept", "x-FOO"]);
        assert_eq!(h.names.len(), h.values.len());

        let collected: Vec<(&String, &Vec<String>)> = (&h).into_iter().collect();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[1].0, "x-FOO");
        assert_eq!(h.iter().next().map(|(_, v)| v.len()), Some(1));
    }

    #[test]
    fn append_uses_registered_casing() {
        let mut h = HttpHeaders::new();
        h.append("X-Foo", values(&["a"])).unwrap();
        h.append("x-foo", values(&["b", "c"])).unwrap();

        assert_eq!(h.as_map().keys().collect::<Vec<_>>(), ["X-Foo"]);
        assert_eq!(h.line("X-FOO"), "a,b,c");
    }

    #[test]
    fn empty_values_are_never_stored() {
        let mut h = HttpHeaders::new();
        h.set("X-Foo", HeaderValues::default()).unwrap();
        assert!(!h.contains("X-Foo"));

        h.append("X-Foo", HeaderValues::default()).unwrap();
        assert!(h.is_empty());

        h.set("X-Foo", values(&["a"])).unwrap();
        h.set("x-foo", HeaderValues::default()).unwrap();
        assert!(h.is_empty());
        assert!(h.names.is_empty());
    }

    #[test]
    fn failed_set_leaves_headers_untouched() {
        let mut h = HttpHeaders::new();
        h.set("X-Foo", values(&["a"])).unwrap();

        assert!(h.set("x-foo", values(&["ok", "bad\rvalue"])).is_err());
        assert!(h.append("X-Foo", values(&["bad\nvalue"])).is_err());
        assert_eq!(h.as_map().get("X-Foo"), Some(&vec!["a".to_string()]));
    }

    #[test]
    fn remove_is_case_insensitive() {
        let mut h = HttpHeaders::new();
        h.set("X-Foo", values(&["a"])).unwrap();

        assert!(h.remove("x-FOO"));
        assert!(!h.remove("X-Foo"));
        assert!(h.get("X-Foo").is_empty());
        assert_eq!(h.line("X-Foo"), "");
    }

    #[test]
    fn dynamic_values_convert_only_when_strings() {
        assert_eq!(HeaderValues::try_from(json!(["a", "b"])).unwrap().as_slice(), ["a", "b"]);
        assert_eq!(HeaderValues::try_from(json!(1)), Err(Error::InvalidHeaderValue));
    }
}
