//! Immutable HTTP message value.
//!
//! A [`Message`] bundles a protocol version, an [`HttpHeaders`] store and a
//! shared [`Body`]. It is never changed in place: each `with_*` method
//! returns a new message and leaves the receiver as it was, including when
//! the operation fails.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::http::Error;
use crate::http::headers::{HeaderValues, HttpHeaders};
use crate::stream::{Body, MemoryStream};

pub const DEFAULT_PROTOCOL_VERSION: &str = "1.1";

#[derive(Debug, Clone)]
pub struct Message {
    protocol_version: String,
    headers: HttpHeaders,
    body: Body,
}

impl Default for Message {
    fn default() -> Self {
        Self {
            protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(),
            headers: HttpHeaders::new(),
            body: MemoryStream::body(),
        }
    }
}

impl Message {
    /// Protocol version 1.1, no headers, empty in-memory body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a message from optional parts. Raw headers go through the
    /// same filtering and validation as [`Message::with_header`].
    pub fn from_parts<I, K>(
        protocol_version: Option<&str>,
        body: Option<Body>,
        headers: I,
    ) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Ok(Self {
            protocol_version: protocol_version
                .unwrap_or(DEFAULT_PROTOCOL_VERSION)
                .to_string(),
            headers: HttpHeaders::from_raw(headers)?,
            body: body.unwrap_or_else(MemoryStream::body),
        })
    }

    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    pub fn with_protocol_version(&self, version: &str) -> Self {
        Self {
            protocol_version: version.to_string(),
            ..self.clone()
        }
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn with_body(&self, body: Body) -> Self {
        Self {
            body,
            ..self.clone()
        }
    }

    /// All headers in insertion order, keyed by their registered casing.
    pub fn headers(&self) -> &IndexMap<String, Vec<String>> {
        self.headers.as_map()
    }

    pub fn header_bag(&self) -> &HttpHeaders {
        &self.headers
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains(name)
    }

    pub fn header(&self, name: &str) -> &[String] {
        self.headers.get(name)
    }

    pub fn header_line(&self, name: &str) -> String {
        self.headers.line(name)
    }

    pub fn with_header<V>(&self, name: &str, value: V) -> Result<Self, Error>
    where
        V: TryInto<HeaderValues, Error = Error>,
    {
        let values = value.try_into()?;
        let mut new = self.clone();
        new.headers.set(name, values)?;
        Ok(new)
    }

    pub fn with_added_header<V>(&self, name: &str, value: V) -> Result<Self, Error>
    where
        V: TryInto<HeaderValues, Error = Error>,
    {
        let values = value.try_into()?;
        let mut new = self.clone();
        new.headers.append(name, values)?;
        Ok(new)
    }

    pub fn without_header(&self, name: &str) -> Self {
        let mut new = self.clone();
        new.headers.remove(name);
        new
    }

    /// Whether both messages reference the same body stream.
    pub fn shares_body_with(&self, other: &Message) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}
