use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

use crate::stream::Body;

pub mod headers;
pub mod message;
pub mod request;
pub mod response;
pub mod status;
pub mod validator;

pub use headers::{HeaderValues, HttpHeaders};
pub use message::Message;

/// Errors raised while building or deriving HTTP messages.
///
/// Every failure is reported eagerly by the mutator that caused it; the
/// receiver is never modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Invalid header value; must be a string or array of strings")]
    InvalidHeaderValue,

    #[error("Invalid header value type for {0:?}; must be a string, integer, float or array of those")]
    InvalidHeaderValueType(String),

    #[error("Invalid header name {0:?}")]
    InvalidHeaderName(String),

    #[error("Invalid header value for {0:?}: CRLF injection detected")]
    HeaderInjection(String),

    #[error("Invalid status code {0}; must be an integer between 100 and 599")]
    InvalidStatusCode(u16),

    #[error("Invalid reason phrase {0:?}")]
    InvalidReasonPhrase(String),

    #[error("Invalid HTTP method {0:?}")]
    InvalidMethod(String),

    #[error("Invalid request target {0:?}")]
    InvalidRequestTarget(String),
}

/// HTTP request methods.
///
/// Methods outside the registered set are kept as [`HttpMethod::Extension`],
/// provided they are valid tokens.
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Connect,
    Options,
    Trace,
    Extension(String),
}

impl HttpMethod {
    pub fn parse(method: &str) -> Result<HttpMethod, Error> {
        let m = match method {
            "GET" => HttpMethod::Get,
            "HEAD" => HttpMethod::Head,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "PATCH" => HttpMethod::Patch,
            "DELETE" => HttpMethod::Delete,
            "CONNECT" => HttpMethod::Connect,
            "OPTIONS" => HttpMethod::Options,
            "TRACE" => HttpMethod::Trace,
            _ if is_token(method) => HttpMethod::Extension(method.to_string()),
            _ => return Err(Error::InvalidMethod(method.to_string())),
        };
        Ok(m)
    }

    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Connect => "CONNECT",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
            HttpMethod::Extension(m) => m,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// RFC 9110 token characters
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~'
                )
        })
}

/// Shared message contract of [`HttpRequest`](request::HttpRequest) and
/// [`HttpResponse`](response::HttpResponse).
///
/// Implementors expose their embedded [`Message`] and know how to rebuild
/// themselves around a derived one; every message operation is then provided
/// and returns `Self`.
pub trait HttpMessage: Sized {
    fn message(&self) -> &Message;

    /// Returns a copy of `self` holding `message` instead of the current one.
    fn map_message(&self, message: Message) -> Self;

    fn protocol_version(&self) -> &str {
        self.message().protocol_version()
    }

    fn with_protocol_version(&self, version: &str) -> Self {
        self.map_message(self.message().with_protocol_version(version))
    }

    fn body(&self) -> &Body {
        self.message().body()
    }

    fn with_body(&self, body: Body) -> Self {
        self.map_message(self.message().with_body(body))
    }

    fn headers(&self) -> &IndexMap<String, Vec<String>> {
        self.message().headers()
    }

    fn has_header(&self, name: &str) -> bool {
        self.message().has_header(name)
    }

    fn header(&self, name: &str) -> &[String] {
        self.message().header(name)
    }

    fn header_line(&self, name: &str) -> String {
        self.message().header_line(name)
    }

    fn with_header<V>(&self, name: &str, value: V) -> Result<Self, Error>
    where
        V: TryInto<HeaderValues, Error = Error>,
    {
        Ok(self.map_message(self.message().with_header(name, value)?))
    }

    fn with_added_header<V>(&self, name: &str, value: V) -> Result<Self, Error>
    where
        V: TryInto<HeaderValues, Error = Error>,
    {
        Ok(self.map_message(self.message().with_added_header(name, value)?))
    }

    fn without_header(&self, name: &str) -> Self {
        self.map_message(self.message().without_header(name))
    }
}
