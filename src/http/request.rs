use crate::http::message::Message;
use crate::http::{Error, HttpMessage, HttpMethod};

/// An immutable HTTP request: method, request target and a [`Message`].
///
/// The request target is kept as an opaque string; it is not parsed.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: HttpMethod,
    request_target: String,
    message: Message,
}

impl Default for HttpRequest {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            request_target: "/".to_string(),
            message: Message::new(),
        }
    }
}

impl HttpRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_message(method: HttpMethod, request_target: &str, message: Message) -> Result<Self, Error> {
        validate_request_target(request_target)?;
        Ok(Self {
            method,
            request_target: request_target.to_string(),
            message,
        })
    }

    pub fn method(&self) -> &HttpMethod {
        &self.method
    }

    /// Accepts registered methods and any other valid token method.
    pub fn with_method(&self, method: &str) -> Result<Self, Error> {
        let method = HttpMethod::parse(method)?;
        Ok(Self {
            method,
            ..self.clone()
        })
    }

    pub fn request_target(&self) -> &str {
        &self.request_target
    }

    pub fn with_request_target(&self, target: &str) -> Result<Self, Error> {
        validate_request_target(target)?;

        Ok(Self {
            request_target: target.to_string(),
            ..self.clone()
        })
    }
}

// request targets cannot contain whitespace
fn validate_request_target(target: &str) -> Result<(), Error> {
    if target.is_empty() || target.bytes().any(|b| b.is_ascii_whitespace()) {
        return Err(Error::InvalidRequestTarget(target.to_string()));
    }
    Ok(())
}

impl HttpMessage for HttpRequest {
    fn message(&self) -> &Message {
        &self.message
    }

    fn map_message(&self, message: Message) -> Self {
        Self {
            message,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let r = HttpRequest::new();
        assert_eq!(r.method(), &HttpMethod::Get);
        assert_eq!(r.request_target(), "/");
        assert_eq!(r.protocol_version(), "1.1");
    }

    #[test]
    fn with_method_returns_new_request() {
        let r = HttpRequest::new();
        let post = r.with_method("POST").unwrap();
        assert_eq!(post.method(), &HttpMethod::Post);
        assert_eq!(r.method(), &HttpMethod::Get);
        assert!(r.with_method("NOT A METHOD").is_err());
    }

    #[test]
    fn with_request_target() {
        let r = HttpRequest::new().with_request_target("/search?q=rust").unwrap();
        assert_eq!(r.request_target(), "/search?q=rust");
        assert_eq!(r.with_request_target("/a b").unwrap_err(), Error::InvalidRequestTarget("/a b".to_string()));
        assert!(r.with_request_target("").is_err());
    }

    #[test]
    fn header_operations_return_requests() {
        let r = HttpRequest::new()
            .with_method("PUT")
            .unwrap()
            .with_header("Host", "example.com")
            .unwrap()
            .with_protocol_version("1.0");

        assert_eq!(r.method(), &HttpMethod::Put);
        assert_eq!(r.header("host"), ["example.com"]);
        assert_eq!(r.protocol_version(), "1.0");
        assert!(r.with_header("Host", "a\nb").is_err());
    }

    #[test]
    fn from_message_keeps_headers() {
        let m = Message::new().with_header("Accept", "*/*").unwrap();
        let r = HttpRequest::from_message(HttpMethod::Delete, "/items/1", m).unwrap();
        assert_eq!(r.method(), &HttpMethod::Delete);
        assert_eq!(r.header_line("accept"), "*/*");
    }
}
