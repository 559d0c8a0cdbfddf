use crate::http::message::Message;
use crate::http::status::HttpStatus;
use crate::http::{Error, HttpMessage};

/// An immutable HTTP response: status line data plus a [`Message`].
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    status: HttpStatus,
    reason_phrase: Option<String>,
    message: Message,
}

impl HttpResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_message(status: HttpStatus, message: Message) -> Self {
        Self {
            status,
            reason_phrase: None,
            message,
        }
    }

    pub fn status(&self) -> HttpStatus {
        self.status
    }

    /// Custom reason phrase if one was given, otherwise the standard one.
    pub fn reason_phrase(&self) -> &str {
        self.reason_phrase
            .as_deref()
            .unwrap_or_else(|| self.status.reason_phrase())
    }

    /// Returns a response with `code` and, optionally, a custom reason
    /// phrase. `None` falls back to the standard phrase for `code`.
    pub fn with_status(&self, code: u16, reason_phrase: Option<&str>) -> Result<Self, Error> {
        let status = HttpStatus::from_u16(code)?;
        if let Some(reason) = reason_phrase {
            if reason.bytes().any(|b| b == b'\r' || b == b'\n') {
                return Err(Error::InvalidReasonPhrase(reason.to_string()));
            }
        }

        Ok(Self {
            status,
            reason_phrase: reason_phrase.map(str::to_string),
            message: self.message.clone(),
        })
    }
}

impl HttpMessage for HttpResponse {
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
