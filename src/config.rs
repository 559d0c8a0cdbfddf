use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::http::message::{DEFAULT_PROTOCOL_VERSION, Message};
use crate::http::response::HttpResponse;
use crate::http::status::HttpStatus;
use crate::http::{self, HttpMessage};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to deserialize config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Defaults applied to messages built from configuration.
///
/// ```toml
/// protocol_version = "1.0"
/// server_name = "rustynet/0.1"
///
/// [default_headers]
/// Cache-Control = "no-store"
/// X-Retry-After = 30
/// Vary = ["Accept", "Accept-Encoding"]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    pub protocol_version: String,
    pub server_name: Option<String>,

    /// Raw header table; run through the same filtering as message
    /// construction, so strings, numbers and arrays of those are accepted.
    pub default_headers: IndexMap<String, Value>,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(),
            server_name: None,
            default_headers: IndexMap::new(),
        }
    }
}

impl MessageConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str::<MessageConfig>(content)?)
    }

    pub fn try_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded message config");
        Ok(config)
    }

    /// Loads `path`, falling back to the default config when the file cannot
    /// be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        match Self::try_from_file(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "falling back to default message config");
                MessageConfig::default()
            }
        }
    }

    /// A new message carrying the configured version and default headers.
    pub fn message(&self) -> Result<Message, http::Error> {
        Message::from_parts(
            Some(self.protocol_version.as_str()),
            None,
            self.default_headers
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        )
    }

    /// A new response with `status`, built on [`MessageConfig::message`] and
    /// tagged with the `Server` header when a server name is configured.
    pub fn response(&self, status: HttpStatus) -> Result<HttpResponse, http::Error> {
        let response = HttpResponse::from_message(status, self.message()?);
        match &self.server_name {
            Some(name) => response.with_header("Server", name),
            None => Ok(response),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full() {
        let config = MessageConfig::from_toml_str(
            r#"
protocol_version = "1.0"
server_name = "rustynet/0.1"

[default_headers]
Cache-Control = "no-store"
X-Retry-After = 30
Vary = ["Accept", "Accept-Encoding"]
"#,
        )
        .unwrap();

        let m = config.message().unwrap();
        assert_eq!(m.protocol_version(), "1.0");
        assert_eq!(
            m.headers().keys().collect::<Vec<_>>(),
            ["Cache-Control", "X-Retry-After", "Vary"]
        );
        assert_eq!(m.header("x-retry-after"), ["30"]);
        assert_eq!(m.header_line("vary"), "Accept,Accept-Encoding");
    }

    #[test]
    fn parse_empty_uses_defaults() {
        let config = MessageConfig::from_toml_str("").unwrap();
        assert_eq!(config.protocol_version, "1.1");
        assert!(config.message().unwrap().headers().is_empty());
    }

    #[test]
    fn invalid_header_types_are_rejected_on_build() {
        let config = MessageConfig::from_toml_str("[default_headers]\nX-Flag = true\n").unwrap();
        assert_eq!(
            config.message().unwrap_err(),
            http::Error::InvalidHeaderValueType("X-Flag".to_string())
        );
    }

    #[test]
    fn response_carries_server_name() {
        let config = MessageConfig {
            server_name: Some("rustynet/0.1".to_string()),
            ..MessageConfig::default()
        };

        let r = config.response(HttpStatus::NOT_FOUND).unwrap();
        assert_eq!(r.status(), HttpStatus::NOT_FOUND);
        assert_eq!(r.header_line("server"), "rustynet/0.1");
    }

    #[test]
    fn missing_file_falls_back() {
        let err = MessageConfig::try_from_file("/nonexistent/rustynet.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert_eq!(MessageConfig::from_file("/nonexistent/rustynet.toml").protocol_version, "1.1");
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            MessageConfig::from_toml_str("protocol_version = ["),
            Err(ConfigError::Parse(_))
        ));
    }
}
