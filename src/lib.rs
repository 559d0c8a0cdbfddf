//! Immutable HTTP messages.
//!
//! A [`Message`] holds a protocol version, case-insensitive multi-valued
//! headers and a shared body stream. It is never modified in place: every
//! `with_*` operation validates its input and returns a new message.
//!
//! ```
//! use rustynet_message::Message;
//!
//! let m = Message::new()
//!     .with_header("X-Foo", "Foo")?
//!     .with_added_header("x-foo", "Bar")?;
//!
//! assert_eq!(m.header_line("X-FOO"), "Foo,Bar");
//! assert!(m.with_header("X-Foo", "value\r\ninjection").is_err());
//! # Ok::<(), rustynet_message::Error>(())
//! ```
//!
//! [`HttpRequest`] and [`HttpResponse`] embed a message and expose the same
//! operations through the [`HttpMessage`] trait.

pub mod config;
pub mod http;
pub mod stream;

pub use config::{ConfigError, MessageConfig};
pub use http::request::HttpRequest;
pub use http::response::HttpResponse;
pub use http::status::HttpStatus;
pub use http::{Error, HeaderValues, HttpHeaders, HttpMessage, HttpMethod, Message};
pub use stream::{Body, MemoryStream, Stream};
