//! Body stream abstraction.
//!
//! A [`Message`](crate::http::Message) never owns its body: it holds a
//! [`Body`], a shared reference to some [`Stream`] implementation, and hands
//! the same reference to every message derived from it. Access control and
//! lifecycle belong to the stream itself, which is why every method takes
//! `&self`.

use std::fmt;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::sync::{Arc, Mutex, MutexGuard};

pub type Body = Arc<dyn Stream>;

pub trait Stream: fmt::Debug + Send + Sync {
    fn read(&self, buf: &mut [u8]) -> io::Result<usize>;

    fn write(&self, buf: &[u8]) -> io::Result<usize>;

    fn seek(&self, pos: SeekFrom) -> io::Result<u64>;

    /// Total size in bytes, if known.
    fn size(&self) -> Option<u64>;

    fn rewind(&self) -> io::Result<()> {
        self.seek(SeekFrom::Start(0)).map(|_| ())
    }

    /// Rewinds and reads the whole stream as UTF-8.
    fn contents(&self) -> io::Result<String> {
        self.rewind()?;

        let mut out = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            match self.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => out.extend_from_slice(&buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        String::from_utf8(out).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// In-memory read/write stream, the default body of a new message.
#[derive(Debug, Default)]
pub struct MemoryStream {
    inner: Mutex<Cursor<Vec<u8>>>,
}

impl MemoryStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream positioned at the start of `bytes`.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            inner: Mutex::new(Cursor::new(bytes.into())),
        }
    }

    /// Empty in-memory stream behind a [`Body`] reference.
    pub fn body() -> Body {
        Arc::new(Self::new())
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, Cursor<Vec<u8>>>> {
        self.inner
            .lock()
            .map_err(|_| io::Error::other("memory stream lock poisoned"))
    }
}

impl Stream for MemoryStream {
    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        self.lock()?.read(buf)
    }

    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        self.lock()?.write(buf)
    }

    fn seek(&self, pos: SeekFrom) -> io::Result<u64> {
        self.lock()?.seek(pos)
    }

    fn size(&self) -> Option<u64> {
        self.lock().ok().map(|c| c.get_ref().len() as u64)
    }
}
