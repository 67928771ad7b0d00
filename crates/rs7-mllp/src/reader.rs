//! Streaming MLLP reader: a Seeking/InMessage state machine over an
//! `AsyncRead` byte source.

use rs7_core::error::{Error, FramingErrorKind, Result};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::frame::{CARRIAGE_RETURN, DEFAULT_MAX_MESSAGE_SIZE, END_OF_BLOCK, START_OF_BLOCK};

/// Reads one MLLP-framed message at a time off a byte stream.
///
/// Bytes observed before the first start-of-block marker are silently
/// discarded (this absorbs TCP keep-alive filler). Once inside a message,
/// bytes accumulate into a bounded buffer until a genuine end-of-block +
/// carriage-return pair is seen.
pub struct MllpReader<R> {
    inner: R,
    max_size: usize,
}

impl<R: AsyncRead + Unpin> MllpReader<R> {
    /// Create a reader with the default 16 MiB size bound.
    pub fn new(inner: R) -> Self {
        Self::with_max_size(inner, DEFAULT_MAX_MESSAGE_SIZE)
    }

    /// Create a reader that refuses message bodies larger than `max_size`.
    pub fn with_max_size(inner: R, max_size: usize) -> Self {
        Self { inner, max_size }
    }

    /// Consume the reader, returning the underlying stream.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Read one framed message body (without the `0x0B`/`0x1C 0x0D` wrapper).
    pub async fn read_message(&mut self) -> Result<Vec<u8>> {
        let mut byte = [0u8; 1];

        // Seeking: discard bytes until the start block.
        loop {
            let n = self.inner.read(&mut byte).await.map_err(Error::Io)?;
            if n == 0 {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "connection closed before start of block",
                )));
            }
            if byte[0] == START_OF_BLOCK {
                break;
            }
        }

        // InMessage: accumulate until a real end-block + CR pair.
        let mut buf = Vec::new();
        loop {
            let n = self.inner.read(&mut byte).await.map_err(Error::Io)?;
            if n == 0 {
                return Err(Error::framing(FramingErrorKind::ConnectionClosed));
            }

            if byte[0] != END_OF_BLOCK {
                self.push(&mut buf, &[byte[0]])?;
                continue;
            }

            let mut next = [0u8; 1];
            let n2 = self.inner.read(&mut next).await.map_err(Error::Io)?;
            if n2 == 0 {
                return Err(Error::framing(FramingErrorKind::ConnectionClosed));
            }

            if next[0] == CARRIAGE_RETURN {
                return Ok(buf);
            }

            // Not a real terminator: both bytes are ordinary data.
            self.push(&mut buf, &[byte[0], next[0]])?;
        }
    }

    fn push(&self, buf: &mut Vec<u8>, bytes: &[u8]) -> Result<()> {
        if buf.len() + bytes.len() > self.max_size {
            return Err(Error::framing(FramingErrorKind::MessageTooLarge));
        }
        buf.extend_from_slice(bytes);
        Ok(())
    }
}
