//! Message-level encoding: line ending, MLLP framing, and a buffered streaming writer.
//!
//! Segment/field encoding itself lives on `Segment`/`Field` (`encode_opts`);
//! this module adds the options a caller configures once per transport:
//! which line ending to join segments with, whether to wrap the result in
//! MLLP framing, and whether to keep trailing empty delimiters.

use std::io::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::message::Message;

const START_OF_BLOCK: u8 = 0x0B;
const END_OF_BLOCK: u8 = 0x1C;
const CARRIAGE_RETURN: u8 = 0x0D;

/// Segment separator emitted between encoded segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `\r` (the HL7 standard)
    #[default]
    Cr,
    /// `\n`
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Cr => "\r",
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Encoder options
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Segment separator. Default: CR.
    pub line_ending: LineEnding,
    /// Wrap the encoded message in MLLP framing (`0x0B` ... `0x1C 0x0D`).
    /// Default: false.
    pub include_mllp: bool,
    /// Keep trailing empty fields/components/subcomponents instead of
    /// eliding them. Default: false (elide).
    pub trailing_delimiters: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::Cr,
            include_mllp: false,
            trailing_delimiters: false,
        }
    }
}

impl EncoderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    pub fn with_mllp(mut self, include: bool) -> Self {
        self.include_mllp = include;
        self
    }

    pub fn with_trailing_delimiters(mut self, trailing: bool) -> Self {
        self.trailing_delimiters = trailing;
        self
    }
}

/// Encodes `Message`s to bytes per an `EncoderConfig`.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    config: EncoderConfig,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Encode a message to bytes.
    pub fn encode(&self, message: &Message) -> Result<Vec<u8>> {
        if message.segments.is_empty() {
            return Err(Error::encode("cannot encode a message with no segments"));
        }

        let body = message
            .segments
            .iter()
            .map(|s| s.encode_opts(&message.delimiters, self.config.trailing_delimiters))
            .collect::<Vec<_>>()
            .join(self.config.line_ending.as_str());

        let mut out = Vec::with_capacity(body.len() + 3);
        if self.config.include_mllp {
            out.push(START_OF_BLOCK);
        }
        out.extend_from_slice(body.as_bytes());
        if self.config.include_mllp {
            out.push(END_OF_BLOCK);
            out.push(CARRIAGE_RETURN);
        }
        Ok(out)
    }

    /// Encode a message directly to a writer.
    pub fn encode_to_writer<W: std::io::Write>(&self, writer: &mut W, message: &Message) -> Result<()> {
        let bytes = self.encode(message)?;
        writer.write_all(&bytes).map_err(Error::from)
    }
}

/// Buffered streaming writer over an `io::Write`. Writes are serialized
/// behind a mutex so the writer can be shared across callers. `close`
/// flushes once; `write`/`flush` after close fail with "writer is closed".
pub struct Writer<W> {
    inner: Mutex<W>,
    encoder: Encoder,
    closed: AtomicBool,
}

impl<W: std::io::Write> Writer<W> {
    pub fn new(inner: W) -> Self {
        Self::with_config(inner, EncoderConfig::default())
    }

    pub fn with_config(inner: W, config: EncoderConfig) -> Self {
        Self {
            inner: Mutex::new(inner),
            encoder: Encoder::with_config(config),
            closed: AtomicBool::new(false),
        }
    }

    /// Encode and write a message.
    pub fn write(&self, message: &Message) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::encode("writer is closed"));
        }
        let bytes = self.encoder.encode(message)?;
        let mut inner = self.inner.lock().expect("writer mutex poisoned");
        inner.write_all(&bytes).map_err(Error::from)
    }

    /// Flush the underlying writer.
    pub fn flush(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::encode("writer is closed"));
        }
        let mut inner = self.inner.lock().expect("writer mutex poisoned");
        inner.flush().map_err(Error::from)
    }

    /// Flush once and mark the writer closed. A second call fails, since
    /// the writer is already closed.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(Error::encode("writer is closed"));
        }
        let mut inner = self.inner.lock().expect("writer mutex poisoned");
        inner.flush().map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Field, Segment};

    fn sample_message() -> Message {
        let mut msg = Message::new();
        let mut msh = Segment::new("MSH");
        msh.add_field(Field::from_value("|"));
        msh.add_field(Field::from_value("^~\\&"));
        msh.add_field(Field::from_value("SendApp"));
        msg.add_segment(msh);

        let mut pid = Segment::new("PID");
        pid.add_field(Field::from_value("1"));
        pid.add_field(Field::from_value("12345"));
        pid.add_field(Field::from_value(""));
        pid.add_field(Field::from_value(""));
        msg.add_segment(pid);
        msg
    }

    #[test]
    fn test_default_elides_trailing_delimiters() {
        let encoder = Encoder::new();
        let bytes = encoder.encode(&sample_message()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let pid_line = text.split('\r').nth(1).unwrap();
        assert_eq!(pid_line, "PID|1|12345");
    }

    #[test]
    fn test_trailing_delimiters_kept_when_enabled() {
        let config = EncoderConfig::new().with_trailing_delimiters(true);
        let encoder = Encoder::with_config(config);
        let bytes = encoder.encode(&sample_message()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let pid_line = text.split('\r').nth(1).unwrap();
        assert_eq!(pid_line, "PID|1|12345||");
    }

    #[test]
    fn test_mllp_framing() {
        let config = EncoderConfig::new().with_mllp(true);
        let encoder = Encoder::with_config(config);
        let bytes = encoder.encode(&sample_message()).unwrap();
        assert_eq!(bytes[0], START_OF_BLOCK);
        assert_eq!(bytes[bytes.len() - 2], END_OF_BLOCK);
        assert_eq!(bytes[bytes.len() - 1], CARRIAGE_RETURN);
    }

    #[test]
    fn test_line_ending() {
        let config = EncoderConfig::new().with_line_ending(LineEnding::Lf);
        let encoder = Encoder::with_config(config);
        let bytes = encoder.encode(&sample_message()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains('\n'));
        assert!(!text.contains('\r'));
    }

    #[test]
    fn test_empty_message_is_an_error() {
        let encoder = Encoder::new();
        assert!(encoder.encode(&Message::new()).is_err());
    }

    #[test]
    fn test_writer_rejects_writes_after_close() {
        let writer = Writer::new(Vec::new());
        writer.write(&sample_message()).unwrap();
        writer.close().unwrap();
        assert!(writer.write(&sample_message()).is_err());
        assert!(writer.flush().is_err());
        assert!(writer.close().is_err());
    }
}
