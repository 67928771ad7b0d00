//! MLLP frame markers and in-memory framing helpers.
//!
//! Format: `<VT>` body `<FS><CR>`
//! - VT (Vertical Tab, `0x0B`): start of block
//! - FS (File Separator, `0x1C`): end of block
//! - CR (Carriage Return, `0x0D`): end of message

use rs7_core::error::{Error, FramingErrorKind, Result};

/// Start-of-block marker.
pub const START_OF_BLOCK: u8 = 0x0B;
/// End-of-block marker.
pub const END_OF_BLOCK: u8 = 0x1C;
/// Trailing carriage return that closes a frame.
pub const CARRIAGE_RETURN: u8 = 0x0D;

/// Default maximum message body size (16 MiB). Bounds Reader buffering.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Framing helpers for callers that already hold a complete buffer in memory
/// (tests, non-streaming transports). The streaming path uses
/// [`crate::reader::MllpReader`] and [`crate::writer::write_message`] instead.
pub struct MllpFrame;

impl MllpFrame {
    /// Wrap a message body in MLLP framing.
    pub fn wrap(body: &[u8]) -> Vec<u8> {
        let mut framed = Vec::with_capacity(body.len() + 3);
        framed.push(START_OF_BLOCK);
        framed.extend_from_slice(body);
        framed.push(END_OF_BLOCK);
        framed.push(CARRIAGE_RETURN);
        framed
    }

    /// Recover the message body from a complete MLLP frame.
    pub fn unwrap(framed: &[u8]) -> Result<&[u8]> {
        if framed.is_empty() || framed[0] != START_OF_BLOCK {
            return Err(Error::framing(FramingErrorKind::InvalidStartBlock));
        }
        if framed.len() < 3 {
            return Err(Error::framing(FramingErrorKind::InvalidEndBlock));
        }
        let end_pos = framed.len() - 2;
        if framed[end_pos] != END_OF_BLOCK || framed[framed.len() - 1] != CARRIAGE_RETURN {
            return Err(Error::framing(FramingErrorKind::InvalidEndBlock));
        }
        Ok(&framed[1..end_pos])
    }
}
