//! Streaming MLLP writer: frames a single message body onto an `AsyncWrite`
//! sink. Holds no framing state of its own; repeated calls just concatenate
//! frames on the underlying stream.

use rs7_core::error::{Error, Result};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::frame::{CARRIAGE_RETURN, END_OF_BLOCK, START_OF_BLOCK};

/// Write one MLLP-framed message (`0x0B` + body + `0x1C` + `0x0D`).
pub async fn write_message<W: AsyncWrite + Unpin>(writer: &mut W, body: &[u8]) -> Result<()> {
    writer.write_u8(START_OF_BLOCK).await.map_err(Error::Io)?;
    writer.write_all(body).await.map_err(Error::Io)?;
    writer.write_u8(END_OF_BLOCK).await.map_err(Error::Io)?;
    writer.write_u8(CARRIAGE_RETURN).await.map_err(Error::Io)?;
    writer.flush().await.map_err(Error::Io)?;
    Ok(())
}
