//! MLLP (Minimal Lower Layer Protocol) support
//!
//! MLLP is the framing protocol used to transmit HL7 v2.x messages over TCP.
//! Format: `<VT>` body `<FS><CR>`
//! - VT (Vertical Tab): `0x0B` - start of block
//! - FS (File Separator): `0x1C` - end of block
//! - CR (Carriage Return): `0x0D` - end of message
//!
//! [`MllpReader`]/[`write_message`] implement the streaming framing state
//! machine; [`MllpClient`] and [`MllpServer`] build a request/response
//! transport on top of it.

pub mod client;
pub mod frame;
pub mod reader;
pub mod server;
pub mod stream;
#[cfg(feature = "tls")]
pub mod tls;
#[cfg(feature = "testing")]
pub mod testing;
pub mod writer;

pub use client::{ClientConfig, MllpClient};
pub use frame::{MllpFrame, CARRIAGE_RETURN, DEFAULT_MAX_MESSAGE_SIZE, END_OF_BLOCK, START_OF_BLOCK};
pub use reader::MllpReader;
pub use server::{Handler, MllpServer, ServerConfig, ServerShutdown};
pub use stream::MllpStream;
pub use writer::write_message;
