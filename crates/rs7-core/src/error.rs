//! Error types for HL7 message processing
//!
//! The taxonomy below gives callers stable discriminants to branch on:
//! missing-data errors (`NotFound`) are recoverable and semantic, parsing and
//! encoding errors carry positional context where available, and the framing
//! and transport variants exist for the MLLP layer.

use thiserror::Error;

/// Result type alias for rs7 operations
pub type Result<T> = std::result::Result<T, Error>;

/// The kind of element that was missing from the message tree
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundKind {
    #[error("segment not found")]
    SegmentNotFound,
    #[error("field not found")]
    FieldNotFound,
    #[error("component not found")]
    ComponentNotFound,
    #[error("subcomponent not found")]
    SubComponentNotFound,
}

/// MLLP frame boundary violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FramingErrorKind {
    #[error("invalid start block")]
    InvalidStartBlock,
    #[error("invalid end block")]
    InvalidEndBlock,
    #[error("message exceeds maximum size")]
    MessageTooLarge,
    #[error("connection closed mid-message")]
    ConnectionClosed,
}

/// Transport-level failures (dial, timeout, server lifecycle)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportErrorKind {
    #[error("dial failed: {0}")]
    DialFailed(String),
    #[error("read timeout")]
    ReadTimeout,
    #[error("write timeout")]
    WriteTimeout,
    #[error("no handler configured")]
    HandlerAbsent,
    #[error("server closed")]
    ServerClosed,
    #[error("maximum connections reached")]
    MaxConnectionsReached,
}

/// Main error type for the rs7 library
#[derive(Error, Debug)]
pub enum Error {
    /// An accessor addressed a location that does not exist in the tree
    #[error("not found: {kind} at '{path}'")]
    NotFound { kind: NotFoundKind, path: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("framing error: {0}")]
    Framing(FramingErrorKind),

    #[error("transport error: {0}")]
    Transport(TransportErrorKind),

    #[error("invalid delimiter configuration: {0}")]
    InvalidDelimiters(String),

    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("invalid segment: {0}")]
    InvalidSegment(String),

    #[error("invalid field access: {0}")]
    InvalidFieldAccess(String),

    #[error("missing required field: {0}")]
    MissingRequiredField(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported version: {0}")]
    UnsupportedVersion(String),

    #[error("message type error: {0}")]
    MessageType(String),

    #[error("decoding error: {0}")]
    Decoding(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("location path error: {0}")]
    PathError(String),

    #[error("unknown error: {0}")]
    Unknown(String),
}

impl Error {
    /// Create a parse error
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Error::Parse(msg.into())
    }

    /// Create an encode error
    pub fn encode<S: Into<String>>(msg: S) -> Self {
        Error::Encode(msg.into())
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Error::Validation(msg.into())
    }

    /// Create a location path parse error
    pub fn path_error<S: Into<String>>(msg: S) -> Self {
        Error::PathError(msg.into())
    }

    /// Create a not-found error for the given path
    pub fn not_found<S: Into<String>>(kind: NotFoundKind, path: S) -> Self {
        Error::NotFound {
            kind,
            path: path.into(),
        }
    }

    /// Create a framing error
    pub fn framing(kind: FramingErrorKind) -> Self {
        Error::Framing(kind)
    }

    /// Create a transport error
    pub fn transport(kind: TransportErrorKind) -> Self {
        Error::Transport(kind)
    }

    /// True if this error represents a missing tree element (recoverable, semantic)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
