//! # rs7 - HL7 v2.x Library for Rust
//!
//! Parsing, in-memory message manipulation, and MLLP network transport for
//! HL7 v2.x healthcare messages.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs7::parser::parse_message;
//!
//! let hl7 = "MSH|^~\\&|SendApp|SendFac|RecApp|RecFac|20240315||ADT^A01|12345|P|2.5\r\
//!            PID|1|12345|67890^^^MRN|DOE^JOHN^A||19800101|M";
//!
//! let message = parse_message(hl7).unwrap();
//! let family_name = message.get("PID.5.1").unwrap();
//! assert_eq!(family_name, "DOE");
//! ```

pub use rs7_core as core;
pub use rs7_mllp as mllp;
pub use rs7_parser as parser;

pub use rs7_core::{
    delimiters::Delimiters,
    encoding::Encoding,
    error::{Error, Result},
    field::{Component, Field, Repetition, SubComponent},
    message::Message,
    segment::Segment,
    Version,
};
