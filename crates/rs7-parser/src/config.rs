//! Parser configuration for lenient/strict parsing modes
//!
//! This module provides configurable parsing behavior to handle real-world
//! HL7 messages that may not strictly conform to the specification.
//!
//! # Overview
//!
//! In production environments, HL7 messages often have issues:
//! - Trailing delimiters at the end of segments
//! - Non-standard segment IDs (2 or 4+ characters)
//! - Missing or malformed encoding characters
//! - Invalid escape sequences
//!
//! The `ParserConfig` allows you to choose between strict (spec-compliant)
//! and lenient (real-world tolerant) parsing.
//!
//! # Examples
//!
//! ```rust
//! use rs7_parser::{ParserConfig, parse_message_with_config};
//!
//! // Lenient mode (default) - tolerates common real-world deviations
//! let lenient = ParserConfig::lenient();
//!
//! // Strict mode - fails on non-compliant messages
//! let strict = ParserConfig::strict();
//!
//! // Custom configuration
//! let custom = ParserConfig::new()
//!     .allow_trailing_delimiters(true)
//!     .allow_non_standard_segment_ids(true)
//!     .strip_trailing_whitespace(true);
//!
//! let message_text = "MSH|^~\\&|App|Fac|||20240315||ADT^A01|123|P|2.5|\r";
//! let result = parse_message_with_config(message_text, &lenient);
//! ```

/// Segment terminator recognized between records.
///
/// Parsing always accepts CR, LF, and CRLF-as-one-boundary regardless of
/// this setting; it exists so the encoder and parser can agree on the
/// preferred form for round-tripping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentTerminator {
    /// `\r` (the HL7 standard)
    #[default]
    Cr,
    /// `\n`
    Lf,
    /// `\r\n`
    CrLf,
}

/// Configuration options for the HL7 parser
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Use a fixed delimiter set instead of deriving one from MSH-1/MSH-2.
    /// Intended for non-standard senders whose MSH cannot be trusted.
    /// Default: `None` (derive from MSH).
    pub custom_delimiters: Option<rs7_core::Delimiters>,

    /// The segment terminator this configuration prefers on encode.
    /// Default: CR.
    pub segment_terminator: SegmentTerminator,
    /// Allow trailing field delimiters at the end of segments
    ///
    /// When true, "PID|1|2|3|" is equivalent to "PID|1|2|3"
    /// Default: false (strict)
    pub allow_trailing_delimiters: bool,

    /// Allow segment IDs that are not exactly 3 characters
    ///
    /// Standard HL7 segment IDs are 3 characters (e.g., MSH, PID, OBX).
    /// Some systems use 2-character IDs or Z-segments with more characters.
    /// Default: false (strict)
    pub allow_non_standard_segment_ids: bool,

    /// Strip trailing whitespace from segment lines
    ///
    /// When true, "PID|1|2  \r" is parsed as "PID|1|2"
    /// Default: true
    pub strip_trailing_whitespace: bool,

    /// Strip leading whitespace from segment lines
    ///
    /// When true, "  PID|1|2" is parsed as "PID|1|2"
    /// Default: false
    pub strip_leading_whitespace: bool,

    /// Allow non-standard encoding characters in MSH-2
    ///
    /// Standard encoding characters are "^~\&" (4 characters).
    /// Some systems may use different or fewer characters.
    /// Default: false (strict)
    pub allow_non_standard_encoding_chars: bool,

    /// Preserve invalid escape sequences as literal text
    ///
    /// When true, "\X" (invalid escape) is kept as "\X"
    /// When false, invalid escapes cause an error
    /// Default: false (strict)
    pub preserve_invalid_escapes: bool,

    /// Allow empty segment ID
    ///
    /// When true, lines starting with "|" are skipped
    /// When false, such lines cause an error
    /// Default: false (strict)
    pub allow_empty_segment_id: bool,

    /// Skip blank lines in the message
    ///
    /// When true, blank lines between segments are ignored
    /// When false, blank lines may cause errors
    /// Default: true
    pub skip_blank_lines: bool,

    /// Maximum field length (0 = unlimited)
    ///
    /// Truncate fields exceeding this length. Useful for preventing
    /// memory issues with malformed messages.
    /// Default: 0 (unlimited)
    pub max_field_length: usize,

    /// Maximum number of repetitions per field (0 = unlimited)
    ///
    /// Default: 0 (unlimited)
    pub max_repetitions: usize,

    /// Maximum number of segments per message (0 = unlimited)
    ///
    /// Default: 0 (unlimited)
    pub max_segments: usize,

    /// Continue parsing after encountering an error
    ///
    /// When true, errors are collected but parsing continues
    /// When false, parsing stops at the first error
    /// Default: false
    pub continue_on_error: bool,

    /// Validate segment IDs against known HL7 segments
    ///
    /// When true, unknown segment IDs cause a warning (not error)
    /// When false, any 3-character ID is accepted
    /// Default: false
    pub validate_segment_ids: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::lenient()
    }
}

impl ParserConfig {
    /// Create a new parser config with the default lenient settings
    pub fn new() -> Self {
        Self::lenient()
    }

    /// Create a strict parser configuration
    ///
    /// Opt-in; rejects non-standard segment IDs, invalid escape sequences,
    /// and trailing delimiters instead of tolerating them.
    pub fn strict() -> Self {
        Self {
            custom_delimiters: None,
            segment_terminator: SegmentTerminator::Cr,
            allow_trailing_delimiters: false,
            allow_non_standard_segment_ids: false,
            strip_trailing_whitespace: true,
            strip_leading_whitespace: false,
            allow_non_standard_encoding_chars: false,
            preserve_invalid_escapes: false,
            allow_empty_segment_id: false,
            skip_blank_lines: true,
            max_field_length: 65_536,
            max_repetitions: 0,
            max_segments: 1_000,
            continue_on_error: false,
            validate_segment_ids: false,
        }
    }

    /// Create a lenient parser configuration
    ///
    /// This is the default. It tolerates common real-world deviations from
    /// the HL7 specification (non-standard segment IDs, trailing delimiters,
    /// unrecognized escape sequences) rather than rejecting them, since most
    /// inbound traffic is well-formed-but-not-strictly-compliant rather than
    /// malicious.
    pub fn lenient() -> Self {
        Self {
            custom_delimiters: None,
            segment_terminator: SegmentTerminator::Cr,
            allow_trailing_delimiters: true,
            allow_non_standard_segment_ids: true,
            strip_trailing_whitespace: true,
            strip_leading_whitespace: true,
            allow_non_standard_encoding_chars: true,
            preserve_invalid_escapes: true,
            allow_empty_segment_id: true,
            skip_blank_lines: true,
            max_field_length: 65_536,
            max_repetitions: 0,
            max_segments: 1_000,
            continue_on_error: true,
            validate_segment_ids: false,
        }
    }

    /// Force a fixed delimiter set, skipping MSH-based detection entirely.
    /// Intended for non-standard senders whose MSH cannot be trusted.
    pub fn custom_delimiters(mut self, delimiters: rs7_core::Delimiters) -> Self {
        self.custom_delimiters = Some(delimiters);
        self
    }

    /// Set the preferred segment terminator
    pub fn segment_terminator(mut self, terminator: SegmentTerminator) -> Self {
        self.segment_terminator = terminator;
        self
    }

    /// Set whether to allow trailing delimiters
    pub fn allow_trailing_delimiters(mut self, allow: bool) -> Self {
        self.allow_trailing_delimiters = allow;
        self
    }

    /// Set whether to allow non-standard segment IDs
    pub fn allow_non_standard_segment_ids(mut self, allow: bool) -> Self {
        self.allow_non_standard_segment_ids = allow;
        self
    }

    /// Set whether to strip trailing whitespace
    pub fn strip_trailing_whitespace(mut self, strip: bool) -> Self {
        self.strip_trailing_whitespace = strip;
        self
    }

    /// Set whether to strip leading whitespace
    pub fn strip_leading_whitespace(mut self, strip: bool) -> Self {
        self.strip_leading_whitespace = strip;
        self
    }

    /// Set whether to allow non-standard encoding characters
    pub fn allow_non_standard_encoding_chars(mut self, allow: bool) -> Self {
        self.allow_non_standard_encoding_chars = allow;
        self
    }

    /// Set whether to preserve invalid escape sequences
    pub fn preserve_invalid_escapes(mut self, preserve: bool) -> Self {
        self.preserve_invalid_escapes = preserve;
        self
    }

    /// Set whether to allow empty segment IDs
    pub fn allow_empty_segment_id(mut self, allow: bool) -> Self {
        self.allow_empty_segment_id = allow;
        self
    }

    /// Set whether to skip blank lines
    pub fn skip_blank_lines(mut self, skip: bool) -> Self {
        self.skip_blank_lines = skip;
        self
    }

    /// Set maximum field length (0 = unlimited)
    pub fn max_field_length(mut self, max: usize) -> Self {
        self.max_field_length = max;
        self
    }

    /// Set maximum repetitions per field (0 = unlimited)
    pub fn max_repetitions(mut self, max: usize) -> Self {
        self.max_repetitions = max;
        self
    }

    /// Set maximum segments per message (0 = unlimited)
    pub fn max_segments(mut self, max: usize) -> Self {
        self.max_segments = max;
        self
    }

    /// Set whether to continue parsing after errors
    pub fn continue_on_error(mut self, continue_on: bool) -> Self {
        self.continue_on_error = continue_on;
        self
    }

    /// Set whether to validate segment IDs
    pub fn validate_segment_ids(mut self, validate: bool) -> Self {
        self.validate_segment_ids = validate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_config() {
        let config = ParserConfig::strict();

        assert!(!config.allow_trailing_delimiters);
        assert!(!config.allow_non_standard_segment_ids);
        assert!(config.strip_trailing_whitespace);
        assert!(!config.strip_leading_whitespace);
        assert!(!config.allow_non_standard_encoding_chars);
        assert!(!config.preserve_invalid_escapes);
        assert!(!config.continue_on_error);
    }

    #[test]
    fn test_lenient_config() {
        let config = ParserConfig::lenient();

        assert!(config.allow_trailing_delimiters);
        assert!(config.allow_non_standard_segment_ids);
        assert!(config.strip_trailing_whitespace);
        assert!(config.strip_leading_whitespace);
        assert!(config.allow_non_standard_encoding_chars);
        assert!(config.preserve_invalid_escapes);
        assert!(config.continue_on_error);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ParserConfig::new()
            .allow_trailing_delimiters(true)
            .max_field_length(1000)
            .max_segments(100);

        assert!(config.allow_trailing_delimiters);
        assert_eq!(config.max_field_length, 1000);
        assert_eq!(config.max_segments, 100);
    }

}
