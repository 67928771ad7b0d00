//! HL7 message parser
//!
//! Turns raw bytes or text into a [`Message`] tree. Two entry points:
//! [`parse_message`]/[`parse`] use the default lenient, real-world tolerant
//! configuration; [`parse_message_with_config`]/[`parse_with_config`] take an
//! explicit [`ParserConfig`] (e.g. [`ParserConfig::strict`]) for callers that
//! need specification-strict rejection of non-compliant messages.

pub mod config;

pub use config::{ParserConfig, SegmentTerminator};

use rs7_core::{
    delimiters::Delimiters,
    encoding::Encoding,
    error::Error,
    field::{Component, Field, Repetition, SubComponent},
    message::Message,
    segment::Segment,
    Result,
};

/// Parse a complete HL7 message from bytes, using the default lenient configuration.
pub fn parse(bytes: &[u8]) -> Result<Message> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::parse(format!("message is not valid UTF-8: {}", e)))?;
    parse_message(text)
}

/// Parse a complete HL7 message from bytes, using an explicit configuration.
pub fn parse_with_config(bytes: &[u8], config: &ParserConfig) -> Result<Message> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::parse(format!("message is not valid UTF-8: {}", e)))?;
    parse_message_with_config(text, config)
}

/// Parse a complete HL7 message from a string, using the default lenient configuration.
pub fn parse_message(input: &str) -> Result<Message> {
    parse_message_with_config(input, &ParserConfig::default())
}

/// Parse a complete HL7 message from a string, using an explicit configuration.
pub fn parse_message_with_config(input: &str, config: &ParserConfig) -> Result<Message> {
    tracing::trace!(bytes = input.len(), "parsing message");

    let mut input = input;
    if config.strip_leading_whitespace {
        input = input.trim_start();
    }
    if config.strip_trailing_whitespace {
        input = input.trim_end();
    }

    let input = if !input.starts_with("MSH") {
        // Non-strict mode discards leading noise before a detected MSH;
        // strict mode always requires MSH to be first.
        match input.find("MSH") {
            Some(offset) if !is_strict(config) => &input[offset..],
            _ => return Err(Error::parse("Message must start with MSH segment")),
        }
    } else {
        input
    };

    let delimiters = match config.custom_delimiters {
        Some(d) => d,
        None => extract_delimiters(input)?,
    };

    let segment_strings = split_segments(input, config);

    if segment_strings.is_empty() {
        return Err(Error::parse("Empty message"));
    }

    if config.max_segments > 0 && segment_strings.len() > config.max_segments {
        return Err(Error::parse(format!(
            "message has {} segments, exceeding the configured limit of {}",
            segment_strings.len(),
            config.max_segments
        )));
    }

    let mut message = Message::with_delimiters(delimiters);

    for (idx, seg_str) in segment_strings.iter().enumerate() {
        if seg_str.is_empty() {
            if config.skip_blank_lines {
                continue;
            }
            return Err(Error::parse(format!("blank segment at record {}", idx)));
        }

        let segment = if idx == 0 {
            parse_msh_segment(seg_str, &delimiters, config)?
        } else {
            parse_segment(seg_str, &delimiters, config)?
        };
        message.add_segment(segment);
    }

    if is_strict(config) {
        validate_required_msh_fields(&message)?;
    }

    tracing::debug!(
        segments = message.all_segments().len(),
        control_id = ?message.get_control_id(),
        "message parsed"
    );

    Ok(message)
}

/// In this configuration model there is no single `strictMode` switch;
/// strictness is the conjunction of the individual strict-mode checks.
/// A configuration built from [`ParserConfig::strict`] (the default) is
/// strict; anything derived from [`ParserConfig::lenient`] is not.
fn is_strict(config: &ParserConfig) -> bool {
    !config.continue_on_error && !config.preserve_invalid_escapes && !config.allow_non_standard_segment_ids
}

/// Split a message into segment records on CR, LF, or CRLF (treated as a
/// single boundary); a trailing empty record is ignored.
fn split_segments<'a>(input: &'a str, _config: &ParserConfig) -> Vec<&'a str> {
    let mut records = Vec::new();
    let bytes = input.as_bytes();
    let mut start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                records.push(&input[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            b'\n' => {
                records.push(&input[start..i]);
                i += 1;
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < input.len() {
        records.push(&input[start..]);
    }
    records
}

/// Extract delimiters from the MSH segment
///
/// MSH format: MSH|^~\&|...
/// Position 3 is field separator (|)
/// Positions 4-7 are encoding characters (^~\&)
fn extract_delimiters(input: &str) -> Result<Delimiters> {
    if !input.starts_with("MSH") {
        return Err(Error::parse("Message must start with MSH segment"));
    }

    if input.len() < 8 {
        return Err(Error::parse("MSH segment too short"));
    }

    let field_sep = input
        .chars()
        .nth(3)
        .ok_or_else(|| Error::parse("Cannot extract field separator"))?;

    let encoding_chars: String = input.chars().skip(4).take(4).collect();
    if encoding_chars.chars().count() != 4 {
        return Err(Error::InvalidDelimiters(
            "MSH-2 encoding characters field has fewer than 4 characters".to_string(),
        ));
    }

    Delimiters::from_encoding_characters(field_sep, &encoding_chars)
}

/// Parse MSH segment (special handling: fields 1 and 2 are synthesized)
fn parse_msh_segment(input: &str, delimiters: &Delimiters, config: &ParserConfig) -> Result<Segment> {
    if !input.starts_with("MSH") {
        return Err(Error::parse("MSH segment must start with 'MSH'"));
    }

    let mut segment = Segment::new("MSH");

    segment.add_field(Field::from_value(delimiters.field_separator.to_string()));
    segment.add_field(Field::from_value(delimiters.encoding_characters()));

    // "MSH" + field_separator + 4 encoding chars + field_separator
    let field_start = 9;
    if input.len() <= field_start {
        return Ok(segment);
    }

    let rest = &input[field_start..];
    for field_str in rest.split(delimiters.field_separator) {
        check_field_length(field_str, config)?;
        let field = parse_field(field_str, delimiters, config)?;
        segment.add_field(field);
    }

    Ok(segment)
}

/// Parse a regular segment
fn parse_segment(input: &str, delimiters: &Delimiters, config: &ParserConfig) -> Result<Segment> {
    if input.len() < 3 {
        return Err(Error::parse("Segment too short"));
    }

    let segment_id = &input[0..3];
    if is_strict(config) && !is_standard_segment_name(segment_id) {
        return Err(Error::parse(format!("invalid segment name '{}'", segment_id)));
    }
    let mut segment = Segment::new(segment_id);

    if input.len() <= 3 {
        return Ok(segment);
    }

    if input.chars().nth(3) != Some(delimiters.field_separator) {
        return Err(Error::parse(format!(
            "Expected field separator after segment ID, got '{}'",
            input.chars().nth(3).unwrap_or(' ')
        )));
    }

    let rest = &input[4..];
    for field_str in rest.split(delimiters.field_separator) {
        check_field_length(field_str, config)?;
        let field = parse_field(field_str, delimiters, config)?;
        segment.add_field(field);
    }

    Ok(segment)
}

fn is_standard_segment_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

fn check_field_length(raw: &str, config: &ParserConfig) -> Result<()> {
    if config.max_field_length > 0 && raw.len() > config.max_field_length {
        return Err(Error::parse(format!(
            "field of {} bytes exceeds the configured maximum of {}",
            raw.len(),
            config.max_field_length
        )));
    }
    Ok(())
}

/// Parse a field (can contain repetitions)
fn parse_field(input: &str, delimiters: &Delimiters, config: &ParserConfig) -> Result<Field> {
    let mut field = Field::new();

    let repetition_strings: Vec<&str> = if input.is_empty() {
        vec![""]
    } else {
        input.split(delimiters.repetition_separator).collect()
    };

    for rep_str in repetition_strings {
        let repetition = parse_repetition(rep_str, delimiters, config)?;
        field.add_repetition(repetition);
    }

    Ok(field)
}

/// Parse a repetition (can contain components)
fn parse_repetition(input: &str, delimiters: &Delimiters, config: &ParserConfig) -> Result<Repetition> {
    let mut repetition = Repetition::new();

    let component_strings: Vec<&str> = if input.is_empty() {
        vec![""]
    } else {
        input.split(delimiters.component_separator).collect()
    };

    for comp_str in component_strings {
        let component = parse_component(comp_str, delimiters, config)?;
        repetition.add_component(component);
    }

    Ok(repetition)
}

/// Parse a component (can contain subcomponents)
fn parse_component(input: &str, delimiters: &Delimiters, config: &ParserConfig) -> Result<Component> {
    let mut component = Component::new();

    let subcomponent_strings: Vec<&str> = if input.is_empty() {
        vec![""]
    } else {
        input.split(delimiters.subcomponent_separator).collect()
    };

    for sub_str in subcomponent_strings {
        let subcomponent = parse_subcomponent(sub_str, delimiters, config)?;
        component.add_subcomponent(subcomponent);
    }

    Ok(component)
}

/// Parse a subcomponent (decode escape sequences)
fn parse_subcomponent(input: &str, delimiters: &Delimiters, config: &ParserConfig) -> Result<SubComponent> {
    if input.is_empty() {
        return Ok(SubComponent::new(""));
    }

    let decoded = if config.preserve_invalid_escapes {
        Encoding::decode_lenient(input, delimiters)?
    } else {
        Encoding::decode(input, delimiters)?
    };
    Ok(SubComponent::new(decoded))
}

/// Check that the MSH fields strict mode requires are present and non-empty:
/// sending app, receiving app, timestamp, message type, control id,
/// processing id, version.
fn validate_required_msh_fields(message: &Message) -> Result<()> {
    let msh = message
        .get_msh()
        .ok_or_else(|| Error::parse("message has no MSH segment"))?;

    const REQUIRED: &[(usize, &str)] = &[
        (3, "sending application"),
        (5, "receiving application"),
        (7, "date/time of message"),
        (9, "message type"),
        (10, "message control id"),
        (11, "processing id"),
        (12, "version id"),
    ];

    for (index, name) in REQUIRED {
        match msh.get_field_value(*index) {
            Some(v) if !v.is_empty() => {}
            _ => {
                return Err(Error::parse(format!(
                    "strict mode requires MSH-{} ({}) to be present and non-empty",
                    index, name
                )))
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_delimiters() {
        let msh = "MSH|^~\\&|SendApp|SendFac|RecApp|RecFac|20240315||ADT^A01|12345|P|2.5";
        let delims = extract_delimiters(msh).unwrap();

        assert_eq!(delims.field_separator, '|');
        assert_eq!(delims.component_separator, '^');
        assert_eq!(delims.repetition_separator, '~');
        assert_eq!(delims.escape_character, '\\');
        assert_eq!(delims.subcomponent_separator, '&');
    }

    #[test]
    fn test_parse_msh_segment() {
        let msh = "MSH|^~\\&|SendApp|SendFac|RecApp|RecFac";
        let delims = Delimiters::default();
        let config = ParserConfig::lenient();
        let segment = parse_msh_segment(msh, &delims, &config).unwrap();

        assert_eq!(segment.id, "MSH");
        assert_eq!(segment.get_field_value(3), Some("SendApp"));
        assert_eq!(segment.get_field_value(4), Some("SendFac"));
    }

    #[test]
    fn test_parse_segment() {
        let delims = Delimiters::default();
        let config = ParserConfig::lenient();
        let pid = "PID|1|12345|67890^^^MRN|DOE^JOHN^A|";
        let segment = parse_segment(pid, &delims, &config).unwrap();

        assert_eq!(segment.id, "PID");
        assert_eq!(segment.get_field_value(1), Some("1"));
        assert_eq!(segment.get_field_value(2), Some("12345"));
    }

    #[test]
    fn test_parse_field_with_components() {
        let delims = Delimiters::default();
        let config = ParserConfig::lenient();
        let field_str = "DOE^JOHN^A";
        let field = parse_field(field_str, &delims, &config).unwrap();

        let rep = field.get_repetition(0).unwrap();
        assert_eq!(rep.get_component(0).unwrap().value(), Some("DOE"));
        assert_eq!(rep.get_component(1).unwrap().value(), Some("JOHN"));
        assert_eq!(rep.get_component(2).unwrap().value(), Some("A"));
    }

    #[test]
    fn test_parse_field_with_subcomponents() {
        let delims = Delimiters::default();
        let config = ParserConfig::lenient();
        let field_str = "ID1&AssignAuth^ID2";
        let field = parse_field(field_str, &delims, &config).unwrap();

        let rep = field.get_repetition(0).unwrap();
        let comp0 = rep.get_component(0).unwrap();
        assert_eq!(comp0.get_subcomponent(0).unwrap().as_str(), "ID1");
        assert_eq!(comp0.get_subcomponent(1).unwrap().as_str(), "AssignAuth");
    }

    #[test]
    fn test_parse_field_with_repetitions() {
        let delims = Delimiters::default();
        let config = ParserConfig::lenient();
        let field_str = "Value1~Value2~Value3";
        let field = parse_field(field_str, &delims, &config).unwrap();

        assert_eq!(field.repetitions.len(), 3);
        assert_eq!(field.get_repetition(0).unwrap().value(), Some("Value1"));
        assert_eq!(field.get_repetition(1).unwrap().value(), Some("Value2"));
        assert_eq!(field.get_repetition(2).unwrap().value(), Some("Value3"));
    }

    fn sample_message() -> String {
        "MSH|^~\\&|SendApp|SendFac|RecApp|RecFac|20240315143000||ADT^A01|12345|P|2.5\r\
         PID|1|12345|67890^^^MRN|DOE^JOHN^A||19800101|M\r\
         PV1|1|I|Ward^Room^Bed"
            .to_string()
    }

    #[test]
    fn test_parse_complete_message() {
        let parsed = parse_message(&sample_message()).unwrap();

        assert_eq!(parsed.segments.len(), 3);
        assert_eq!(parsed.get_msh().unwrap().id, "MSH");
        assert_eq!(parsed.get_sending_application(), Some("SendApp"));

        let pid = &parsed.segments[1];
        assert_eq!(pid.id, "PID");
        assert_eq!(pid.get_field_value(2), Some("12345"));
    }

    #[test]
    fn test_parse_with_crlf_as_one_boundary() {
        let msg = sample_message().replace('\r', "\r\n");
        let parsed = parse_message(&msg).unwrap();
        assert_eq!(parsed.segments.len(), 3);
    }

    #[test]
    fn test_parse_with_escape_sequences() {
        let delims = Delimiters::default();
        let config = ParserConfig::lenient();
        let field_str = "Test\\F\\Value";
        let field = parse_field(field_str, &delims, &config).unwrap();

        assert_eq!(field.value(), Some("Test|Value"));
    }

    #[test]
    fn test_parse_empty_fields() {
        let delims = Delimiters::default();
        let config = ParserConfig::lenient();
        let segment = "PID|1||3|4|5";
        let parsed = parse_segment(segment, &delims, &config).unwrap();

        assert_eq!(parsed.get_field_value(1), Some("1"));
        assert_eq!(parsed.get_field_value(2), Some(""));
        assert_eq!(parsed.get_field_value(3), Some("3"));
    }

    #[test]
    fn test_strict_mode_rejects_missing_msh() {
        let err = parse_message("PID|1|12345").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_strict_mode_rejects_missing_required_field() {
        // MSH-9 (message type) is missing
        let msg = "MSH|^~\\&|SendApp|SendFac|RecApp|RecFac|20240315||||12345|P|2.5";
        let err = parse_message_with_config(msg, &ParserConfig::strict()).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_strict_mode_rejects_invalid_escape() {
        let msg = format!("{}\rPID|1|Bad\\QQQ\\Value", header_only());
        let err = parse_message_with_config(&msg, &ParserConfig::strict()).unwrap_err();
        assert!(matches!(err, Error::Decoding(_)));
    }

    #[test]
    fn test_default_config_is_lenient() {
        // MSH-9 (message type) is missing; strict mode would reject this,
        // but parse_message's default config tolerates it per the spec.
        let msg = "MSH|^~\\&|SendApp|SendFac|RecApp|RecFac|20240315||||12345|P|2.5";
        assert!(parse_message(msg).is_ok());

        let msg = format!("{}\rPID|1|Bad\\QQQ\\Value", header_only());
        let parsed = parse_message(&msg).unwrap();
        assert_eq!(
            parsed.segments[1].get_field_value(2),
            Some("Bad\\QQQ\\Value")
        );
    }

    #[test]
    fn test_lenient_mode_passes_through_invalid_escape() {
        let msg = format!("{}\rPID|1|Bad\\QQQ\\Value", header_only());
        let parsed = parse_message_with_config(&msg, &ParserConfig::lenient()).unwrap();
        assert_eq!(
            parsed.segments[1].get_field_value(2),
            Some("Bad\\QQQ\\Value")
        );
    }

    fn header_only() -> String {
        "MSH|^~\\&|SendApp|SendFac|RecApp|RecFac|20240315143000||ADT^A01|12345|P|2.5".to_string()
    }

    #[test]
    fn test_max_segments_enforced() {
        let mut msg = header_only();
        for _ in 0..5 {
            msg.push('\r');
            msg.push_str("PID|1|12345");
        }
        let config = ParserConfig::lenient().max_segments(3);
        let err = parse_message_with_config(&msg, &config).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_max_field_length_enforced() {
        let long_value = "A".repeat(100);
        let msg = format!("{}\rPID|1|{}", header_only(), long_value);
        let config = ParserConfig::lenient().max_field_length(10);
        let err = parse_message_with_config(&msg, &config).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_custom_delimiters_skips_msh_detection() {
        let custom = Delimiters::from_encoding_characters('|', "^~\\&").unwrap();
        let config = ParserConfig::lenient().custom_delimiters(custom);
        let parsed = parse_message_with_config(&sample_message(), &config).unwrap();
        assert_eq!(parsed.delimiters, custom);
    }

    #[test]
    fn test_parse_bytes() {
        let bytes = sample_message().into_bytes();
        let parsed = parse(&bytes).unwrap();
        assert_eq!(parsed.segments.len(), 3);
    }
}
