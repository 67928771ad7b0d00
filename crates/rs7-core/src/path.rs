//! Location-path parsing: `SEG[rep].field[rep].component.sub`
//!
//! Grammar (normative):
//! ```text
//! path   := SEG ( '[' uint ']' )? ( '.' field ( '[' uint ']' )? ( '.' comp ( '.' sub )? )? )?
//! SEG    := [A-Z][A-Z0-9]{2}
//! field, comp, sub := positive decimal integer (1-based)
//! ```
//! Segment-repetition and field-repetition indices are 0-based bracket
//! suffixes; component and subcomponent indices are 1-based dot-separated
//! integers.

use crate::error::{Error, Result};

/// A fully parsed location path, e.g. `PID[1].5[0].1.2`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub segment_id: String,
    pub segment_rep: usize,
    pub field: Option<usize>,
    pub field_rep: usize,
    pub component: Option<usize>,
    pub subcomponent: Option<usize>,
}

impl Location {
    /// Parse a location path string per the grammar above
    pub fn parse(path: &str) -> Result<Self> {
        let chars: Vec<char> = path.chars().collect();
        let mut pos = 0;

        let segment_id = parse_segment_id(&chars, &mut pos, path)?;
        let segment_rep = parse_optional_bracket_index(&chars, &mut pos, path)?.unwrap_or(0);

        let mut field = None;
        let mut field_rep = 0;
        let mut component = None;
        let mut subcomponent = None;

        if peek(&chars, pos) == Some('.') {
            pos += 1;
            field = Some(parse_positive_int(&chars, &mut pos, path, "field")?);
            field_rep = parse_optional_bracket_index(&chars, &mut pos, path)?.unwrap_or(0);

            if peek(&chars, pos) == Some('.') {
                pos += 1;
                component = Some(parse_positive_int(&chars, &mut pos, path, "component")?);

                if peek(&chars, pos) == Some('.') {
                    pos += 1;
                    subcomponent =
                        Some(parse_positive_int(&chars, &mut pos, path, "subcomponent")?);
                }
            }
        }

        if pos != chars.len() {
            return Err(Error::path_error(format!(
                "unexpected trailing characters in path '{}'",
                path
            )));
        }

        Ok(Location {
            segment_id,
            segment_rep,
            field,
            field_rep,
            component,
            subcomponent,
        })
    }
}

fn peek(chars: &[char], pos: usize) -> Option<char> {
    chars.get(pos).copied()
}

fn parse_segment_id(chars: &[char], pos: &mut usize, path: &str) -> Result<String> {
    if chars.len() < *pos + 3 {
        return Err(Error::path_error(format!(
            "path '{}' is missing a 3-character segment name",
            path
        )));
    }
    let candidate: String = chars[*pos..*pos + 3].iter().collect();
    let mut it = candidate.chars();
    let first = it.next().unwrap();
    if !first.is_ascii_uppercase() || !it.clone().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return Err(Error::path_error(format!(
            "invalid segment name '{}' in path '{}'",
            candidate, path
        )));
    }
    *pos += 3;
    Ok(candidate)
}

fn parse_optional_bracket_index(
    chars: &[char],
    pos: &mut usize,
    path: &str,
) -> Result<Option<usize>> {
    if peek(chars, *pos) != Some('[') {
        return Ok(None);
    }
    *pos += 1;
    let start = *pos;
    while peek(chars, *pos).is_some_and(|c| c.is_ascii_digit()) {
        *pos += 1;
    }
    if *pos == start {
        return Err(Error::path_error(format!(
            "expected a repetition index inside '[]' in path '{}'",
            path
        )));
    }
    let digits: String = chars[start..*pos].iter().collect();
    if peek(chars, *pos) != Some(']') {
        return Err(Error::path_error(format!(
            "unterminated '[' in path '{}'",
            path
        )));
    }
    *pos += 1;
    digits
        .parse::<usize>()
        .map(Some)
        .map_err(|_| Error::path_error(format!("invalid repetition index in path '{}'", path)))
}

fn parse_positive_int(chars: &[char], pos: &mut usize, path: &str, what: &str) -> Result<usize> {
    let start = *pos;
    while peek(chars, *pos).is_some_and(|c| c.is_ascii_digit()) {
        *pos += 1;
    }
    if *pos == start {
        return Err(Error::path_error(format!(
            "expected a {} number in path '{}'",
            what, path
        )));
    }
    let digits: String = chars[start..*pos].iter().collect();
    let value: usize = digits
        .parse()
        .map_err(|_| Error::path_error(format!("invalid {} number in path '{}'", what, path)))?;
    if value == 0 {
        return Err(Error::path_error(format!(
            "{} index must be 1-based (got 0) in path '{}'",
            what, path
        )));
    }
    Ok(value)
}
