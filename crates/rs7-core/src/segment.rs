//! HL7 segment structures

use std::fmt;

use crate::delimiters::Delimiters;
use crate::error::{Error, NotFoundKind, Result};
use crate::field::{Component, Field, Repetition, SubComponent};
use crate::path::Location;

/// An HL7 segment
///
/// A segment consists of:
/// - A 3-character segment ID (e.g., "MSH", "PID", "OBX")
/// - Multiple fields separated by the field separator
///
/// Note: For MSH segments, the encoding is special:
/// - MSH|^~\&|... (field separator and encoding characters come first)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Segment ID (3 characters, e.g., "MSH", "PID")
    pub id: String,
    /// Fields in the segment (excluding the segment ID)
    pub fields: Vec<Field>,
}

impl Segment {
    /// Create a new segment with the given ID
    pub fn new<S: Into<String>>(id: S) -> Self {
        let id = id.into();
        Self {
            id,
            fields: Vec::new(),
        }
    }

    /// Add a field to the segment
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Get a field by index (1-based, as per HL7 convention)
    ///
    /// Note: Field 0 is the segment ID itself
    pub fn get_field(&self, index: usize) -> Option<&Field> {
        if index == 0 {
            None // Field 0 is the segment ID, not a regular field
        } else {
            self.fields.get(index - 1)
        }
    }

    /// Get a mutable field by index (1-based)
    pub fn get_field_mut(&mut self, index: usize) -> Option<&mut Field> {
        if index == 0 {
            None
        } else {
            self.fields.get_mut(index - 1)
        }
    }

    /// Set a field value at the given index (1-based)
    ///
    /// This will extend the fields vector if necessary
    pub fn set_field(&mut self, index: usize, field: Field) -> Result<()> {
        if index == 0 {
            return Err(Error::InvalidFieldAccess(
                "Cannot set field 0 (segment ID)".to_string(),
            ));
        }

        let field_index = index - 1;

        // Extend fields vector if necessary
        while self.fields.len() <= field_index {
            self.fields.push(Field::new());
        }

        self.fields[field_index] = field;
        Ok(())
    }

    /// Get a field value as a string (convenience method)
    pub fn get_field_value(&self, index: usize) -> Option<&str> {
        self.get_field(index).and_then(|f| f.value())
    }

    /// Set a field from a simple string value
    pub fn set_field_value<S: Into<String>>(&mut self, index: usize, value: S) -> Result<()> {
        self.set_field(index, Field::from_value(value))
    }

    /// Get the number of fields (excluding segment ID)
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Encode the segment to HL7 format
    pub fn encode(&self, delimiters: &Delimiters) -> String {
        self.encode_opts(delimiters, true)
    }

    /// Encode the segment, optionally eliding trailing empty fields
    pub fn encode_opts(&self, delimiters: &Delimiters, trailing_delimiters: bool) -> String {
        let mut result = self.id.clone();

        // Special handling for MSH segment
        if self.id == "MSH" {
            result.push(delimiters.field_separator);
            result.push_str(&delimiters.encoding_characters());

            // MSH fields start from field 3 (after separator and encoding chars)
            let mut rest = self.fields.iter().skip(1).collect::<Vec<_>>();
            if !trailing_delimiters {
                while !rest.is_empty() && rest.last().is_some_and(|f| f.is_empty()) {
                    rest.pop();
                }
            }
            for field in rest {
                result.push(delimiters.field_separator);
                result.push_str(&field.encode_opts(delimiters, trailing_delimiters));
            }
        } else {
            // Regular segments
            let mut fields = self.fields.as_slice();
            if !trailing_delimiters {
                while !fields.is_empty() && fields.last().is_some_and(|f| f.is_empty()) {
                    fields = &fields[..fields.len() - 1];
                }
            }
            for field in fields {
                result.push(delimiters.field_separator);
                result.push_str(&field.encode_opts(delimiters, trailing_delimiters));
            }
        }

        result
    }

    /// The segment's 3-character name (alias for `id`, matching the
    /// `Name()` accessor in the external interface contract)
    pub fn name(&self) -> &str {
        &self.id
    }

    /// Read the value at a location path within this segment.
    ///
    /// A missing field/repetition/component/subcomponent in the path is an
    /// error; a path that stops short of a leaf returns the joined text of
    /// everything beneath it (e.g. `PID.5` on a multi-component field
    /// returns the full component-joined string).
    pub fn get(&self, path: &str, delimiters: &Delimiters) -> Result<String> {
        let loc = Location::parse(path)?;
        self.get_at(&loc, delimiters)
    }

    /// Read every repetition's scalarization for a location path.
    pub fn get_all(&self, path: &str, delimiters: &Delimiters) -> Result<Vec<String>> {
        let loc = Location::parse(path)?;
        self.get_all_at(&loc, delimiters)
    }

    /// Read the value at a pre-parsed [`Location`].
    pub fn get_at(&self, loc: &Location, delimiters: &Delimiters) -> Result<String> {
        let field_idx = loc.field.ok_or_else(|| {
            Error::path_error("segment-level Get requires a field position")
        })?;
        let field = self
            .get_field(field_idx)
            .ok_or_else(|| Error::not_found(NotFoundKind::FieldNotFound, format!("{}.{}", self.id, field_idx)))?;
        let rep = field.get_repetition(loc.field_rep).ok_or_else(|| {
            Error::not_found(
                NotFoundKind::FieldNotFound,
                format!("{}.{}[{}]", self.id, field_idx, loc.field_rep),
            )
        })?;
        scalarize(rep, loc.component, loc.subcomponent, delimiters, &self.id, field_idx)
    }

    /// Read every repetition's scalarization at a pre-parsed [`Location`].
    pub fn get_all_at(&self, loc: &Location, delimiters: &Delimiters) -> Result<Vec<String>> {
        let field_idx = loc.field.ok_or_else(|| {
            Error::path_error("segment-level GetAll requires a field position")
        })?;
        let field = self
            .get_field(field_idx)
            .ok_or_else(|| Error::not_found(NotFoundKind::FieldNotFound, format!("{}.{}", self.id, field_idx)))?;
        field
            .repetitions
            .iter()
            .map(|rep| scalarize(rep, loc.component, loc.subcomponent, delimiters, &self.id, field_idx))
            .collect()
    }

    /// Write a value at a location path, creating missing intermediate
    /// containers (field, repetitions up to the requested index, components,
    /// subcomponents).
    pub fn set(&mut self, path: &str, value: &str) -> Result<()> {
        let loc = Location::parse(path)?;
        self.set_at(&loc, value)
    }

    /// Write a value at a pre-parsed [`Location`].
    pub fn set_at(&mut self, loc: &Location, value: &str) -> Result<()> {
        let field_idx = loc.field.ok_or_else(|| {
            Error::path_error("segment-level Set requires a field position")
        })?;

        while self.fields.len() < field_idx {
            self.fields.push(Field::new());
        }
        let field = &mut self.fields[field_idx - 1];

        while field.repetitions.len() <= loc.field_rep {
            field.repetitions.push(Repetition::new());
        }
        let rep = &mut field.repetitions[loc.field_rep];

        match (loc.component, loc.subcomponent) {
            (None, None) => {
                *rep = Repetition::from_value(value);
            }
            (Some(c), None) => {
                while rep.components.len() < c {
                    rep.components.push(Component::new());
                }
                rep.components[c - 1] = Component::from_value(value);
            }
            (Some(c), Some(s)) => {
                while rep.components.len() < c {
                    rep.components.push(Component::new());
                }
                let comp = &mut rep.components[c - 1];
                while comp.subcomponents.len() < s {
                    comp.subcomponents.push(SubComponent::new(""));
                }
                comp.subcomponents[s - 1] = SubComponent::new(value);
            }
            (None, Some(_)) => unreachable!("grammar requires a component before a subcomponent"),
        }

        Ok(())
    }

    /// Encode the segment to bytes using the given delimiters
    pub fn bytes(&self, delimiters: &Delimiters) -> Vec<u8> {
        self.encode(delimiters).into_bytes()
    }

    /// Validate segment ID (must be 3 alphanumeric characters)
    pub fn validate_id(&self) -> Result<()> {
        if self.id.len() != 3 {
            return Err(Error::InvalidSegment(format!(
                "Segment ID must be 3 characters, got: {}",
                self.id
            )));
        }

        if !self.id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::InvalidSegment(format!(
                "Segment ID must be alphanumeric, got: {}",
                self.id
            )));
        }

        Ok(())
    }
}

impl fmt::Display for Segment {
    /// Encodes with the default delimiters, since a segment on its own
    /// carries no delimiter set. Use [`Segment::encode`] directly when
    /// the surrounding message's delimiters are known.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode(&Delimiters::default()))
    }
}

/// Common segment types
pub mod types {
    /// Message Header segment
    pub const MSH: &str = "MSH";

    /// Patient Identification segment
    pub const PID: &str = "PID";

    /// Patient Visit segment
    pub const PV1: &str = "PV1";

    /// Observation Request segment
    pub const OBR: &str = "OBR";

    /// Observation/Result segment
    pub const OBX: &str = "OBX";

    /// Error segment
    pub const ERR: &str = "ERR";

    /// Message Acknowledgment segment
    pub const MSA: &str = "MSA";

    /// Next of Kin segment
    pub const NK1: &str = "NK1";

    /// Insurance segment
    pub const IN1: &str = "IN1";

    /// Additional demographics segment
    pub const PD1: &str = "PD1";

    /// Common Order segment
    pub const ORC: &str = "ORC";

    /// Diagnosis segment
    pub const DG1: &str = "DG1";

    /// Allergy Information segment
    pub const AL1: &str = "AL1";

    /// Notes and Comments segment
    pub const NTE: &str = "NTE";
}

/// Scalarize a repetition at an optional component/subcomponent depth,
/// implementing "missing path segments from the right are treated as the
/// whole of what remains".
fn scalarize(
    rep: &Repetition,
    component: Option<usize>,
    subcomponent: Option<usize>,
    delimiters: &Delimiters,
    segment_id: &str,
    field_idx: usize,
) -> Result<String> {
    match (component, subcomponent) {
        (None, None) => Ok(rep.joined(delimiters)),
        (Some(c), None) => {
            let comp = rep.get_component(c - 1).ok_or_else(|| {
                Error::not_found(
                    NotFoundKind::ComponentNotFound,
                    format!("{}.{}.{}", segment_id, field_idx, c),
                )
            })?;
            Ok(comp.joined(delimiters))
        }
        (Some(c), Some(s)) => {
            let comp = rep.get_component(c - 1).ok_or_else(|| {
                Error::not_found(
                    NotFoundKind::ComponentNotFound,
                    format!("{}.{}.{}", segment_id, field_idx, c),
                )
            })?;
            let sub = comp.get_subcomponent(s - 1).ok_or_else(|| {
                Error::not_found(
                    NotFoundKind::SubComponentNotFound,
                    format!("{}.{}.{}.{}", segment_id, field_idx, c, s),
                )
            })?;
            Ok(sub.as_str().to_string())
        }
        (None, Some(_)) => unreachable!("grammar requires a component before a subcomponent"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_segment() {
        let segment = Segment::new("PID");
        assert_eq!(segment.id, "PID");
        assert_eq!(segment.fields.len(), 0);
    }

    #[test]
    fn test_add_field() {
        let mut segment = Segment::new("PID");
        segment.add_field(Field::from_value("12345"));
        assert_eq!(segment.fields.len(), 1);
    }

    #[test]
    fn test_get_field() {
        let mut segment = Segment::new("PID");
        segment.add_field(Field::from_value("12345"));

        assert_eq!(segment.get_field(1).unwrap().value(), Some("12345"));
        assert!(segment.get_field(0).is_none());
        assert!(segment.get_field(2).is_none());
    }

    #[test]
    fn test_set_field() {
        let mut segment = Segment::new("PID");
        segment.set_field_value(1, "12345").unwrap();
        segment.set_field_value(3, "Smith").unwrap();

        assert_eq!(segment.get_field_value(1), Some("12345"));
        assert_eq!(segment.get_field_value(3), Some("Smith"));
        // Field 2 should be empty but present
        assert_eq!(segment.fields.len(), 3);
    }

    #[test]
    fn test_encode_regular_segment() {
        let delims = Delimiters::default();
        let mut segment = Segment::new("PID");
        segment.add_field(Field::from_value("1"));
        segment.add_field(Field::from_value("12345"));
        segment.add_field(Field::from_value("Smith^John"));

        let encoded = segment.encode(&delims);
        assert!(encoded.starts_with("PID|"));
    }

    #[test]
    fn test_encode_msh_segment() {
        let delims = Delimiters::default();
        let mut segment = Segment::new("MSH");
        segment.add_field(Field::from_value("^~\\&")); // encoding characters
        segment.add_field(Field::from_value("SendingApp"));
        segment.add_field(Field::from_value("ReceivingApp"));

        let encoded = segment.encode(&delims);
        assert!(encoded.starts_with("MSH|^~\\&|"));
    }

    #[test]
    fn test_get_whole_field_joins_components() {
        let delims = Delimiters::default();
        let mut segment = Segment::new("PID");
        segment.set_field_value(5, "Smith^John^Q").unwrap();

        assert_eq!(segment.get("PID.5", &delims).unwrap(), "Smith^John^Q");
        assert_eq!(segment.get("PID.5.1", &delims).unwrap(), "Smith");
        let err = segment.get("PID.5.4", &delims).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_set_creates_intermediates() {
        let delims = Delimiters::default();
        let mut segment = Segment::new("PID");
        segment.set("PID.5.2", "John").unwrap();

        assert_eq!(segment.get("PID.5.2", &delims).unwrap(), "John");
        assert_eq!(segment.get("PID.5.1", &delims).unwrap(), "");
    }

    #[test]
    fn test_get_all_repetitions() {
        let delims = Delimiters::default();
        let mut segment = Segment::new("PID");
        let mut field = Field::new();
        field.add_repetition(Repetition::from_value("A"));
        field.add_repetition(Repetition::from_value("B"));
        field.add_repetition(Repetition::from_value("C"));
        segment.set_field(3, field).unwrap();

        let all = segment.get_all("PID.3", &delims).unwrap();
        assert_eq!(all, vec!["A".to_string(), "B".to_string(), "C".to_string()]);
    }

    #[test]
    fn test_validate_id() {
        let valid = Segment::new("PID");
        assert!(valid.validate_id().is_ok());

        let invalid_length = Segment::new("PI");
        assert!(invalid_length.validate_id().is_err());

        let invalid_chars = Segment::new("PI!");
        assert!(invalid_chars.validate_id().is_err());
    }
}
