//! Message builders for creating HL7 messages programmatically
//!
//! This module provides builder patterns for creating HL7 messages of various types.
//! Builders help ensure messages are created with required fields and proper structure.

pub mod ack;

use crate::{
    delimiters::Delimiters,
    error::Result,
    field::Field,
    message::Message,
    segment::Segment,
    types::format_timestamp,
    Version,
};
use chrono::Local;

/// Base message builder with common functionality
pub struct MessageBuilder {
    message: Message,
    version: Version,
    message_type: String,
    trigger_event: String,
}

impl MessageBuilder {
    /// Create a new message builder
    pub fn new(version: Version, message_type: &str, trigger_event: &str) -> Self {
        Self {
            message: Message::new(),
            version,
            message_type: message_type.to_string(),
            trigger_event: trigger_event.to_string(),
        }
    }

    /// Create MSH segment with basic fields
    pub fn create_msh(
        &self,
        sending_app: &str,
        sending_facility: &str,
        receiving_app: &str,
        receiving_facility: &str,
        control_id: &str,
        processing_id: &str,
    ) -> Result<Segment> {
        let mut msh = Segment::new("MSH");
        let delims = Delimiters::default();

        // MSH-1: Field separator (special handling)
        msh.add_field(Field::from_value(delims.field_separator.to_string()));

        // MSH-2: Encoding characters
        msh.add_field(Field::from_value(format!(
            "{}{}{}{}",
            delims.component_separator, delims.repetition_separator, delims.escape_character, delims.subcomponent_separator
        )));

        // MSH-3: Sending Application
        msh.add_field(Field::from_value(sending_app));

        // MSH-4: Sending Facility
        msh.add_field(Field::from_value(sending_facility));

        // MSH-5: Receiving Application
        msh.add_field(Field::from_value(receiving_app));

        // MSH-6: Receiving Facility
        msh.add_field(Field::from_value(receiving_facility));

        // MSH-7: Date/Time of Message
        let timestamp = format_timestamp(&Local::now().naive_local());
        msh.add_field(Field::from_value(&timestamp));

        // MSH-8: Security (empty)
        msh.add_field(Field::from_value(""));

        // MSH-9: Message Type
        let msg_type = format!("{}^{}", self.message_type, self.trigger_event);
        msh.add_field(Field::from_value(&msg_type));

        // MSH-10: Message Control ID
        msh.add_field(Field::from_value(control_id));

        // MSH-11: Processing ID
        msh.add_field(Field::from_value(processing_id));

        // MSH-12: Version ID
        msh.add_field(Field::from_value(self.version.as_str()));

        Ok(msh)
    }

    /// Create EVN segment
    pub fn create_evn(&self, event_type_code: &str, recorded_datetime: Option<&str>) -> Result<Segment> {
        let mut evn = Segment::new("EVN");

        // EVN-1: Event Type Code
        evn.add_field(Field::from_value(event_type_code));

        // EVN-2: Recorded Date/Time
        let timestamp = if let Some(dt) = recorded_datetime {
            dt.to_string()
        } else {
            format_timestamp(&Local::now().naive_local())
        };
        evn.add_field(Field::from_value(&timestamp));

        Ok(evn)
    }

    /// Build the final message
    pub fn build(self) -> Message {
        self.message
    }
}

/// Generate a message control ID (simple implementation)
pub fn generate_control_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis();
    format!("MSG{}", timestamp)
}
