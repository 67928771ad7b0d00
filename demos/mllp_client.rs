//! Example: MLLP Client
//!
//! Builds a sample ADT^A01 message, sends it to a running MLLP server, and
//! prints the acknowledgment.

use chrono::Utc;
use rs7_core::{delimiters::Delimiters, Field, Message, Segment, Version};
use rs7_mllp::{ClientConfig, MllpClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== MLLP Client Example ===\n");

    let message = create_sample_message()?;
    println!("--- Message to Send ---");
    println!("{}\n", message.encode().replace('\r', "\r\n"));

    let addr = "127.0.0.1:2575";
    println!("Connecting to MLLP server at {}...", addr);
    let client = MllpClient::with_config(addr, ClientConfig::default());

    match client.send(&message).await {
        Ok(ack) => {
            println!("✓ Message sent successfully\n");
            println!("--- Received ACK ---");
            println!("{}\n", ack.encode().replace('\r', "\r\n"));

            if let Some(msa) = ack.get_segments_by_id("MSA").first() {
                if let Some(ack_code) = msa.get_field_value(1) {
                    println!("Acknowledgment Code: {}", ack_code);
                    match ack_code {
                        "AA" => println!("Status: Application Accept (Success)"),
                        "AE" => println!("Status: Application Error"),
                        "AR" => println!("Status: Application Reject"),
                        _ => println!("Status: Unknown"),
                    }
                }
                if let Some(msg_id) = msa.get_field_value(2) {
                    println!("Message Control ID: {}", msg_id);
                }
            }
        }
        Err(e) => {
            eprintln!("✗ Failed to send message: {}", e);
            eprintln!("Make sure the MLLP server is running (cargo run --example mllp_server)");
        }
    }

    client.close().await?;
    println!("\nConnection closed");
    Ok(())
}

fn create_sample_message() -> Result<Message, Box<dyn std::error::Error>> {
    let mut message = Message::new();

    let mut msh = Segment::new("MSH");
    let delims = Delimiters::default();
    msh.add_field(Field::from_value(delims.field_separator.to_string()));
    msh.add_field(Field::from_value(delims.encoding_characters()));
    msh.set_field_value(3, "ClientApp")?;
    msh.set_field_value(4, "ClientFacility")?;
    msh.set_field_value(5, "ServerApp")?;
    msh.set_field_value(6, "ServerFacility")?;
    msh.set_field_value(7, Utc::now().format("%Y%m%d%H%M%S").to_string())?;
    msh.set_field_value(9, "ADT^A01")?;
    msh.set_field_value(10, format!("MSG{}", Utc::now().timestamp()))?;
    msh.set_field_value(11, "P")?;
    msh.set_field_value(12, Version::V2_5.as_str())?;
    message.add_segment(msh);

    let mut pid = Segment::new("PID");
    pid.set_field_value(1, "1")?;
    pid.set_field_value(2, "PATIENT12345")?;
    pid.set_field_value(3, "MRN987654^^^MRN")?;
    pid.set_field_value(5, "DOE^JOHN^M")?;
    pid.set_field_value(7, "19850714")?;
    pid.set_field_value(8, "M")?;
    message.add_segment(pid);

    let mut pv1 = Segment::new("PV1");
    pv1.set_field_value(1, "1")?;
    pv1.set_field_value(2, "I")?;
    pv1.set_field_value(3, "ICU^201^A")?;
    message.add_segment(pv1);

    Ok(message)
}
