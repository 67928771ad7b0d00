//! MLLP TLS Client Example
//!
//! See `mllp_tls_server.rs` for certificate generation instructions.
//!
//! ```bash
//! cargo run --example mllp_tls_server --features tls
//! cargo run --example mllp_tls_client --features tls -- --mtls
//! ```

use chrono::Utc;
use rs7_core::{Field, Message, Segment};
use rs7_mllp::{tls::TlsClientConfig, ClientConfig, MllpClient};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== MLLP TLS Client Example ===\n");

    let use_mtls = env::args().any(|arg| arg == "--mtls");
    let ca_cert = env::var("CA_CERT").unwrap_or_else(|_| "ca-cert.pem".to_string());
    let client_cert = env::var("CLIENT_CERT").unwrap_or_else(|_| "client-cert.pem".to_string());
    let client_key = env::var("CLIENT_KEY").unwrap_or_else(|_| "client-key.pem".to_string());

    let tls_config = if use_mtls {
        println!("Connecting with mTLS (client certificate authentication)...");
        TlsClientConfig::with_mtls(&ca_cert, &client_cert, &client_key)?
    } else {
        println!("Connecting with TLS...");
        TlsClientConfig::with_ca_cert(&ca_cert)?
    };

    println!("Connecting to MLLP TLS server at 127.0.0.1:2575...");
    let client = MllpClient::with_tls(
        "127.0.0.1:2575",
        "localhost",
        tls_config,
        ClientConfig::default(),
    );

    let message = create_test_message();
    println!("📤 Sending HL7 message:\n{}\n", message.encode());

    println!("Waiting for ACK...");
    let ack = client.send(&message).await?;
    println!("✓ Received ACK:\n{}\n", ack.encode());

    client.close().await?;
    println!("✓ Connection closed");
    Ok(())
}

fn create_test_message() -> Message {
    let mut msg = Message::default();

    let mut msh = Segment::new("MSH");
    msh.add_field(Field::from_value("|"));
    msh.add_field(Field::from_value("^~\\&"));
    msh.add_field(Field::from_value("SENDING_APP"));
    msh.add_field(Field::from_value("SENDING_FAC"));
    msh.add_field(Field::from_value("RECEIVING_APP"));
    msh.add_field(Field::from_value("RECEIVING_FAC"));
    msh.add_field(Field::from_value(Utc::now().format("%Y%m%d%H%M%S").to_string()));
    msh.add_field(Field::from_value(""));
    msh.add_field(Field::from_value("ADT^A01"));
    msh.add_field(Field::from_value("MSG001"));
    msh.add_field(Field::from_value("P"));
    msh.add_field(Field::from_value("2.5"));
    msg.add_segment(msh);

    let mut evn = Segment::new("EVN");
    evn.add_field(Field::from_value("A01"));
    evn.add_field(Field::from_value(Utc::now().format("%Y%m%d%H%M%S").to_string()));
    msg.add_segment(evn);

    let mut pid = Segment::new("PID");
    pid.add_field(Field::from_value(""));
    pid.add_field(Field::from_value("12345"));
    pid.add_field(Field::from_value("67890^^^MRN"));
    pid.add_field(Field::from_value(""));
    pid.add_field(Field::from_value("DOE^JOHN^A"));
    pid.add_field(Field::from_value(""));
    pid.add_field(Field::from_value("19800101"));
    pid.add_field(Field::from_value("M"));
    msg.add_segment(pid);

    msg
}
