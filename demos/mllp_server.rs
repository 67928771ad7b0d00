//! Example: MLLP Server
//!
//! Listens for HL7 messages over MLLP, parses each one, and replies with an
//! AA acknowledgment built via `AckBuilder`.

use rs7_core::builders::ack::AckBuilder;
use rs7_mllp::{MllpServer, ServerConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== MLLP Server Example ===\n");

    let addr = "127.0.0.1:2575";
    let server = MllpServer::bind_with_config(addr, ServerConfig::default())
        .await?
        .with_handler(Arc::new(|message| {
            Box::pin(async move {
                println!("Received message:");
                println!("  Control ID: {:?}", message.get_control_id());
                println!("  Message Type: {:?}", message.get_message_type());
                println!("  Sender: {:?}", message.get_sending_application());

                let ack = AckBuilder::for_message(&message).accept().build()?;
                println!("✓ Sending ACK\n");
                Ok(Some(ack))
            }) as _
        }));

    println!("✓ Server listening on {}", server.local_addr()?);
    println!("Waiting for connections... (Ctrl+C to stop)\n");

    server.serve().await?;
    Ok(())
}
