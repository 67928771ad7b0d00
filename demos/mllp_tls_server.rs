//! MLLP TLS Server Example
//!
//! Demonstrates an MLLP server terminating TLS (optionally mTLS).
//!
//! ## Generating Test Certificates
//!
//! ```bash
//! openssl genrsa -out ca-key.pem 4096
//! openssl req -new -x509 -days 365 -key ca-key.pem -out ca-cert.pem \
//!     -subj "/CN=Test CA"
//!
//! openssl genrsa -out server-key.pem 4096
//! openssl req -new -key server-key.pem -out server.csr \
//!     -subj "/CN=localhost"
//! openssl x509 -req -days 365 -in server.csr -CA ca-cert.pem \
//!     -CAkey ca-key.pem -CAcreateserial -out server-cert.pem
//!
//! # For mTLS, generate a client certificate too
//! openssl genrsa -out client-key.pem 4096
//! openssl req -new -key client-key.pem -out client.csr \
//!     -subj "/CN=client"
//! openssl x509 -req -days 365 -in client.csr -CA ca-cert.pem \
//!     -CAkey ca-key.pem -CAcreateserial -out client-cert.pem
//! ```
//!
//! ## Running
//!
//! ```bash
//! cargo run --example mllp_tls_server --features tls
//! cargo run --example mllp_tls_client --features tls
//! ```

use rs7_core::builders::ack::AckBuilder;
use rs7_mllp::{tls::TlsServerConfig, MllpServer, ServerConfig};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== MLLP TLS Server Example ===\n");

    let use_mtls = env::args().any(|arg| arg == "--mtls");
    let server_cert = env::var("SERVER_CERT").unwrap_or_else(|_| "server-cert.pem".to_string());
    let server_key = env::var("SERVER_KEY").unwrap_or_else(|_| "server-key.pem".to_string());
    let ca_cert = env::var("CA_CERT").unwrap_or_else(|_| "ca-cert.pem".to_string());

    let tls_config = if use_mtls {
        println!("Starting MLLP server with mTLS (client certificate verification)...");
        TlsServerConfig::with_mtls(&server_cert, &server_key, &ca_cert)?
    } else {
        println!("Starting MLLP server with TLS...");
        TlsServerConfig::new(&server_cert, &server_key)?
    };

    let server = MllpServer::bind_tls("127.0.0.1:2575", tls_config, ServerConfig::default())
        .await?
        .with_handler(Arc::new(|message| {
            Box::pin(async move {
                println!("📨 Received HL7 message:\n{}", message.encode());
                let ack = AckBuilder::for_message(&message).accept().build()?;
                println!("📤 Sending ACK:\n{}", ack.encode());
                Ok(Some(ack))
            }) as _
        }));

    println!("MLLP TLS server listening on {}", server.local_addr()?);
    println!("Waiting for connections...\n");

    server.serve().await?;
    Ok(())
}
