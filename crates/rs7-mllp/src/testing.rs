//! Testing utilities for MLLP: an in-process mock server for integration
//! tests, built on the real [`MllpServer`]/[`MllpClient`] so tests exercise
//! the same framing and worker code paths production traffic does.

use std::sync::Arc;
use std::time::Duration;

use rs7_core::error::Result;
use rs7_core::message::Message;

use crate::server::{Handler, MllpServer, ServerConfig, ServerShutdown};
use crate::{ClientConfig, MllpClient};

#[cfg(feature = "tls")]
use crate::tls::TlsServerConfig;

/// Mock MLLP server bound to a random loopback port, with a configurable
/// message handler. Defaults to echoing the received message back.
pub struct MockMllpServer {
    config: ServerConfig,
    handler: Option<Handler>,
    #[cfg(feature = "tls")]
    tls_config: Option<TlsServerConfig>,
    local_addr: Option<std::net::SocketAddr>,
    shutdown: Option<ServerShutdown>,
    task: Option<tokio::task::JoinHandle<Result<()>>>,
}

impl MockMllpServer {
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            handler: None,
            #[cfg(feature = "tls")]
            tls_config: None,
            local_addr: None,
            shutdown: None,
            task: None,
        }
    }

    /// Terminate TLS on the accepted connections using the given server
    /// config instead of serving plaintext.
    #[cfg(feature = "tls")]
    pub fn with_tls(mut self, tls_config: TlsServerConfig) -> Self {
        self.tls_config = Some(tls_config);
        self
    }

    /// Set a custom message handler. The handler receives each inbound
    /// message and returns the response to send back (or `None` for no
    /// reply).
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(Message) -> Result<Option<Message>> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(move |msg| {
            let result = handler(msg);
            Box::pin(async move { result }) as _
        }));
        self
    }

    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Bind and start accepting connections in the background.
    pub async fn start(mut self) -> Result<Self> {
        let handler = self.handler.take().unwrap_or_else(|| {
            Arc::new(|msg: Message| Box::pin(async move { Ok(Some(msg)) }) as _)
        });

        #[cfg(feature = "tls")]
        let server = match self.tls_config.take() {
            Some(tls_config) => {
                MllpServer::bind_tls("127.0.0.1:0", tls_config, self.config.clone())
                    .await?
                    .with_handler(handler)
            }
            None => MllpServer::bind_with_config("127.0.0.1:0", self.config.clone())
                .await?
                .with_handler(handler),
        };
        #[cfg(not(feature = "tls"))]
        let server = MllpServer::bind_with_config("127.0.0.1:0", self.config.clone())
            .await?
            .with_handler(handler);

        self.local_addr = Some(server.local_addr()?);
        self.shutdown = Some(server.shutdown_handle());
        self.task = Some(tokio::spawn(async move { server.serve().await }));

        Ok(self)
    }

    pub fn local_addr(&self) -> std::net::SocketAddr {
        self.local_addr.expect("server not started")
    }

    pub fn url(&self) -> String {
        self.local_addr().to_string()
    }

    /// Connect a plain client to this server.
    pub fn client(&self) -> MllpClient {
        MllpClient::with_config(self.url(), ClientConfig::default())
    }

    /// Request a graceful shutdown and wait for the accept task to exit.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.shutdown(Duration::from_millis(500)).await;
        }
        if let Some(task) = self.task.take() {
            let _ = tokio::time::timeout(Duration::from_secs(5), task).await;
        }
        Ok(())
    }
}

impl Default for MockMllpServer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MockMllpServer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rs7_core::{Field, Segment};

    fn sample_message() -> Message {
        let mut msg = Message::default();
        let mut msh = Segment::new("MSH");
        msh.add_field(Field::from_value("|"));
        msh.add_field(Field::from_value("^~\\&"));
        msh.add_field(Field::from_value("SENDER"));
        msh.add_field(Field::from_value("FAC"));
        msh.add_field(Field::from_value("RECEIVER"));
        msh.add_field(Field::from_value("FAC2"));
        msh.add_field(Field::from_value("20240101000000"));
        msh.add_field(Field::from_value(""));
        msh.add_field(Field::from_value("ADT^A01"));
        msh.add_field(Field::from_value("MSG001"));
        msh.add_field(Field::from_value("P"));
        msh.add_field(Field::from_value("2.5"));
        msg.add_segment(msh);
        msg
    }

    #[tokio::test]
    async fn test_mock_server_echo() {
        let server = MockMllpServer::new().start().await.unwrap();
        let client = server.client();

        let msg = sample_message();
        let response = client.send(&msg).await.unwrap();
        assert_eq!(msg.encode(), response.encode());

        client.close().await.unwrap();
        server.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_mock_server_custom_handler() {
        let server = MockMllpServer::new()
            .with_handler(|_msg| {
                let mut ack = Message::default();
                let mut msh = Segment::new("MSH");
                msh.add_field(Field::from_value("|"));
                msh.add_field(Field::from_value("^~\\&"));
                ack.add_segment(msh);

                let mut msa = Segment::new("MSA");
                msa.add_field(Field::from_value("AA"));
                msa.add_field(Field::from_value("MSG001"));
                ack.add_segment(msa);

                Ok(Some(ack))
            })
            .start()
            .await
            .unwrap();

        let client = server.client();
        let response = client.send(&sample_message()).await.unwrap();

        assert_eq!(response.all_segments()[0].id, "MSH");
        assert_eq!(response.all_segments()[1].id, "MSA");
        assert_eq!(response.segment("MSA").unwrap().get_field_value(1), Some("AA"));

        client.close().await.unwrap();
        server.shutdown().await.unwrap();
    }
}
