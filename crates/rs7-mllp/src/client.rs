//! MLLP client: one connection, lazy or eager dial, retry with backoff, and
//! a mutex that serializes concurrent `send` calls into one in-flight
//! request/response pair at a time.

use std::time::Duration;

use rs7_core::error::{Error, Result, TransportErrorKind};
use rs7_core::message::Message;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::reader::MllpReader;
use crate::stream::MllpStream;
use crate::writer::write_message;

#[cfg(feature = "tls")]
use crate::tls::TlsClientConfig;
#[cfg(feature = "tls")]
use rustls::pki_types::ServerName;
#[cfg(feature = "tls")]
use tokio_rustls::TlsConnector;

/// Client-side MLLP configuration, matching the enumerated options in the
/// external interface contract.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-call round-trip deadline when the caller supplies no deadline of
    /// its own (default: 30 s).
    pub timeout: Duration,
    /// Extra attempts after the first failure (default: 0 — no retries).
    pub retry_attempts: usize,
    /// Delay between retries (default: 1 s).
    pub retry_backoff: Duration,
    /// Maximum accepted response body size (default: 16 MiB).
    pub max_message_size: usize,
    /// Best-effort TCP keep-alive preference; accepted for API completeness,
    /// see DESIGN.md for why it is not wired to a socket option.
    pub keep_alive: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry_attempts: 0,
            retry_backoff: Duration::from_secs(1),
            max_message_size: crate::frame::DEFAULT_MAX_MESSAGE_SIZE,
            keep_alive: true,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_attempts(mut self, attempts: usize) -> Self {
        self.retry_attempts = attempts;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn with_max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }

    pub fn with_keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }
}

/// MLLP client bound to one remote address.
pub struct MllpClient {
    addr: String,
    config: ClientConfig,
    #[cfg(feature = "tls")]
    tls: Option<(TlsClientConfig, String)>,
    conn: Mutex<Option<MllpStream>>,
}

impl MllpClient {
    /// Build a client that connects lazily, on the first `send`.
    pub fn new(addr: impl Into<String>) -> Self {
        Self::with_config(addr, ClientConfig::default())
    }

    pub fn with_config(addr: impl Into<String>, config: ClientConfig) -> Self {
        Self {
            addr: addr.into(),
            config,
            #[cfg(feature = "tls")]
            tls: None,
            conn: Mutex::new(None),
        }
    }

    #[cfg(feature = "tls")]
    pub fn with_tls(addr: impl Into<String>, server_name: impl Into<String>, tls: TlsClientConfig, config: ClientConfig) -> Self {
        Self {
            addr: addr.into(),
            config,
            tls: Some((tls, server_name.into())),
            conn: Mutex::new(None),
        }
    }

    /// Build a client and connect immediately ("eager" dial).
    pub async fn dial(addr: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let client = Self::with_config(addr, config);
        {
            let mut guard = client.conn.lock().await;
            *guard = Some(client.connect().await?);
        }
        Ok(client)
    }

    async fn connect(&self) -> Result<MllpStream> {
        let tcp = tokio::time::timeout(self.config.timeout, TcpStream::connect(&self.addr))
            .await
            .map_err(|_| Error::transport(TransportErrorKind::DialFailed(format!("timed out connecting to {}", self.addr))))?
            .map_err(|e| Error::transport(TransportErrorKind::DialFailed(e.to_string())))?;

        #[cfg(feature = "tls")]
        if let Some((tls_config, server_name)) = &self.tls {
            let connector = TlsConnector::from(tls_config.config.clone());
            let name = ServerName::try_from(server_name.clone())
                .map_err(|e| Error::transport(TransportErrorKind::DialFailed(format!("invalid server name: {}", e))))?;
            let tls_stream = connector
                .connect(name, tcp)
                .await
                .map_err(|e| Error::transport(TransportErrorKind::DialFailed(format!("TLS handshake failed: {}", e))))?;
            tracing::debug!(addr = %self.addr, "mllp client connected (tls)");
            return Ok(MllpStream::TlsClient(tls_stream));
        }

        tracing::debug!(addr = %self.addr, "mllp client connected");
        Ok(MllpStream::Plain(tcp))
    }

    /// Send a message and wait for the response, serialized against any
    /// other in-flight call on this client. Retries per `ClientConfig`.
    pub async fn send(&self, message: &Message) -> Result<Message> {
        let mut guard = self.conn.lock().await;
        let attempts = self.config.retry_attempts + 1;
        let mut last_err = None;

        for attempt in 0..attempts {
            match self.try_send(&mut guard, message).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    tracing::warn!(attempt = attempt + 1, error = %e, "mllp send attempt failed");
                    *guard = None;
                    last_err = Some(e);
                    if attempt + 1 < attempts {
                        tokio::time::sleep(self.config.retry_backoff).await;
                    }
                }
            }
        }

        Err(Error::transport(TransportErrorKind::DialFailed(format!(
            "send failed after {} attempt(s): {}",
            attempts,
            last_err.expect("at least one attempt recorded an error")
        ))))
    }

    /// Send a message without waiting for the response.
    pub async fn send_async(&self, message: &Message) -> Result<()> {
        let mut guard = self.conn.lock().await;
        if guard.is_none() {
            *guard = Some(self.connect().await?);
        }
        let stream = guard.as_mut().expect("connection established above");
        let body = message.encode().into_bytes();
        tokio::time::timeout(self.config.timeout, write_message(stream, &body))
            .await
            .map_err(|_| Error::transport(TransportErrorKind::WriteTimeout))??;
        Ok(())
    }

    async fn try_send(&self, guard: &mut Option<MllpStream>, message: &Message) -> Result<Message> {
        if guard.is_none() {
            *guard = Some(self.connect().await?);
        }
        let stream = guard.as_mut().expect("connection established above");

        let body = message.encode().into_bytes();
        tokio::time::timeout(self.config.timeout, write_message(stream, &body))
            .await
            .map_err(|_| Error::transport(TransportErrorKind::WriteTimeout))??;

        let mut reader = MllpReader::with_max_size(stream, self.config.max_message_size);
        let response_body = tokio::time::timeout(self.config.timeout, reader.read_message())
            .await
            .map_err(|_| Error::transport(TransportErrorKind::ReadTimeout))??;

        rs7_parser::parse(&response_body)
    }

    /// Close the underlying connection, if any.
    pub async fn close(&self) -> Result<()> {
        use tokio::io::AsyncWriteExt;
        let mut guard = self.conn.lock().await;
        if let Some(mut stream) = guard.take() {
            stream.shutdown().await.map_err(Error::Io)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.retry_attempts, 0);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retry_backoff, Duration::from_secs(1));
        assert!(config.keep_alive);
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_retry_attempts(2)
            .with_retry_backoff(Duration::from_millis(10));
        assert_eq!(config.retry_attempts, 2);
        assert_eq!(config.retry_backoff, Duration::from_millis(10));
    }
}
