//! MLLP server: `Serve`/`Shutdown` over a per-connection worker pool.
//!
//! Connection accounting uses two pieces of state updated together: an
//! atomic admission counter (checked against `max_connections`) and a
//! membership set of live connections (used to force-close on a
//! deadline-exceeded shutdown).

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rs7_core::error::{Error, Result, TransportErrorKind};
use rs7_core::message::Message;
use tokio::io::split;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::reader::MllpReader;
use crate::stream::MllpStream;
use crate::writer::write_message;

#[cfg(feature = "tls")]
use crate::tls::TlsServerConfig;
#[cfg(feature = "tls")]
use tokio_rustls::TlsAcceptor;

/// A connection handler: takes one inbound message and returns an optional
/// response (`None` means "no reply") or an error.
pub type Handler = Arc<
    dyn Fn(Message) -> Pin<Box<dyn Future<Output = Result<Option<Message>>> + Send>> + Send + Sync,
>;

/// Server-side MLLP configuration, matching the enumerated options in the
/// external interface contract.
#[derive(Clone)]
pub struct ServerConfig {
    /// Maximum number of concurrently open connections (default: 100).
    pub max_connections: usize,
    /// Per-read deadline applied before each message read (default: 60 s).
    pub read_timeout: Duration,
    /// Per-write deadline applied before each response write (default: 30 s).
    pub write_timeout: Duration,
    /// Maximum accepted request body size (default: 16 MiB).
    pub max_message_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_connections: 100,
            read_timeout: Duration::from_secs(60),
            write_timeout: Duration::from_secs(30),
            max_message_size: crate::frame::DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    pub fn with_max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }
}

/// MLLP server bound to one listening socket.
pub struct MllpServer {
    listener: TcpListener,
    config: ServerConfig,
    handler: Option<Handler>,
    #[cfg(feature = "tls")]
    tls_acceptor: Option<TlsAcceptor>,
    active: Arc<AtomicUsize>,
    connections: Arc<Mutex<HashMap<u64, CancellationToken>>>,
    next_conn_id: AtomicU64,
    shutdown: CancellationToken,
}

impl MllpServer {
    pub async fn bind(addr: &str) -> Result<Self> {
        Self::bind_with_config(addr, ServerConfig::default()).await
    }

    pub async fn bind_with_config(addr: &str, config: ServerConfig) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| Error::transport(TransportErrorKind::DialFailed(e.to_string())))?;

        Ok(Self {
            listener,
            config,
            handler: None,
            #[cfg(feature = "tls")]
            tls_acceptor: None,
            active: Arc::new(AtomicUsize::new(0)),
            connections: Arc::new(Mutex::new(HashMap::new())),
            next_conn_id: AtomicU64::new(0),
            shutdown: CancellationToken::new(),
        })
    }

    #[cfg(feature = "tls")]
    pub async fn bind_tls(addr: &str, tls_config: TlsServerConfig, config: ServerConfig) -> Result<Self> {
        let mut server = Self::bind_with_config(addr, config).await?;
        server.tls_acceptor = Some(TlsAcceptor::from(tls_config.config.clone()));
        Ok(server)
    }

    /// Configure the handler invoked for each inbound message. Required
    /// before `serve`.
    pub fn with_handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn local_addr(&self) -> Result<std::net::SocketAddr> {
        self.listener.local_addr().map_err(Error::Io)
    }

    /// Number of currently open connections.
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// A handle that can be used to call [`MllpServer::shutdown`]-equivalent
    /// behavior from another task while `serve` is running.
    pub fn shutdown_handle(&self) -> ServerShutdown {
        ServerShutdown {
            shutdown: self.shutdown.clone(),
            connections: self.connections.clone(),
            active: self.active.clone(),
        }
    }

    /// Accept connections until shutdown is requested. Returns the
    /// server-closed sentinel error on a clean shutdown.
    pub async fn serve(&self) -> Result<()> {
        let handler = self
            .handler
            .clone()
            .ok_or_else(|| Error::transport(TransportErrorKind::HandlerAbsent))?;

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    return Err(Error::transport(TransportErrorKind::ServerClosed));
                }
                accepted = self.listener.accept() => {
                    let (tcp, _peer) = match accepted {
                        Ok(pair) => pair,
                        Err(e) => {
                            if self.shutdown.is_cancelled() {
                                return Err(Error::transport(TransportErrorKind::ServerClosed));
                            }
                            if matches!(e.kind(), std::io::ErrorKind::Interrupted | std::io::ErrorKind::WouldBlock) {
                                continue;
                            }
                            return Err(Error::Io(e));
                        }
                    };

                    if self.active.load(Ordering::SeqCst) >= self.config.max_connections {
                        tracing::warn!("rejecting connection: max_connections reached");
                        drop(tcp);
                        continue;
                    }

                    self.spawn_worker(tcp, handler.clone()).await;
                }
            }
        }
    }

    async fn spawn_worker(&self, tcp: TcpStream, handler: Handler) {
        let stream = self.upgrade(tcp).await;
        let stream = match stream {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "tls handshake failed");
                return;
            }
        };

        let conn_id = self.next_conn_id.fetch_add(1, Ordering::SeqCst);
        // Independent of `self.shutdown`: the accept loop's cancellation
        // must not itself force-close in-flight workers. Workers are only
        // force-closed explicitly, once the shutdown deadline elapses.
        let token = CancellationToken::new();

        self.active.fetch_add(1, Ordering::SeqCst);
        self.connections.lock().await.insert(conn_id, token.clone());

        let config = self.config.clone();
        let active = self.active.clone();
        let connections = self.connections.clone();

        let span = tracing::info_span!("mllp_connection", conn_id);
        tokio::spawn(
            async move {
                run_connection(stream, config, handler, token).await;
                active.fetch_sub(1, Ordering::SeqCst);
                connections.lock().await.remove(&conn_id);
            }
            .instrument(span),
        );
    }

    #[cfg(feature = "tls")]
    async fn upgrade(&self, tcp: TcpStream) -> Result<MllpStream> {
        if let Some(acceptor) = &self.tls_acceptor {
            let tls_stream = acceptor
                .accept(tcp)
                .await
                .map_err(|e| Error::transport(TransportErrorKind::DialFailed(e.to_string())))?;
            return Ok(MllpStream::TlsServer(tls_stream));
        }
        Ok(MllpStream::Plain(tcp))
    }

    #[cfg(not(feature = "tls"))]
    async fn upgrade(&self, tcp: TcpStream) -> Result<MllpStream> {
        Ok(MllpStream::Plain(tcp))
    }

    /// Stop accepting new connections, drain in-flight workers, and force
    /// close any still open once `deadline` elapses.
    pub async fn shutdown(&self, deadline: Duration) -> Result<()> {
        self.shutdown_handle().shutdown(deadline).await
    }
}

/// A cloneable shutdown trigger, independent of the borrow on `MllpServer`
/// that is blocked inside `serve()`.
#[derive(Clone)]
pub struct ServerShutdown {
    shutdown: CancellationToken,
    connections: Arc<Mutex<HashMap<u64, CancellationToken>>>,
    active: Arc<AtomicUsize>,
}

impl ServerShutdown {
    pub async fn shutdown(&self, deadline: Duration) -> Result<()> {
        self.shutdown.cancel();

        let drained = async {
            while self.active.load(Ordering::SeqCst) > 0 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        };

        tokio::select! {
            _ = drained => Ok(()),
            _ = tokio::time::sleep(deadline) => {
                let conns = self.connections.lock().await;
                for token in conns.values() {
                    token.cancel();
                }
                drop(conns);
                tokio::time::sleep(Duration::from_millis(100)).await;
                Err(Error::transport(TransportErrorKind::ServerClosed))
            }
        }
    }
}

async fn run_connection(stream: MllpStream, config: ServerConfig, handler: Handler, token: CancellationToken) {
    let (read_half, mut write_half) = split(stream);
    let mut reader = MllpReader::with_max_size(read_half, config.max_message_size);

    loop {
        let read = tokio::select! {
            _ = token.cancelled() => break,
            read = tokio::time::timeout(config.read_timeout, reader.read_message()) => read,
        };

        let body = match read {
            Err(_) => {
                tracing::debug!("connection read timed out");
                break;
            }
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "connection closed or framing error");
                break;
            }
            Ok(Ok(body)) => body,
        };

        let message = match rs7_parser::parse(&body) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(error = %e, "dropping unparseable message, connection stays open");
                continue;
            }
        };

        let response = match handler(message).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "handler error, connection stays open");
                continue;
            }
        };

        let Some(response) = response else {
            continue;
        };

        let out = response.encode().into_bytes();
        let wrote = tokio::time::timeout(config.write_timeout, write_message(&mut write_half, &out)).await;
        match wrote {
            Err(_) => {
                tracing::debug!("connection write timed out");
                break;
            }
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "write failed, closing connection");
                break;
            }
            Ok(Ok(())) => {}
        }
    }
}
