//! A stream that is either plain TCP or (with the `tls` feature) TLS over
//! TCP, presented as a single `AsyncRead + AsyncWrite` type so the reader,
//! writer, client, and server can stay transport-agnostic.

use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;

#[cfg(feature = "tls")]
use tokio_rustls::{client::TlsStream as ClientTlsStream, server::TlsStream as ServerTlsStream};

pub enum MllpStream {
    Plain(TcpStream),
    #[cfg(feature = "tls")]
    TlsClient(ClientTlsStream<TcpStream>),
    #[cfg(feature = "tls")]
    TlsServer(ServerTlsStream<TcpStream>),
}

impl AsyncRead for MllpStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            MllpStream::Plain(s) => Pin::new(s).poll_read(cx, buf),
            #[cfg(feature = "tls")]
            MllpStream::TlsClient(s) => Pin::new(s).poll_read(cx, buf),
            #[cfg(feature = "tls")]
            MllpStream::TlsServer(s) => Pin::new(s).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for MllpStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        match self.get_mut() {
            MllpStream::Plain(s) => Pin::new(s).poll_write(cx, buf),
            #[cfg(feature = "tls")]
            MllpStream::TlsClient(s) => Pin::new(s).poll_write(cx, buf),
            #[cfg(feature = "tls")]
            MllpStream::TlsServer(s) => Pin::new(s).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            MllpStream::Plain(s) => Pin::new(s).poll_flush(cx),
            #[cfg(feature = "tls")]
            MllpStream::TlsClient(s) => Pin::new(s).poll_flush(cx),
            #[cfg(feature = "tls")]
            MllpStream::TlsServer(s) => Pin::new(s).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            MllpStream::Plain(s) => Pin::new(s).poll_shutdown(cx),
            #[cfg(feature = "tls")]
            MllpStream::TlsClient(s) => Pin::new(s).poll_shutdown(cx),
            #[cfg(feature = "tls")]
            MllpStream::TlsServer(s) => Pin::new(s).poll_shutdown(cx),
        }
    }
}
