//! Byte-level transport seam between the downloader and the wire.
//!
//! The downloader never touches a socket directly: it sends the
//! request through [`Transport::send`] and then pulls body bytes one
//! at a time with [`Transport::poll_byte`], yielding cooperatively
//! whenever no data is currently available. That pull-style contract
//! mirrors the `available()`/`read()` pair of the embedded network
//! client the wire protocol was designed against, and it keeps the
//! header/body loops testable with a scripted in-memory transport.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::info;

use crate::error::CastError;

/// Port used for plain-HTTP downloads.
pub const HTTP_PORT: u16 = 80;

// ── Transport ────────────────────────────────────────────────────

/// A connected, ordered byte stream.
#[async_trait]
pub trait Transport: Send {
    /// Write the whole request to the peer.
    async fn send(&mut self, data: &[u8]) -> Result<(), CastError>;

    /// Pull the next byte without waiting.
    ///
    /// Returns `Ok(None)` when no data is currently available — the
    /// caller is expected to yield and poll again. A closed peer is an
    /// error: the downloader always knows how many bytes it still
    /// expects, so early EOF is never a clean end of stream.
    fn poll_byte(&mut self) -> Result<Option<u8>, CastError>;
}

// ── TcpTransport ─────────────────────────────────────────────────

/// [`Transport`] over a plain TCP connection.
///
/// TLS for `secure` URLs is the responsibility of a wrapping
/// transport; this type always speaks cleartext on [`HTTP_PORT`].
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Connect to `host` with a deadline.
    ///
    /// Both an elapsed deadline and a refused connection surface
    /// [`CastError::ConnectionTimeout`]; retrying is the session
    /// lifecycle's job, not this layer's.
    pub async fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self, CastError> {
        info!("connecting to {host}:{port}");
        let stream = tokio::time::timeout(timeout, TcpStream::connect((host, port)))
            .await
            .map_err(|_| CastError::ConnectionTimeout)?
            .map_err(|_| CastError::ConnectionTimeout)?;
        stream.set_nodelay(true)?;
        Ok(Self { stream })
    }

    /// The address of the local socket end, used for the optional
    /// diagnostic request body.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr, CastError> {
        Ok(self.stream.local_addr()?)
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, data: &[u8]) -> Result<(), CastError> {
        self.stream.write_all(data).await?;
        self.stream.flush().await?;
        Ok(())
    }

    fn poll_byte(&mut self) -> Result<Option<u8>, CastError> {
        let mut byte = [0u8; 1];
        match self.stream.try_read(&mut byte) {
            Ok(0) => Err(CastError::Connection(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "peer closed the connection",
            ))),
            Ok(_) => Ok(Some(byte[0])),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
