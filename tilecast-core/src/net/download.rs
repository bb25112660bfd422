//! Streaming HTTP downloader.
//!
//! Sends a `POST` request built from a [`ParsedUri`], parses the
//! response status line and headers, then streams exactly the
//! advertised `Content-Length` bytes into a bounded [`ImageBuffer`],
//! one byte at a time, yielding cooperatively whenever the transport
//! has nothing available. The progress callback is the only externally
//! observable side effect besides the filled buffer.

use std::time::{Duration, Instant};

use bytes::{BufMut, BytesMut};
use tracing::{debug, info, trace, warn};

use crate::buffer::ImageBuffer;
use crate::error::CastError;
use crate::net::transport::Transport;
use crate::uri::ParsedUri;

/// Progress callback cadence: one report per this many body bytes.
const PROGRESS_INTERVAL: usize = 10;

/// Header name matched (case-sensitively) for the body length.
const CONTENT_LENGTH: &str = "Content-Length:";

/// Status line prefix recognised as a success.
const STATUS_OK: &str = "HTTP/1.1 200 OK";

// ── Request construction ─────────────────────────────────────────

/// Assemble the request the screen service expects.
///
/// ```text
/// POST <path> HTTP/1.1
/// Host: <host>
/// Authorization: Bearer <token>        (only when a token is set)
/// Content-Type: ...                    (only with a diagnostic body)
/// Content-Length: <n>
///
/// ip=<local address>
/// ```
///
/// The diagnostic body reports the device's local address to the
/// server and is gated by configuration; the normal path sends no
/// body at all.
pub fn build_request(uri: &ParsedUri<'_>, bearer: Option<&str>, local_addr: Option<&str>) -> BytesMut {
    let mut req = BytesMut::with_capacity(300);
    req.put_slice(b"POST ");
    req.put_slice(uri.path.as_bytes());
    req.put_slice(b" HTTP/1.1\r\nHost: ");
    req.put_slice(uri.host.as_bytes());
    req.put_slice(b"\r\n");

    if let Some(token) = bearer.filter(|t| !t.is_empty()) {
        req.put_slice(b"Authorization: Bearer ");
        req.put_slice(token.as_bytes());
        req.put_slice(b"\r\n");
    }

    match local_addr {
        Some(addr) => {
            let body = format!("ip={addr}");
            req.put_slice(b"Content-Type: application/x-www-form-urlencoded\r\n");
            req.put_slice(format!("Content-Length: {}\r\n\r\n", body.len()).as_bytes());
            req.put_slice(body.as_bytes());
        }
        None => req.put_slice(b"\r\n"),
    }

    req
}

// ── ResponseHeaders ──────────────────────────────────────────────

/// Accumulated response metadata, discarded once the header/body
/// boundary is reached.
#[derive(Debug, Default)]
pub struct ResponseHeaders {
    /// Whether the status line began with `HTTP/1.1 200 OK`.
    pub status_ok: bool,
    /// Value of the `Content-Length` header, 0 until seen.
    pub content_length: usize,
}

impl ResponseHeaders {
    /// Absorb one header line (terminator stripped of its `\n`).
    ///
    /// Returns `true` when the line is the blank header/body boundary.
    pub fn absorb_line(&mut self, line: &str) -> bool {
        if line == "\r" || line.is_empty() {
            return true;
        }
        if !self.status_ok {
            self.status_ok = line.starts_with(STATUS_OK);
        }
        if let Some(rest) = line.strip_prefix(CONTENT_LENGTH) {
            self.content_length = rest.trim().parse().unwrap_or(0);
        }
        false
    }
}

// ── DownloadSummary ──────────────────────────────────────────────

/// Outcome of a completed download, exposed for diagnostics.
#[derive(Debug, Clone)]
pub struct DownloadSummary {
    /// Whether the server answered `200 OK`. A `false` here is logged
    /// but not fatal; strict callers may treat it as an error.
    pub status_ok: bool,
    /// Body length advertised by the server and actually received.
    pub content_length: usize,
    /// Wall-clock duration of the full request/response exchange.
    pub elapsed: Duration,
}

// ── Downloader ───────────────────────────────────────────────────

/// Streams one image over an already-connected [`Transport`].
pub struct Downloader<T: Transport> {
    transport: T,
    /// Local address to report in the diagnostic request body, when
    /// that logging is enabled.
    diagnostic_addr: Option<String>,
}

impl<T: Transport> Downloader<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            diagnostic_addr: None,
        }
    }

    /// Enable the diagnostic `ip=<addr>` request body.
    pub fn with_diagnostic_addr(mut self, addr: String) -> Self {
        self.diagnostic_addr = Some(addr);
        self
    }

    /// Perform the download.
    ///
    /// Streams exactly `Content-Length` bytes into `buffer`, the first
    /// body byte at index 0, invoking `on_progress(received, total)`
    /// every [`PROGRESS_INTERVAL`] bytes. The advertised length is
    /// validated against the buffer capacity before any body byte is
    /// copied; an oversized body fails with
    /// [`CastError::BufferOverflow`] up front.
    pub async fn download<F>(
        &mut self,
        uri: &ParsedUri<'_>,
        bearer: Option<&str>,
        buffer: &mut ImageBuffer,
        mut on_progress: F,
    ) -> Result<DownloadSummary, CastError>
    where
        F: FnMut(usize, usize),
    {
        let started = Instant::now();

        let request = build_request(uri, bearer, self.diagnostic_addr.as_deref());
        debug!("sending request to {}", uri.host);
        self.transport.send(&request).await?;

        // Headers: line by line until the blank boundary.
        let mut headers = ResponseHeaders::default();
        loop {
            let line = self.read_line().await?;
            trace!("header: {}", line.trim_end());
            if headers.absorb_line(&line) {
                debug!("headers received");
                break;
            }
        }

        if !headers.status_ok {
            warn!("response status was not 200 OK");
        }
        info!("image length: {} bytes", headers.content_length);

        // Fail fast before the first body byte lands.
        buffer.check_fits(headers.content_length)?;

        // Body: exactly [0, content_length) bytes, in order.
        let mut received = 0usize;
        while received < headers.content_length {
            match self.transport.poll_byte()? {
                Some(byte) => {
                    buffer.push(byte)?;
                    received += 1;
                    if received % PROGRESS_INTERVAL == 0 {
                        on_progress(received, headers.content_length);
                    }
                }
                // Nothing available yet: let the network stack run.
                None => tokio::task::yield_now().await,
            }
        }

        let elapsed = started.elapsed();
        info!("JPG download: {} ms", elapsed.as_millis());

        Ok(DownloadSummary {
            status_ok: headers.status_ok,
            content_length: headers.content_length,
            elapsed,
        })
    }

    /// Read one response line, up to and excluding `\n`.
    ///
    /// The carriage return, if any, stays in the returned string so
    /// the boundary check can see the bare `"\r"` line.
    async fn read_line(&mut self) -> Result<String, CastError> {
        let mut line = Vec::new();
        loop {
            match self.transport.poll_byte()? {
                Some(b'\n') => return Ok(String::from_utf8_lossy(&line).into_owned()),
                Some(byte) => line.push(byte),
                None => tokio::task::yield_now().await,
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;

    /// Transport fed from a script. `None` entries simulate moments
    /// where no data is available yet.
    struct ScriptedTransport {
        script: VecDeque<Option<u8>>,
        sent: Vec<u8>,
    }

    impl ScriptedTransport {
        fn new(response: &[u8], stall_every: usize) -> Self {
            let mut script = VecDeque::new();
            for (i, &b) in response.iter().enumerate() {
                if stall_every > 0 && i % stall_every == 0 {
                    script.push_back(None);
                }
                script.push_back(Some(b));
            }
            Self {
                script,
                sent: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&mut self, data: &[u8]) -> Result<(), CastError> {
            self.sent.extend_from_slice(data);
            Ok(())
        }

        fn poll_byte(&mut self) -> Result<Option<u8>, CastError> {
            match self.script.pop_front() {
                Some(entry) => Ok(entry),
                None => Err(CastError::Connection(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "script exhausted",
                ))),
            }
        }
    }

    fn response_with_body(body: &[u8]) -> Vec<u8> {
        let mut resp = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\n\r\n",
            body.len()
        )
        .into_bytes();
        resp.extend_from_slice(body);
        resp
    }

    fn uri() -> ParsedUri<'static> {
        ParsedUri::parse("http://cale.es/img/screen.jpg").unwrap()
    }

    // ── Request construction ─────────────────────────────────────

    #[test]
    fn request_minimal() {
        let req = build_request(&uri(), None, None);
        assert_eq!(
            &req[..],
            b"POST /img/screen.jpg HTTP/1.1\r\nHost: cale.es\r\n\r\n"
        );
    }

    #[test]
    fn request_with_bearer() {
        let req = build_request(&uri(), Some("s3cret"), None);
        let text = std::str::from_utf8(&req).unwrap();
        assert!(text.contains("Authorization: Bearer s3cret\r\n"));
        assert!(text.ends_with("\r\n\r\n"));
    }

    #[test]
    fn empty_bearer_is_omitted() {
        let req = build_request(&uri(), Some(""), None);
        let text = std::str::from_utf8(&req).unwrap();
        assert!(!text.contains("Authorization"));
    }

    #[test]
    fn request_with_diagnostic_body() {
        let req = build_request(&uri(), None, Some("192.168.1.7"));
        let text = std::str::from_utf8(&req).unwrap();
        assert!(text.contains("Content-Type: application/x-www-form-urlencoded\r\n"));
        // body is "ip=192.168.1.7" → 14 bytes
        assert!(text.contains("Content-Length: 14\r\n\r\nip=192.168.1.7"));
    }

    // ── Header parsing ───────────────────────────────────────────

    #[test]
    fn headers_absorb_status_and_length() {
        let mut h = ResponseHeaders::default();
        assert!(!h.absorb_line("HTTP/1.1 200 OK\r"));
        assert!(!h.absorb_line("Content-Length: 1234\r"));
        assert!(h.absorb_line("\r"));
        assert!(h.status_ok);
        assert_eq!(h.content_length, 1234);
    }

    #[test]
    fn headers_non_200_status() {
        let mut h = ResponseHeaders::default();
        h.absorb_line("HTTP/1.1 404 Not Found\r");
        assert!(!h.status_ok);
    }

    #[test]
    fn headers_name_is_case_sensitive() {
        let mut h = ResponseHeaders::default();
        h.absorb_line("content-length: 99\r");
        assert_eq!(h.content_length, 0);
    }

    // ── Body streaming ───────────────────────────────────────────

    #[tokio::test]
    async fn downloads_exact_body() {
        let body: Vec<u8> = (0u8..=255).cycle().take(500).collect();
        let transport = ScriptedTransport::new(&response_with_body(&body), 0);
        let mut dl = Downloader::new(transport);
        let mut buf = ImageBuffer::with_capacity(1000);

        let summary = dl
            .download(&uri(), None, &mut buf, |_, _| {})
            .await
            .unwrap();

        assert!(summary.status_ok);
        assert_eq!(summary.content_length, 500);
        assert_eq!(buf.len(), 500);
        // No off-by-one: byte 0 of the body is byte 0 of the buffer.
        assert_eq!(buf.as_slice(), &body[..]);
    }

    #[tokio::test]
    async fn stalls_do_not_lose_bytes() {
        let body: Vec<u8> = (1u8..=200).collect();
        // A stall before every third byte.
        let transport = ScriptedTransport::new(&response_with_body(&body), 3);
        let mut dl = Downloader::new(transport);
        let mut buf = ImageBuffer::with_capacity(1000);

        dl.download(&uri(), None, &mut buf, |_, _| {}).await.unwrap();
        assert_eq!(buf.as_slice(), &body[..]);
    }

    #[tokio::test]
    async fn oversized_body_fails_before_copying() {
        let body = vec![0xAB; 64];
        let transport = ScriptedTransport::new(&response_with_body(&body), 0);
        let mut dl = Downloader::new(transport);
        let mut buf = ImageBuffer::with_capacity(32);

        let err = dl
            .download(&uri(), None, &mut buf, |_, _| {})
            .await
            .unwrap_err();
        assert!(matches!(err, CastError::BufferOverflow { .. }));
        assert!(buf.is_empty());
    }

    #[tokio::test]
    async fn progress_cadence_every_ten_bytes() {
        let body = vec![0u8; 25];
        let transport = ScriptedTransport::new(&response_with_body(&body), 0);
        let mut dl = Downloader::new(transport);
        let mut buf = ImageBuffer::with_capacity(100);

        let mut calls = Vec::new();
        dl.download(&uri(), None, &mut buf, |done, total| {
            calls.push((done, total));
        })
        .await
        .unwrap();

        assert_eq!(calls, vec![(10, 25), (20, 25)]);
    }

    #[tokio::test]
    async fn non_200_still_reads_body() {
        let body = b"not found".to_vec();
        let mut resp = format!(
            "HTTP/1.1 404 Not Found\r\nContent-Length: {}\r\n\r\n",
            body.len()
        )
        .into_bytes();
        resp.extend_from_slice(&body);

        let transport = ScriptedTransport::new(&resp, 0);
        let mut dl = Downloader::new(transport);
        let mut buf = ImageBuffer::with_capacity(100);

        let summary = dl
            .download(&uri(), None, &mut buf, |_, _| {})
            .await
            .unwrap();
        assert!(!summary.status_ok);
        assert_eq!(buf.as_slice(), &body[..]);
    }

    #[tokio::test]
    async fn request_sent_verbatim() {
        let transport = ScriptedTransport::new(&response_with_body(b""), 0);
        let mut dl = Downloader::new(transport);
        let mut buf = ImageBuffer::with_capacity(16);

        dl.download(&uri(), Some("tok"), &mut buf, |_, _| {})
            .await
            .unwrap();

        let sent = String::from_utf8(dl.transport.sent.clone()).unwrap();
        assert!(sent.starts_with("POST /img/screen.jpg HTTP/1.1\r\n"));
        assert!(sent.contains("Host: cale.es\r\n"));
        assert!(sent.contains("Authorization: Bearer tok\r\n"));
    }

    #[tokio::test]
    async fn eof_mid_body_is_connection_error() {
        let body = vec![7u8; 100];
        let mut resp = response_with_body(&body);
        resp.truncate(resp.len() - 40); // drop the tail of the body

        let transport = ScriptedTransport::new(&resp, 0);
        let mut dl = Downloader::new(transport);
        let mut buf = ImageBuffer::with_capacity(200);

        let err = dl
            .download(&uri(), None, &mut buf, |_, _| {})
            .await
            .unwrap_err();
        assert!(matches!(err, CastError::Connection(_)));
    }
}
