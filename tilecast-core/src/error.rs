//! Domain-specific error types for the tilecast pipeline.
//!
//! All fallible operations return `Result<T, CastError>`.
//! No panics on invalid input — every error is typed and recoverable.

use thiserror::Error;

/// The canonical error type for the tilecast pipeline.
#[derive(Debug, Error)]
pub enum CastError {
    // ── URI Errors ───────────────────────────────────────────────
    /// The URL string could not be split into scheme, host and path.
    #[error("malformed URI: {0}")]
    MalformedUri(&'static str),

    // ── Filesystem Errors ────────────────────────────────────────
    /// A local image file could not be opened.
    #[error("file not found: {0}")]
    FileNotFound(String),

    // ── Download Errors ──────────────────────────────────────────
    /// The TCP connect did not complete (timed out or was refused).
    #[error("connection timeout: check your internet connection")]
    ConnectionTimeout,

    /// The advertised body length exceeds the image buffer capacity.
    #[error("body of {advertised} bytes exceeds buffer capacity {capacity}")]
    BufferOverflow { advertised: usize, capacity: usize },

    /// The TCP/IO layer reported an error.
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    // ── Decode Errors ────────────────────────────────────────────
    /// The decoder rejected the byte stream as unsupported or corrupt.
    #[error("image format not supported")]
    DecodeUnsupported,

    /// Catch-all for errors that do not fit another variant.
    #[error("{0}")]
    Other(String),
}

// ── Convenient From implementations ──────────────────────────────

impl From<String> for CastError {
    fn from(s: String) -> Self {
        CastError::Other(s)
    }
}

impl From<&str> for CastError {
    fn from(s: &str) -> Self {
        CastError::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = CastError::MalformedUri("no path separator");
        assert!(e.to_string().contains("malformed"));

        let e = CastError::BufferOverflow {
            advertised: 60_000,
            capacity: 50_000,
        };
        assert!(e.to_string().contains("60000"));
        assert!(e.to_string().contains("50000"));
    }

    #[test]
    fn from_string() {
        let e: CastError = "something broke".into();
        assert!(matches!(e, CastError::Other(_)));
    }

    #[test]
    fn from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broke");
        let e: CastError = io_err.into();
        assert!(matches!(e, CastError::Connection(_)));
    }
}
