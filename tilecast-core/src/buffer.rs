//! Bounded byte buffer for a downloaded image.
//!
//! The buffer is owned exclusively by one download attempt at a time;
//! on success it is handed to the decoder, which reads it for the
//! duration of decoding. Writes past the capacity are a typed error,
//! never a silent truncation.

use std::path::Path;

use bytes::BytesMut;

use crate::error::CastError;

/// Default capacity, sized for the JPEG payloads the screen service
/// emits (the device firmware reserved the same 50 000 bytes).
pub const DEFAULT_CAPACITY: usize = 50_000;

// ── ImageBuffer ──────────────────────────────────────────────────

/// A fixed-capacity sink for raw JPEG bytes.
///
/// Bytes are appended in strictly increasing index order: the first
/// body byte lands at index 0.
#[derive(Debug)]
pub struct ImageBuffer {
    data: BytesMut,
    capacity: usize,
}

impl ImageBuffer {
    /// Create an empty buffer with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty buffer bounded at `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
            capacity,
        }
    }

    /// Load a local image file into a fresh buffer.
    ///
    /// A missing file maps to [`CastError::FileNotFound`]; a file
    /// larger than the default capacity is a [`CastError::BufferOverflow`].
    pub async fn from_file(path: &Path) -> Result<Self, CastError> {
        let contents = tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CastError::FileNotFound(path.display().to_string())
            } else {
                CastError::Connection(e)
            }
        })?;

        let mut buf = Self::new();
        buf.check_fits(contents.len())?;
        buf.data.extend_from_slice(&contents);
        Ok(buf)
    }

    /// Upper bound on the number of bytes this buffer will accept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes actually received so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Verify that `advertised` bytes will fit.
    ///
    /// Called before streaming begins so an oversized body fails fast,
    /// before a single byte is copied.
    pub fn check_fits(&self, advertised: usize) -> Result<(), CastError> {
        let remaining = self.capacity - self.data.len();
        if advertised > remaining {
            return Err(CastError::BufferOverflow {
                advertised,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Append a single received byte.
    pub fn push(&mut self, byte: u8) -> Result<(), CastError> {
        if self.data.len() >= self.capacity {
            return Err(CastError::BufferOverflow {
                advertised: self.data.len() + 1,
                capacity: self.capacity,
            });
        }
        self.data.extend_from_slice(&[byte]);
        Ok(())
    }

    /// View of the bytes received so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Discard everything received so far, keeping the capacity.
    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl Default for ImageBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_appends_in_order() {
        let mut buf = ImageBuffer::with_capacity(4);
        buf.push(0xFF).unwrap();
        buf.push(0xD8).unwrap();
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.as_slice(), &[0xFF, 0xD8]);
    }

    #[test]
    fn push_past_capacity_fails() {
        let mut buf = ImageBuffer::with_capacity(2);
        buf.push(1).unwrap();
        buf.push(2).unwrap();
        assert!(matches!(
            buf.push(3),
            Err(CastError::BufferOverflow { .. })
        ));
        // The two accepted bytes are untouched.
        assert_eq!(buf.as_slice(), &[1, 2]);
    }

    #[test]
    fn check_fits_rejects_oversized_body() {
        let buf = ImageBuffer::with_capacity(100);
        assert!(buf.check_fits(100).is_ok());
        assert!(matches!(
            buf.check_fits(101),
            Err(CastError::BufferOverflow {
                advertised: 101,
                capacity: 100,
            })
        ));
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut buf = ImageBuffer::with_capacity(8);
        buf.push(1).unwrap();
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 8);
    }

    #[tokio::test]
    async fn from_file_missing_is_not_found() {
        let err = ImageBuffer::from_file(Path::new("/nonexistent/monkey.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, CastError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn from_file_reads_contents() {
        let path = std::env::temp_dir().join("tilecast_buffer_test.jpg");
        std::fs::write(&path, [0xFFu8, 0xD8, 0xFF, 0xD9]).unwrap();

        let buf = ImageBuffer::from_file(&path).await.unwrap();
        assert_eq!(buf.as_slice(), &[0xFF, 0xD8, 0xFF, 0xD9]);

        std::fs::remove_file(&path).ok();
    }
}
