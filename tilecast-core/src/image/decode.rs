//! Decoder collaborator seam.
//!
//! The JPEG entropy decoder is an external capability this crate
//! consumes, not implements. A [`TileDecoder`] is primed with the raw
//! byte buffer and then acts as a lazy, finite, non-restartable
//! sequence of [`CodingTile`]s, pulled one at a time in row-major grid
//! order. The renderer can cut the sequence short with
//! [`abort`](TileDecoder::abort) once the visible region is exhausted.

use tracing::info;

use crate::error::CastError;
use crate::image::tile::CodingTile;

// ── ScanType ─────────────────────────────────────────────────────

/// JPEG scan organisation reported by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanType {
    #[default]
    Baseline,
    Progressive,
}

impl std::fmt::Display for ScanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Baseline => write!(f, "baseline"),
            Self::Progressive => write!(f, "progressive"),
        }
    }
}

// ── ImageInfo ────────────────────────────────────────────────────

/// Metadata the decoder exposes once decoding has begun.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Colour component count (3 for YCbCr, 1 for grayscale).
    pub components: u8,
    /// Scan organisation.
    pub scan_type: ScanType,
    /// Nominal coding-tile width (typically 16).
    pub mcu_width: u16,
    /// Nominal coding-tile height (typically 16).
    pub mcu_height: u16,
    /// Tiles per grid row.
    pub mcus_per_row: u32,
    /// Tiles per grid column.
    pub mcus_per_col: u32,
}

impl ImageInfo {
    /// Build the metadata, deriving the grid dimensions from the image
    /// and tile sizes (edge tiles count as full grid cells).
    pub fn new(
        width: u32,
        height: u32,
        components: u8,
        scan_type: ScanType,
        mcu_width: u16,
        mcu_height: u16,
    ) -> Self {
        Self {
            width,
            height,
            components,
            scan_type,
            mcu_width,
            mcu_height,
            mcus_per_row: width.div_ceil(mcu_width as u32),
            mcus_per_col: height.div_ceil(mcu_height as u32),
        }
    }

    /// Diagnostic dump of the decoded image's properties.
    pub fn log_summary(&self) {
        info!("JPEG image info");
        info!("width      : {}", self.width);
        info!("height     : {}", self.height);
        info!("components : {}", self.components);
        info!("MCU / row  : {}", self.mcus_per_row);
        info!("MCU / col  : {}", self.mcus_per_col);
        info!("scan type  : {}", self.scan_type);
        info!("MCU width  : {}", self.mcu_width);
        info!("MCU height : {}", self.mcu_height);
    }
}

// ── TileDecoder ──────────────────────────────────────────────────

/// External decoder that turns a JPEG byte buffer into coding tiles.
pub trait TileDecoder {
    /// Prime the decoder with a raw JPEG buffer.
    ///
    /// Returns the image metadata on success; a stream the decoder
    /// cannot handle surfaces [`CastError::DecodeUnsupported`].
    fn begin(&mut self, data: &[u8]) -> Result<ImageInfo, CastError>;

    /// Pull the next tile, in row-major grid order.
    ///
    /// Returns `None` once the image is exhausted or after
    /// [`abort`](Self::abort) has been called. The sequence is not
    /// restartable without calling [`begin`](Self::begin) again.
    fn next_tile(&mut self) -> Option<CodingTile>;

    /// Stop producing tiles; subsequent `next_tile` calls yield `None`.
    fn abort(&mut self);
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_dimensions_exact_multiple() {
        let info = ImageInfo::new(64, 32, 3, ScanType::Baseline, 16, 16);
        assert_eq!(info.mcus_per_row, 4);
        assert_eq!(info.mcus_per_col, 2);
    }

    #[test]
    fn grid_dimensions_with_remainder() {
        let info = ImageInfo::new(70, 33, 3, ScanType::Baseline, 16, 16);
        assert_eq!(info.mcus_per_row, 5);
        assert_eq!(info.mcus_per_col, 3);
    }

    #[test]
    fn scan_type_display() {
        assert_eq!(ScanType::Baseline.to_string(), "baseline");
        assert_eq!(ScanType::Progressive.to_string(), "progressive");
    }
}
