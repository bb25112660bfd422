//! Adapter from the `jpeg-decoder` crate to the core `TileDecoder`
//! seam.
//!
//! `jpeg-decoder` decodes a whole image in one call, so the adapter
//! decodes up front in [`begin`](JpegTileDecoder::begin) and then
//! serves the tile pull loop by slicing 16×16 windows out of the
//! finished pixel plane, padding past the right and bottom edges.

use std::io::Cursor;

use jpeg_decoder::{CodingProcess, Decoder, PixelFormat};
use tilecast_core::{CastError, CodingTile, ImageInfo, ScanType, TileDecoder};
use tracing::debug;

/// Nominal coding-tile edge, in pixels.
pub const MCU_SIZE: u16 = 16;

/// Tile decoder backed by `jpeg-decoder`.
#[derive(Default)]
pub struct JpegTileDecoder {
    /// Decoded image in RGB565, row-major, `width * height` entries.
    pixels: Vec<u16>,
    info: Option<ImageInfo>,
    next: u32,
    aborted: bool,
}

impl JpegTileDecoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TileDecoder for JpegTileDecoder {
    fn begin(&mut self, data: &[u8]) -> Result<ImageInfo, CastError> {
        let mut decoder = Decoder::new(Cursor::new(data));
        let raw = decoder.decode().map_err(|e| {
            debug!("jpeg decode failed: {e}");
            CastError::DecodeUnsupported
        })?;
        // decode() succeeded, so metadata is available.
        let meta = decoder.info().ok_or(CastError::DecodeUnsupported)?;

        let (pixels, components) = match meta.pixel_format {
            PixelFormat::RGB24 => (rgb24_to_rgb565(&raw), 3),
            PixelFormat::L8 => (luma_to_rgb565(&raw), 1),
            PixelFormat::L16 | PixelFormat::CMYK32 => return Err(CastError::DecodeUnsupported),
        };

        let scan_type = match meta.coding_process {
            CodingProcess::DctProgressive => ScanType::Progressive,
            _ => ScanType::Baseline,
        };

        let info = ImageInfo::new(
            meta.width as u32,
            meta.height as u32,
            components,
            scan_type,
            MCU_SIZE,
            MCU_SIZE,
        );

        self.pixels = pixels;
        self.info = Some(info.clone());
        self.next = 0;
        self.aborted = false;
        Ok(info)
    }

    fn next_tile(&mut self) -> Option<CodingTile> {
        let info = self.info.as_ref()?;
        if self.aborted || self.next >= info.mcus_per_row * info.mcus_per_col {
            return None;
        }
        let grid_x = self.next % info.mcus_per_row;
        let grid_y = self.next / info.mcus_per_row;
        self.next += 1;

        let pixels = cut_tile(
            &self.pixels,
            info.width,
            info.height,
            grid_x * MCU_SIZE as u32,
            grid_y * MCU_SIZE as u32,
        );
        Some(CodingTile::new(grid_x, grid_y, MCU_SIZE, MCU_SIZE, pixels))
    }

    fn abort(&mut self) {
        self.aborted = true;
    }
}

// ── Pixel plumbing ───────────────────────────────────────────────

/// Pack one RGB888 triple into RGB565.
fn rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3)
}

fn rgb24_to_rgb565(raw: &[u8]) -> Vec<u16> {
    raw.chunks_exact(3).map(|p| rgb565(p[0], p[1], p[2])).collect()
}

fn luma_to_rgb565(raw: &[u8]) -> Vec<u16> {
    raw.iter().map(|&l| rgb565(l, l, l)).collect()
}

/// Cut a nominal-size tile at `(left, top)` out of the pixel plane.
///
/// Positions past the image edge are filled with zeroes; the renderer
/// never looks at them once the tile's rows are compacted.
fn cut_tile(plane: &[u16], width: u32, height: u32, left: u32, top: u32) -> Vec<u16> {
    let mut out = vec![0u16; MCU_SIZE as usize * MCU_SIZE as usize];
    let copy_w = (width.saturating_sub(left)).min(MCU_SIZE as u32) as usize;
    let copy_h = (height.saturating_sub(top)).min(MCU_SIZE as u32) as usize;
    for row in 0..copy_h {
        let src = ((top as usize + row) * width as usize) + left as usize;
        let dst = row * MCU_SIZE as usize;
        out[dst..dst + copy_w].copy_from_slice(&plane[src..src + copy_w]);
    }
    out
}

// ── Tests ────────────────────────────────────────────────────────
