//! Coding tiles — the decoder's atomic output unit.
//!
//! Block-based codecs emit fixed-size pixel tiles (JPEG calls them
//! MCUs, typically 16×16). Tiles on the right column or bottom row of
//! the grid carry fewer valid pixels than the nominal size when the
//! image dimensions are not exact multiples of the tile size; before
//! such an edge tile can be blitted, its valid region must be made
//! contiguous by compacting rows from the nominal stride down to the
//! effective stride.

// ── CodingTile ───────────────────────────────────────────────────

/// One decoded coding block, positioned on the tile grid.
///
/// `pixels` is row-major RGB565 at the nominal stride and always holds
/// `width * height` entries; after [`compact_rows`](Self::compact_rows)
/// only the leading `effective_w * effective_h` entries are meaningful.
#[derive(Debug, Clone)]
pub struct CodingTile {
    /// Column of this tile in the coding-block grid.
    pub grid_x: u32,
    /// Row of this tile in the coding-block grid.
    pub grid_y: u32,
    /// Nominal tile width in pixels.
    pub width: u16,
    /// Nominal tile height in pixels.
    pub height: u16,
    /// RGB565 pixel data, `width * height` entries.
    pub pixels: Vec<u16>,
}

impl CodingTile {
    /// Construct a tile, validating the buffer size.
    ///
    /// # Panics
    ///
    /// Panics if `pixels` does not hold exactly `width * height`
    /// entries; a decoder producing anything else is broken.
    pub fn new(grid_x: u32, grid_y: u32, width: u16, height: u16, pixels: Vec<u16>) -> Self {
        assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            grid_x,
            grid_y,
            width,
            height,
            pixels,
        }
    }

    /// Compact the valid `effective_w × effective_h` region so its
    /// rows become contiguous.
    ///
    /// Row `r` of the valid region moves from offset `r * width` (the
    /// nominal stride the decoder wrote at) to `r * effective_w`. The
    /// copy preserves pixel values exactly and never reaches outside
    /// the tile's allocated extent. Row 0 is already in place.
    pub fn compact_rows(&mut self, effective_w: u16, effective_h: u16) {
        debug_assert!(effective_w <= self.width);
        debug_assert!(effective_h <= self.height);

        let nominal = self.width as usize;
        let eff_w = effective_w as usize;
        for row in 1..effective_h as usize {
            let src = row * nominal;
            let dst = row * eff_w;
            self.pixels.copy_within(src..src + eff_w, dst);
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Tile whose pixel at (x, y) encodes its own coordinates, so any
    /// displaced pixel is immediately visible.
    fn patterned(width: u16, height: u16) -> CodingTile {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((y << 8) | x);
            }
        }
        CodingTile::new(0, 0, width, height, pixels)
    }

    #[test]
    fn compaction_preserves_values() {
        let mut tile = patterned(16, 16);
        tile.compact_rows(5, 16);

        for y in 0..16u16 {
            for x in 0..5u16 {
                let got = tile.pixels[y as usize * 5 + x as usize];
                assert_eq!(got, (y << 8) | x, "pixel ({x},{y}) displaced");
            }
        }
    }

    #[test]
    fn compaction_with_cropped_height() {
        let mut tile = patterned(16, 16);
        tile.compact_rows(7, 9);

        for y in 0..9u16 {
            for x in 0..7u16 {
                assert_eq!(tile.pixels[y as usize * 7 + x as usize], (y << 8) | x);
            }
        }
    }

    #[test]
    fn full_width_compaction_is_identity() {
        let mut tile = patterned(16, 16);
        let before = tile.pixels.clone();
        tile.compact_rows(16, 16);
        assert_eq!(tile.pixels, before);
    }

    #[test]
    fn buffer_extent_unchanged() {
        let mut tile = patterned(16, 16);
        tile.compact_rows(3, 4);
        assert_eq!(tile.pixels.len(), 256);
    }

    #[test]
    #[should_panic]
    fn wrong_buffer_size_panics() {
        CodingTile::new(0, 0, 16, 16, vec![0; 10]);
    }
}
