//! Tile renderer.
//!
//! Pulls coding tiles from the decoder in grid order and blits them to
//! the display, cropping edge tiles down to their valid region and
//! clipping the pass against the physical surface. Rendering performs
//! no network or decode work of its own; its only outputs are display
//! writes and at most one decoder abort.

use std::time::{Duration, Instant};

use tracing::info;

use crate::image::decode::{ImageInfo, TileDecoder};
use crate::render::display::PixelDisplay;

// ── RenderStats ──────────────────────────────────────────────────

/// Diagnostics for one full render pass.
#[derive(Debug, Clone, Default)]
pub struct RenderStats {
    /// Wall-clock duration of the pass.
    pub elapsed: Duration,
    /// Tiles blitted to the display.
    pub tiles_drawn: u32,
    /// Tiles consumed but not blitted (off-surface).
    pub tiles_skipped: u32,
    /// Whether the decoder was told to stop early.
    pub aborted: bool,
}

// ── render_tiles ─────────────────────────────────────────────────

/// Render the decoded image with its top-left corner at
/// `(origin_x, origin_y)` on `display`.
///
/// For each tile the nominal position is derived from its grid
/// coordinates; tiles on the image's right or bottom edge are first
/// row-compacted to their effective size. A tile whose origin lies at
/// or beyond the display bounds is skipped without stopping the pass,
/// except that the first such tile whose bottom edge also reaches the
/// display height aborts the decoder — every remaining tile would be
/// invisible too.
pub fn render_tiles<S, D>(
    decoder: &mut S,
    info: &ImageInfo,
    origin_x: i32,
    origin_y: i32,
    display: &mut D,
) -> RenderStats
where
    S: TileDecoder + ?Sized,
    D: PixelDisplay + ?Sized,
{
    let started = Instant::now();
    let mut stats = RenderStats::default();

    let mcu_w = info.mcu_width as i32;
    let mcu_h = info.mcu_height as i32;

    // Right and bottom edges of the image in display space.
    let max_x = info.width as i32 + origin_x;
    let max_y = info.height as i32 + origin_y;

    // Valid size of edge tiles; a zero remainder means the grid fits
    // exactly and edge tiles are full tiles.
    let rem_w = (info.width % info.mcu_width as u32) as i32;
    let edge_w = if rem_w == 0 { mcu_w } else { rem_w };
    let rem_h = (info.height % info.mcu_height as u32) as i32;
    let edge_h = if rem_h == 0 { mcu_h } else { rem_h };

    let disp_w = display.width() as i32;
    let disp_h = display.height() as i32;

    while let Some(mut tile) = decoder.next_tile() {
        let mcu_x = tile.grid_x as i32 * mcu_w + origin_x;
        let mcu_y = tile.grid_y as i32 * mcu_h + origin_y;

        let win_w = if mcu_x + mcu_w <= max_x { mcu_w } else { edge_w };
        let win_h = if mcu_y + mcu_h <= max_y { mcu_h } else { edge_h };

        // The decoder wrote at the nominal stride; narrower tiles need
        // their rows made contiguous before the block write.
        if win_w != mcu_w {
            tile.compact_rows(win_w as u16, win_h as u16);
        }

        if mcu_x < disp_w && mcu_y < disp_h {
            let valid = (win_w * win_h) as usize;
            display.blit(mcu_x, mcu_y, win_w as u32, win_h as u32, &tile.pixels[..valid]);
            stats.tiles_drawn += 1;
        } else if mcu_y + win_h >= disp_h {
            // Everything from here on is below the surface.
            decoder.abort();
            stats.tiles_skipped += 1;
            stats.aborted = true;
            break;
        } else {
            stats.tiles_skipped += 1;
        }
    }

    stats.elapsed = started.elapsed();
    info!("total render time was {} ms", stats.elapsed.as_millis());
    stats
}

// ── Tests ────────────────────────────────────────────────────────
