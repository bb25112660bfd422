//! Display collaborator seam.
//!
//! The physical output is abstracted behind [`PixelDisplay`]: a
//! fixed-size RGB565 surface with a block write and a rectangle fill.
//! [`FramebufferDisplay`] is the in-memory implementation used on
//! hosted builds and in tests; a panel driver would implement the same
//! trait over its own bus.

// ── Colors ───────────────────────────────────────────────────────

/// RGB565 colour constants used by the core.
pub mod color {
    pub const BLACK: u16 = 0x0000;
    pub const RED: u16 = 0xF800;
    pub const WHITE: u16 = 0xFFFF;
}

// ── PixelDisplay ─────────────────────────────────────────────────

/// A bounded pixel surface.
///
/// Implementations are expected to clip `blit` and `fill_rect`
/// against their own right and bottom edges (panel drivers do this in
/// hardware); callers guarantee only that the origin of a `blit` lies
/// within the surface.
pub trait PixelDisplay {
    /// Surface width in pixels.
    fn width(&self) -> u32;

    /// Surface height in pixels.
    fn height(&self) -> u32;

    /// Write a `w × h` block of RGB565 pixels with its top-left corner
    /// at `(x, y)`. `pixels` is row-major with stride `w`.
    fn blit(&mut self, x: i32, y: i32, w: u32, h: u32, pixels: &[u16]);

    /// Fill a rectangle with a solid colour.
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: u16);
}

/// Draw the download progress bar: a thin strip at the top of the
/// surface whose width is proportional to the bytes received.
pub fn draw_progress(display: &mut dyn PixelDisplay, processed: usize, total: usize) {
    if total == 0 {
        return;
    }
    let width = (processed * display.width() as usize / total) as u32;
    display.fill_rect(0, 1, width, 4, color::RED);
}

// ── FramebufferDisplay ───────────────────────────────────────────

/// In-memory RGB565 surface.
pub struct FramebufferDisplay {
    width: u32,
    height: u32,
    pixels: Vec<u16>,
}

impl FramebufferDisplay {
    /// Create a surface of the given size, cleared to white (the
    /// panel's power-on state in this system).
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![color::WHITE; (width * height) as usize],
        }
    }

    /// Create a surface from native panel dimensions and a rotation
    /// setting (0–3, quarter turns). Odd rotations swap the axes.
    pub fn rotated(native_width: u32, native_height: u32, rotation: u8) -> Self {
        if rotation % 2 == 1 {
            Self::new(native_height, native_width)
        } else {
            Self::new(native_width, native_height)
        }
    }

    /// Fill the whole surface with one colour.
    pub fn fill(&mut self, color: u16) {
        self.pixels.fill(color);
    }

    /// Pixel value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> u16 {
        assert!(x < self.width && y < self.height);
        self.pixels[(y * self.width + x) as usize]
    }

    /// The whole surface, row-major.
    pub fn as_slice(&self) -> &[u16] {
        &self.pixels
    }
}

impl PixelDisplay for FramebufferDisplay {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn blit(&mut self, x: i32, y: i32, w: u32, h: u32, pixels: &[u16]) {
        for row in 0..h {
            let dst_y = y + row as i32;
            if dst_y < 0 || dst_y >= self.height as i32 {
                continue;
            }
            for col in 0..w {
                let dst_x = x + col as i32;
                if dst_x < 0 || dst_x >= self.width as i32 {
                    continue;
                }
                let src = (row * w + col) as usize;
                let dst = (dst_y as u32 * self.width + dst_x as u32) as usize;
                self.pixels[dst] = pixels[src];
            }
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: u16) {
        for row in 0..h {
            let dst_y = y + row as i32;
            if dst_y < 0 || dst_y >= self.height as i32 {
                continue;
            }
            for col in 0..w {
                let dst_x = x + col as i32;
                if dst_x < 0 || dst_x >= self.width as i32 {
                    continue;
                }
                self.pixels[(dst_y as u32 * self.width + dst_x as u32) as usize] = color;
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_white() {
        let fb = FramebufferDisplay::new(4, 4);
        assert!(fb.as_slice().iter().all(|&p| p == color::WHITE));
    }

    #[test]
    fn blit_places_pixels() {
        let mut fb = FramebufferDisplay::new(8, 8);
        fb.blit(2, 3, 2, 2, &[1, 2, 3, 4]);
        assert_eq!(fb.pixel(2, 3), 1);
        assert_eq!(fb.pixel(3, 3), 2);
        assert_eq!(fb.pixel(2, 4), 3);
        assert_eq!(fb.pixel(3, 4), 4);
        // Neighbours untouched.
        assert_eq!(fb.pixel(4, 3), color::WHITE);
    }

    #[test]
    fn blit_clips_right_and_bottom() {
        let mut fb = FramebufferDisplay::new(4, 4);
        fb.blit(3, 3, 2, 2, &[9, 9, 9, 9]);
        assert_eq!(fb.pixel(3, 3), 9);
        // Off-surface pixels were discarded without panicking.
    }

    #[test]
    fn fill_rect_covers_region() {
        let mut fb = FramebufferDisplay::new(8, 8);
        fb.fill_rect(0, 1, 5, 4, color::RED);
        assert_eq!(fb.pixel(0, 1), color::RED);
        assert_eq!(fb.pixel(4, 4), color::RED);
        assert_eq!(fb.pixel(5, 1), color::WHITE);
        assert_eq!(fb.pixel(0, 0), color::WHITE);
    }

    #[test]
    fn progress_bar_proportional() {
        let mut fb = FramebufferDisplay::new(100, 10);
        draw_progress(&mut fb, 50, 100);
        assert_eq!(fb.pixel(49, 2), color::RED);
        assert_eq!(fb.pixel(50, 2), color::WHITE);
    }

    #[test]
    fn progress_bar_zero_total_is_noop() {
        let mut fb = FramebufferDisplay::new(10, 10);
        draw_progress(&mut fb, 5, 0);
        assert!(fb.as_slice().iter().all(|&p| p == color::WHITE));
    }

    #[test]
    fn rotation_swaps_axes() {
        let fb = FramebufferDisplay::rotated(240, 320, 1);
        assert_eq!(fb.width(), 320);
        assert_eq!(fb.height(), 240);

        let fb = FramebufferDisplay::rotated(240, 320, 2);
        assert_eq!(fb.width(), 240);
        assert_eq!(fb.height(), 320);
    }
}
