//! Render layer: the display-collaborator seam and the tile renderer
//! that streams coding tiles onto it.

pub mod display;
pub mod renderer;

pub use display::{FramebufferDisplay, PixelDisplay, color, draw_progress};
pub use renderer::{RenderStats, render_tiles};
