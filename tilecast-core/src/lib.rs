//! # tilecast-core
//!
//! Core library for streaming a JPEG image from an HTTP endpoint onto
//! a bounded pixel display, one coding tile at a time.
//!
//! This crate contains:
//! - **URI**: `ParsedUri` — minimal `{secure, host, path}` splitter
//! - **Buffer**: `ImageBuffer` — fixed-capacity sink for the raw JPEG
//! - **Net**: `Transport` seam, `TcpTransport`, and the streaming
//!   `Downloader` with its cooperative byte loop
//! - **Image**: `TileDecoder` collaborator seam, `ImageInfo`, and the
//!   `CodingTile` with edge-tile row compaction
//! - **Render**: `PixelDisplay` seam, `FramebufferDisplay`, and the
//!   clipping tile renderer
//! - **Session**: connectivity lifecycle state machine and the event
//!   driver that runs the pipeline
//! - **Error**: `CastError` — typed, `thiserror`-based error hierarchy

pub mod buffer;
pub mod error;
pub mod image;
pub mod net;
pub mod render;
pub mod session;
pub mod uri;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use buffer::{DEFAULT_CAPACITY, ImageBuffer};
pub use error::CastError;
pub use image::{CodingTile, ImageInfo, ScanType, TileDecoder};
pub use net::{DownloadSummary, Downloader, TcpTransport, Transport};
pub use render::{FramebufferDisplay, PixelDisplay, RenderStats, render_tiles};
pub use session::{
    FramePipeline, LinkEvent, LinkPhase, LinkState, PipelineConfig, RETRY_LIMIT, ScreenPipeline,
    Session, SessionAction,
};
pub use uri::ParsedUri;
