//! Frame pipeline — the success path of one session round.
//!
//! [`ScreenPipeline`] glues the layers together: parse the configured
//! URL, connect, stream the JPEG into the bounded buffer while drawing
//! the progress strip, prime the decoder, and blit the tiles. The
//! [`FramePipeline`] trait is the seam the session driver talks
//! through, so lifecycle tests can run against a mock.

use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::buffer::ImageBuffer;
use crate::error::CastError;
use crate::image::decode::TileDecoder;
use crate::net::download::Downloader;
use crate::net::transport::{HTTP_PORT, TcpTransport};
use crate::render::display::{PixelDisplay, color, draw_progress};
use crate::render::renderer::{RenderStats, render_tiles};
use crate::uri::ParsedUri;

// ── FramePipeline ────────────────────────────────────────────────

/// The operations the session driver invokes on the pipeline.
#[async_trait]
pub trait FramePipeline: Send {
    /// Download the configured image, decode it and render it.
    async fn fetch_and_render(&mut self) -> Result<(), CastError>;

    /// Ask the connectivity subsystem to re-join the network.
    async fn reconnect(&mut self, attempt: u8);

    /// Put a terminal failure in front of the user.
    fn show_failure(&mut self, message: &str);
}

// ── PipelineConfig ───────────────────────────────────────────────

/// Settings one pipeline instance operates with.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Absolute URL of the image to fetch.
    pub url: String,
    /// Optional bearer token for the `Authorization` header.
    pub bearer: Option<String>,
    /// Deadline for the TCP connect.
    pub connect_timeout: Duration,
    /// Whether to report the local address in the request body.
    pub report_local_addr: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            bearer: None,
            connect_timeout: Duration::from_secs(10),
            report_local_addr: false,
        }
    }
}

// ── ScreenPipeline ───────────────────────────────────────────────

/// Concrete pipeline over a decoder and a display.
///
/// Owns both collaborators for the lifetime of the session; the image
/// buffer lives only for the duration of one fetch, after which the
/// decoder reads it.
pub struct ScreenPipeline<S, D> {
    config: PipelineConfig,
    decoder: S,
    display: D,
}

impl<S, D> ScreenPipeline<S, D>
where
    S: TileDecoder + Send,
    D: PixelDisplay + Send,
{
    pub fn new(config: PipelineConfig, decoder: S, display: D) -> Self {
        Self {
            config,
            decoder,
            display,
        }
    }

    /// The display surface (for inspecting the rendered result).
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Consume the pipeline and keep the display.
    pub fn into_display(self) -> D {
        self.display
    }

    /// Download the configured URL into a fresh buffer, drawing the
    /// progress strip as bytes arrive.
    async fn fetch(&mut self) -> Result<ImageBuffer, CastError> {
        let config = &self.config;
        let display = &mut self.display;

        let uri = ParsedUri::parse(&config.url)?;
        let transport = TcpTransport::connect(&uri.host, HTTP_PORT, config.connect_timeout).await?;

        let local_addr = if config.report_local_addr {
            transport.local_addr().ok().map(|a| a.ip().to_string())
        } else {
            None
        };

        let mut downloader = Downloader::new(transport);
        if let Some(addr) = local_addr {
            downloader = downloader.with_diagnostic_addr(addr);
        }

        let mut buffer = ImageBuffer::new();
        let summary = downloader
            .download(&uri, config.bearer.as_deref(), &mut buffer, |done, total| {
                draw_progress(display, done, total);
            })
            .await?;

        if !summary.status_ok {
            warn!("server did not answer 200 OK; attempting to decode anyway");
        }
        Ok(buffer)
    }

    /// Prime the decoder with `buffer` and render all visible tiles.
    ///
    /// A decode failure is returned without touching the display, so
    /// the last-drawn image stays up.
    async fn decode_and_render(
        &mut self,
        buffer: &ImageBuffer,
        origin_x: i32,
        origin_y: i32,
    ) -> Result<RenderStats, CastError> {
        let decode_started = Instant::now();
        let info = self.decoder.begin(buffer.as_slice())?;
        info!("JPG decoding: {} ms", decode_started.elapsed().as_millis());
        info.log_summary();

        let decoder = &mut self.decoder;
        let display = &mut self.display;
        Ok(render_tiles(decoder, &info, origin_x, origin_y, display))
    }

    /// Render a local image file at `(origin_x, origin_y)`.
    ///
    /// The local-file path shares the decode/render half of the
    /// pipeline; only the source differs.
    pub async fn render_file(
        &mut self,
        path: &Path,
        origin_x: i32,
        origin_y: i32,
    ) -> Result<RenderStats, CastError> {
        info!("drawing file: {}", path.display());
        let buffer = ImageBuffer::from_file(path).await?;
        self.decode_and_render(&buffer, origin_x, origin_y).await
    }
}

#[async_trait]
impl<S, D> FramePipeline for ScreenPipeline<S, D>
where
    S: TileDecoder + Send,
    D: PixelDisplay + Send,
{
    async fn fetch_and_render(&mut self) -> Result<(), CastError> {
        let buffer = self.fetch().await?;
        let stats = self.decode_and_render(&buffer, 0, 0).await?;
        info!(
            "rendered {} tiles ({} skipped{})",
            stats.tiles_drawn,
            stats.tiles_skipped,
            if stats.aborted { ", aborted early" } else { "" },
        );
        Ok(())
    }

    async fn reconnect(&mut self, attempt: u8) {
        // Re-joining the network is the connectivity subsystem's job;
        // this layer only records that a retry is underway.
        warn!("connection lost, try {attempt} to connect again");
    }

    fn show_failure(&mut self, message: &str) {
        tracing::error!("{message}");
        // Without a text renderer the user-visible signal is a full
        // red banner across the top of the surface.
        let width = self.display.width();
        self.display.fill_rect(0, 0, width, 8, color::RED);
    }
}
