//! Binary entry point: config, CLI, logging, and one session.

use std::path::{Path, PathBuf};

use clap::Parser;
use tilecast_core::{
    FramebufferDisplay, LinkEvent, PixelDisplay, ScreenPipeline, Session,
};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tilecast_screen::config::ScreenConfig;
use tilecast_screen::decoder::JpegTileDecoder;

#[derive(Parser, Debug)]
#[command(name = "tilecast-screen", about = "Fetch a JPEG over HTTP and render it tile by tile")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "tilecast-screen.toml")]
    config: PathBuf,

    /// Override the configured image URL.
    #[arg(long)]
    url: Option<String>,

    /// Render a local JPEG file instead of fetching one.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Write the final framebuffer to this path as a PPM image.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Print the default configuration and exit.
    #[arg(long)]
    gen_config: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        print!("{}", toml::to_string_pretty(&ScreenConfig::default())?);
        return Ok(());
    }

    let mut config = ScreenConfig::load(&cli.config);
    if let Some(url) = cli.url {
        config.source.url = url;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    let display = FramebufferDisplay::rotated(
        config.display.width,
        config.display.height,
        config.rotation(),
    );
    let (surface_w, surface_h) = (display.width(), display.height());
    info!(
        "display surface {}x{} (rotation {})",
        surface_w,
        surface_h,
        config.rotation(),
    );

    let pipeline = ScreenPipeline::new(
        config.to_pipeline_config(),
        JpegTileDecoder::new(),
        display,
    );

    let display = if let Some(path) = &cli.file {
        let mut pipeline = pipeline;
        pipeline.render_file(path, 0, 0).await?;
        pipeline.into_display()
    } else {
        let (tx, rx) = mpsc::channel(4);
        let mut session = Session::new(pipeline);
        // On a hosted OS the network is already up; feed the session
        // the event the connectivity layer would deliver.
        tx.send(LinkEvent::AddressAcquired).await?;
        drop(tx);
        session.run(rx).await;
        session.into_pipeline().into_display()
    };

    if let Some(path) = &cli.out {
        write_ppm(&display, path)?;
        info!("framebuffer written to {}", path.display());
    }
    Ok(())
}

/// Dump the framebuffer as a binary PPM (P6), expanding RGB565 back to
/// RGB888.
fn write_ppm(display: &FramebufferDisplay, path: &Path) -> std::io::Result<()> {
    let (w, h) = (display.width(), display.height());
    let mut out = format!("P6\n{w} {h}\n255\n").into_bytes();
    out.reserve(display.as_slice().len() * 3);
    for &px in display.as_slice() {
        let r = ((px >> 11) & 0x1F) as u8;
        let g = ((px >> 5) & 0x3F) as u8;
        let b = (px & 0x1F) as u8;
        out.push((r << 3) | (r >> 2));
        out.push((g << 2) | (g >> 4));
        out.push((b << 3) | (b >> 2));
    }
    std::fs::write(path, out)
}
