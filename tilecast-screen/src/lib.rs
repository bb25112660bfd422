//! # tilecast-screen — hosted screen client
//!
//! Front-end for `tilecast-core` on a regular OS: loads a TOML
//! configuration, adapts the `jpeg-decoder` crate to the core's
//! `TileDecoder` seam, and drives one session against an in-memory
//! framebuffer that can be dumped to disk for inspection.
//!
//! ## Modes
//!
//! ```text
//! tilecast-screen                      Fetch the configured URL and render it
//! tilecast-screen --url <url>         Override the configured URL
//! tilecast-screen --file <path>       Render a local JPEG instead
//! tilecast-screen --out <path>        Dump the framebuffer as PPM afterwards
//! tilecast-screen --gen-config        Write the default config to stdout
//! ```

pub mod config;
pub mod decoder;
