//! Configuration for the screen client.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tilecast_core::PipelineConfig;

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Image source settings.
    pub source: SourceConfig,
    /// Display geometry.
    pub display: DisplayConfig,
    /// Network settings.
    pub network: NetworkConfig,
    /// Diagnostic extras.
    pub diagnostics: DiagnosticsConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Where the image comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Absolute URL of the JPEG to fetch.
    pub url: String,
    /// Optional bearer token sent in the `Authorization` header.
    pub bearer: String,
}

/// Display geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Native panel width in pixels.
    pub width: u32,
    /// Native panel height in pixels.
    pub height: u32,
    /// Rotation in quarter turns (0–3); odd values swap the axes.
    pub rotation: u8,
}

/// Network settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// TCP connect deadline in milliseconds.
    pub connect_timeout_ms: u64,
}

/// Diagnostic extras.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Report the local address to the server in the request body.
    pub report_local_addr: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            display: DisplayConfig::default(),
            network: NetworkConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: "http://cale.es/img/screen.jpg".into(),
            bearer: String::new(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 240,
            height: 320,
            rotation: 0,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 10_000,
        }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            report_local_addr: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl ScreenConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write the default configuration to a file (for bootstrapping).
    pub fn write_default(path: &Path) -> std::io::Result<()> {
        let cfg = Self::default();
        let text = toml::to_string_pretty(&cfg).map_err(std::io::Error::other)?;
        std::fs::write(path, text)
    }

    /// Rotation clamped to its four valid values.
    pub fn rotation(&self) -> u8 {
        self.display.rotation % 4
    }

    /// Convert the source/network settings into a pipeline config.
    pub fn to_pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            url: self.source.url.clone(),
            bearer: if self.source.bearer.is_empty() {
                None
            } else {
                Some(self.source.bearer.clone())
            },
            connect_timeout: Duration::from_millis(self.network.connect_timeout_ms.max(1)),
            report_local_addr: self.diagnostics.report_local_addr,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
