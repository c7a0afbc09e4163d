//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FtdcViewError, FtdcViewResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Plot layout defaults.
    pub plot: PlotConfig,

    /// External renderer settings.
    pub renderer: RendererConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Plot layout parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Image written by the renderer, relative to the working directory unless absolute.
    pub output_image: PathBuf,

    /// Canvas width in pixels.
    pub width: u32,

    /// Canvas height contributed by each graph, in pixels.
    pub graph_height: u32,

    /// Lower bound of every graph's y-axis. `None` lets the renderer autoscale.
    ///
    /// Zero suits counters and gauges but clips metrics that go negative
    /// (positions, voltages). Override per invocation rather than per graph.
    pub y_floor: Option<f64>,
}

/// External renderer parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Renderer executable, resolved through `PATH`.
    pub binary: String,

    /// Seconds to wait for the renderer before killing it. `None` or `0` waits forever.
    pub timeout_secs: Option<u64>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "ftdcview=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            output_image: PathBuf::from("plot.png"),
            width: 1000,
            graph_height: 200,
            y_floor: Some(0.0),
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            binary: "gnuplot".to_string(),
            timeout_secs: Some(120),
        }
    }
}

impl RendererConfig {
    /// Effective timeout, treating zero as disabled.
    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(std::time::Duration::from_secs)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from `config_path`, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Reject settings no render could succeed with.
    pub fn validate(&self) -> FtdcViewResult<()> {
        if self.plot.width == 0 {
            return Err(FtdcViewError::config("plot width must be positive"));
        }
        if self.plot.graph_height == 0 {
            return Err(FtdcViewError::config("graph height must be positive"));
        }
        if self.renderer.binary.trim().is_empty() {
            return Err(FtdcViewError::config("renderer binary must not be empty"));
        }
        if let Some(floor) = self.plot.y_floor {
            if !floor.is_finite() {
                return Err(FtdcViewError::config(format!(
                    "y floor must be finite, got {floor}"
                )));
            }
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("ftdcview").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_layout() {
        let config = AppConfig::default();
        assert_eq!(config.plot.width, 1000);
        assert_eq!(config.plot.graph_height, 200);
        assert_eq!(config.plot.y_floor, Some(0.0));
        assert_eq!(config.plot.output_image, PathBuf::from("plot.png"));
        assert_eq!(config.renderer.binary, "gnuplot");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"plot":{"y_floor":null},"renderer":{"timeout_secs":5}}"#)
            .unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.plot.y_floor, None);
        assert_eq!(config.plot.graph_height, 200);
        assert_eq!(config.renderer.binary, "gnuplot");
        assert_eq!(
            config.renderer.timeout(),
            Some(std::time::Duration::from_secs(5))
        );
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.plot.width, 1000);
    }

    #[test]
    fn test_zero_timeout_disables_deadline() {
        let renderer = RendererConfig {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert_eq!(renderer.timeout(), None);
    }

    #[test]
    fn test_validate_rejects_zero_height() {
        let mut config = AppConfig::default();
        config.plot.graph_height = 0;
        assert!(matches!(
            config.validate(),
            Err(FtdcViewError::Config { .. })
        ));
    }
}
