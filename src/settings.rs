use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::playback::PlaybackConfig;
use crate::ui::{GaugeConfig, ScatterConfig};

/// Directory name under the platform config dir
pub const APP_DIR: &str = "telemetry-replay";

/// Persistent application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub playback: PlaybackConfig,
    pub show_trip_panel: bool,
    pub show_hud: bool,
    pub temperature_gauge: GaugeConfig,
    pub speed_gauge: GaugeConfig,
    pub pressure_gauge: GaugeConfig,
    pub position_plot: ScatterConfig,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            show_trip_panel: true,
            show_hud: true,
            temperature_gauge: GaugeConfig::temperature(),
            speed_gauge: GaugeConfig::speed(),
            pressure_gauge: GaugeConfig::pressure(),
            position_plot: ScatterConfig::default(),
        }
    }
}

impl AppSettings {
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Read settings from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path).map(|contents| serde_json::from_str(&contents)) {
            Ok(Ok(settings)) => settings,
            Ok(Err(e)) => {
                warn!("Ignoring malformed settings file {}: {}", path.display(), e);
                Self::default()
            }
            Err(e) => {
                warn!("Failed to read settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Err(e) = self.save_to(&path) {
                warn!("Failed to save settings to {}: {}", path.display(), e);
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
