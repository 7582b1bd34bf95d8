//! Application configuration
//!
//! Read once at startup from `config.json` in the platform config directory:
//! - macOS: ~/Library/Application Support/constellation-globe/
//! - Linux: ~/.config/constellation-globe/
//! - Windows: %APPDATA%\constellation-globe\config\
//!
//! Every field has a default, so a partial file only overrides what it names.

use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.json";

/// One selectable constellation group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    pub url: String,
    /// Start orbit traces at the element epoch rather than the current time
    #[serde(default)]
    pub epoch_anchored: bool,
}

impl GroupConfig {
    fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            epoch_anchored: false,
        }
    }
}

/// Optional endpoints serving live terminal tracks as JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveTrackConfig {
    pub airborne: Option<String>,
    pub maritime: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub airborne_count: usize,
    pub maritime_count: usize,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            airborne_count: 12,
            maritime_count: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    pub duration_minutes: u32,
    pub step_minutes: u32,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            duration_minutes: 90,
            step_minutes: 1,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub groups: Vec<GroupConfig>,
    pub live_tracks: LiveTrackConfig,
    pub terminals: TerminalConfig,
    pub trace: TraceConfig,
    pub time_scale: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            groups: vec![
                GroupConfig::new(
                    "Starlink",
                    "https://celestrak.org/NORAD/elements/gp.php?GROUP=starlink&FORMAT=tle",
                ),
                GroupConfig::new(
                    "Kuiper",
                    "https://celestrak.org/NORAD/elements/gp.php?GROUP=kuiper&FORMAT=tle",
                ),
                GroupConfig::new("GPS", "https://celestrak.org/NORAD/elements/gps-ops.txt"),
                GroupConfig::new(
                    "Galileo",
                    "https://celestrak.org/NORAD/elements/galileo.txt",
                ),
                GroupConfig::new(
                    "GLONASS",
                    "https://celestrak.org/NORAD/elements/glo-ops.txt",
                ),
            ],
            live_tracks: LiveTrackConfig::default(),
            terminals: TerminalConfig::default(),
            trace: TraceConfig::default(),
            time_scale: 1.0,
        }
    }
}

impl AppConfig {
    /// Load from the platform config directory, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            warn!("[CONFIG] could not resolve a config directory, using defaults");
            return Self::default();
        };
        Self::load_or_default(&path)
    }

    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "constellation-globe")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// A missing file is not an error; a broken one is logged and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("[CONFIG] no config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::read_from(path) {
            Ok(config) => {
                info!("[CONFIG] loaded {}", path.display());
                config
            }
            Err(e) => {
                warn!("[CONFIG] ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn read_from(path: &Path) -> Result<Self, anyhow::Error> {
        let contents = fs::read_to_string(path)?;
        let mut config: AppConfig = serde_json::from_str(&contents)?;
        if !config.time_scale.is_finite() || config.time_scale < 0.0 {
            warn!(
                "[CONFIG] time_scale {} out of range, using 1.0",
                config.time_scale
            );
            config.time_scale = 1.0;
        }
        Ok(config)
    }
}
