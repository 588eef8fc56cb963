//! Application settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Round `value` to the nearest multiple of `step` when snapping is on
pub fn snap(value: f64, step: f64, enabled: bool) -> f64 {
    if enabled && step > 0.0 {
        (value / step).round() * step
    } else {
        value
    }
}

/// Grid snapping for creation, sketching and gizmo translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapSettings {
    /// Enable snapping
    pub enabled: bool,
    /// Grid step in world units
    pub step: f64,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            step: 0.5,
        }
    }
}

impl SnapSettings {
    pub fn apply(&self, value: f64) -> f64 {
        snap(value, self.step, self.enabled)
    }

    pub fn apply2(&self, p: [f64; 2]) -> [f64; 2] {
        [self.apply(p[0]), self.apply(p[1])]
    }

    pub fn apply3(&self, p: [f64; 3]) -> [f64; 3] {
        [self.apply(p[0]), self.apply(p[1]), self.apply(p[2])]
    }
}

/// Picking tolerances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickSettings {
    /// Maximum ray distance to an edge for it to count as hit
    pub edge_threshold: f32,
}

impl Default for PickSettings {
    fn default() -> Self {
        Self {
            edge_threshold: 0.05,
        }
    }
}

/// All application settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub snap: SnapSettings,
    #[serde(default)]
    pub pick: PickSettings,
}

impl AppSettings {
    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "blockcad", "blockcad")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from the config dir, or return default if not found
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load settings from `path`; missing or unparsable files give defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unparsable settings {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to the config dir
    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Err(e) = self.save_to(&path) {
                tracing::warn!("Failed to save settings to {}: {e}", path.display());
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}
