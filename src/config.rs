use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const GALLERY_ENV: &str = "PHOTOTAG_GALLERY";
pub const SAVE_ENDPOINT_ENV: &str = "PHOTOTAG_SAVE_ENDPOINT";

const DEFAULT_GALLERY: &str = "gallery.json";
const DEFAULT_SAVE_DELAY_MS: u64 = 50;
const DEFAULT_ROW_HEIGHT: f32 = 150.0;

#[derive(Debug, Default, Serialize, Deserialize)]
/// Persisted settings for phototag.
pub struct AppConfig {
    pub window_width: Option<f32>,
    pub window_height: Option<f32>,
    pub gallery_path: Option<PathBuf>,
    /// Directory site-absolute image references resolve against.
    pub asset_root: Option<PathBuf>,
    /// POST saves here instead of writing the gallery file directly.
    pub save_endpoint: Option<String>,
    pub save_delay_ms: Option<u64>,
    pub preview_row_height: Option<f32>,
}

impl AppConfig {
    /// Returns the user config file path, if a config directory is available.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("phototag").join("config.toml"))
    }

    /// Loads config from disk, falling back to defaults on any error.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        let Ok(contents) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        Self::parse(&contents)
    }

    fn parse(contents: &str) -> Self {
        match toml::from_str(contents) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("ignoring unreadable config: {}", err);
                Self::default()
            }
        }
    }

    /// Writes config to disk, ignoring filesystem/serialization errors.
    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(s) = toml::to_string_pretty(self) {
            let _ = std::fs::write(&path, s);
        }
    }

    pub fn gallery_path(&self, env_override: Option<String>) -> PathBuf {
        env_override
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .or_else(|| self.gallery_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_GALLERY))
    }

    /// Asset root, defaulting to the directory holding the gallery file.
    pub fn asset_root(&self, gallery_path: &Path) -> PathBuf {
        self.asset_root.clone().unwrap_or_else(|| {
            gallery_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }

    pub fn save_endpoint(&self, env_override: Option<String>) -> Option<String> {
        let pick = |v: Option<String>| v.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        pick(env_override).or_else(|| pick(self.save_endpoint.clone()))
    }

    pub fn save_delay(&self) -> Duration {
        Duration::from_millis(self.save_delay_ms.unwrap_or(DEFAULT_SAVE_DELAY_MS))
    }

    pub fn row_height(&self) -> f32 {
        self.preview_row_height
            .filter(|h| *h >= 32.0)
            .unwrap_or(DEFAULT_ROW_HEIGHT)
    }
}
