//! Layered configuration system
//!
//! Config is loaded with four layers of precedence (highest wins):
//! 1. Environment variables: `ROOMCAST_MODEL_PATH`, `ROOMCAST_FLOOR_TEXTURES`, `ROOMCAST_OUTPUT_DIR`
//! 2. Project-local: `.roomcast/config.toml`
//! 3. Global: `~/.roomcast/config.toml`
//! 4. Built-in defaults
//!
//! Command-line flags sit above all of these and are applied by the binary.

use crate::error::{Result, RoomcastError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL_PATH: &str = "output/threed_future_model_{}.json";
pub const DEFAULT_FLOOR_TEXTURES: &str = "demo/floor_plan_texture_images";
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "output/scene";

/// Input and output locations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Furniture catalog path template; `{}` is replaced by the room type
    #[serde(default)]
    pub model_path: Option<String>,
    /// Directory of floor texture images, or a single image
    #[serde(default)]
    pub floor_textures: Option<String>,
    #[serde(default)]
    pub output_directory: Option<String>,
}

/// Side-view camera overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub size: Option<[u32; 2]>,
    #[serde(default)]
    pub camera_position: Option<[f32; 3]>,
    #[serde(default)]
    pub camera_target: Option<[f32; 3]>,
    #[serde(default)]
    pub up_vector: Option<[f32; 3]>,
    #[serde(default)]
    pub background: Option<[f32; 4]>,
}

/// Animated GIF overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GifConfig {
    #[serde(default)]
    pub frame_duration_ms: Option<u32>,
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomcastConfigFile {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub gif: GifConfig,
}

/// Resolved configuration with defaults and environment overrides applied
#[derive(Debug, Clone)]
pub struct RoomcastConfig {
    pub model_path: String,
    pub floor_textures: String,
    pub output_directory: String,
    pub view: ViewConfig,
    pub gif: GifConfig,
}

impl Default for RoomcastConfig {
    fn default() -> Self {
        Self::resolve(RoomcastConfigFile::default())
    }
}

impl RoomcastConfig {
    /// Load config with layered precedence: defaults < global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = RoomcastConfigFile::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                Self::merge_into(&mut config, global);
            }
        }

        let local_path = PathBuf::from(".roomcast/config.toml");
        if local_path.exists() {
            let local = Self::load_file(&local_path)?;
            Self::merge_into(&mut config, local);
        }

        Self::apply_env_overrides(&mut config);

        Ok(Self::resolve(config))
    }

    /// Load config from a specific file path only
    #[cfg(test)]
    fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        Self::apply_env_overrides(&mut config);
        Ok(Self::resolve(config))
    }

    /// Substitute the room type into the catalog path template
    pub fn model_path_for(&self, room_type: &str) -> String {
        self.model_path.replace("{}", room_type)
    }

    fn resolve(file: RoomcastConfigFile) -> Self {
        Self {
            model_path: file
                .paths
                .model_path
                .unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string()),
            floor_textures: file
                .paths
                .floor_textures
                .unwrap_or_else(|| DEFAULT_FLOOR_TEXTURES.to_string()),
            output_directory: file
                .paths
                .output_directory
                .unwrap_or_else(|| DEFAULT_OUTPUT_DIRECTORY.to_string()),
            view: file.view,
            gif: file.gif,
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".roomcast").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<RoomcastConfigFile> {
        let content = std::fs::read_to_string(path)?;
        let config: RoomcastConfigFile = toml::from_str(&content).map_err(|e| {
            RoomcastError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        Ok(config)
    }

    fn merge_into(base: &mut RoomcastConfigFile, overlay: RoomcastConfigFile) {
        let paths = overlay.paths;
        if paths.model_path.is_some() {
            base.paths.model_path = paths.model_path;
        }
        if paths.floor_textures.is_some() {
            base.paths.floor_textures = paths.floor_textures;
        }
        if paths.output_directory.is_some() {
            base.paths.output_directory = paths.output_directory;
        }

        let view = overlay.view;
        if view.size.is_some() {
            base.view.size = view.size;
        }
        if view.camera_position.is_some() {
            base.view.camera_position = view.camera_position;
        }
        if view.camera_target.is_some() {
            base.view.camera_target = view.camera_target;
        }
        if view.up_vector.is_some() {
            base.view.up_vector = view.up_vector;
        }
        if view.background.is_some() {
            base.view.background = view.background;
        }

        if overlay.gif.frame_duration_ms.is_some() {
            base.gif.frame_duration_ms = overlay.gif.frame_duration_ms;
        }
    }

    fn apply_env_overrides(config: &mut RoomcastConfigFile) {
        if let Ok(v) = std::env::var("ROOMCAST_MODEL_PATH") {
            config.paths.model_path = Some(v);
        }
        if let Ok(v) = std::env::var("ROOMCAST_FLOOR_TEXTURES") {
            config.paths.floor_textures = Some(v);
        }
        if let Ok(v) = std::env::var("ROOMCAST_OUTPUT_DIR") {
            config.paths.output_directory = Some(v);
        }
    }
}
