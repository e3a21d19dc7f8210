//! Error types for roomcast

use thiserror::Error;

/// The main error type for roomcast operations
#[derive(Debug, Error)]
pub enum RoomcastError {
    #[error("Unexpected results bundle type: expected '{expected}', got '{found}'")]
    BundleType { expected: String, found: String },

    #[error("No known room type in dataset directory '{0}' (expected one of diningroom, livingroom, bedroom, library)")]
    UnknownRoomType(String),

    #[error("Invalid scene index '{0}': not an integer")]
    InvalidIndex(String),

    #[error("No floor textures available at '{0}'")]
    NoFloorTextures(String),

    #[error("Invalid results bundle: {0}")]
    InvalidBundle(String),

    #[error("Missing configuration key: {0}")]
    MissingConfigKey(String),

    #[error("Scene index {index} is out of range for a dataset of {len} scenes")]
    SceneOutOfRange { index: usize, len: usize },

    #[error("Catalog error: {0}")]
    CatalogError(String),

    #[error("No furniture in catalog for label '{0}'")]
    NoMatchingFurniture(String),

    #[error("Import error: {0}")]
    ImportError(String),

    #[error("Export error: {0}")]
    ExportError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("No display available: {0}")]
    DisplayUnavailable(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),
}

/// Result type alias for roomcast operations
pub type Result<T> = std::result::Result<T, RoomcastError>;

impl From<toml::de::Error> for RoomcastError {
    fn from(err: toml::de::Error) -> Self {
        RoomcastError::TomlParseError(err.to_string())
    }
}
