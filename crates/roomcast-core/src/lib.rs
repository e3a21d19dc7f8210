//! Roomcast Core - Foundational types for the roomcast pipeline
//!
//! This crate provides the types every other roomcast crate depends on:
//! - `Vec3`, `Color`, `Transform` - Spatial types and matrix helpers
//! - `RoomcastConfig` - Layered TOML configuration
//! - Error types and Result alias

mod config;
mod error;
mod types;

pub use config::{GifConfig, PathsConfig, RoomcastConfig, RoomcastConfigFile, ViewConfig};
pub use error::{Result, RoomcastError};
pub use types::{mat4_mul, Color, Transform, Vec3, IDENTITY_MATRIX};
