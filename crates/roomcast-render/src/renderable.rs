//! Renderable handles produced by scene assembly

use crate::primitives::Mesh;
use image::RgbaImage;
use roomcast_core::{Color, Transform};
use std::sync::Arc;

/// One drawable primitive: shared geometry, material, and placement
#[derive(Debug, Clone)]
pub struct Renderable {
    pub label: String,
    pub mesh: Arc<Mesh>,
    /// Multiplied with the texture (or used alone when there is none)
    pub color: Color,
    pub texture: Option<Arc<RgbaImage>>,
    pub transform: Transform,
    /// Drawn after opaque geometry without writing depth
    pub translucent: bool,
}

impl Renderable {
    pub fn new(label: impl Into<String>, mesh: Arc<Mesh>) -> Self {
        Self {
            label: label.into(),
            mesh,
            color: Color::WHITE,
            texture: None,
            transform: Transform::IDENTITY,
            translucent: false,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_texture(mut self, texture: Arc<RgbaImage>) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn translucent(mut self) -> Self {
        self.translucent = true;
        self
    }

    pub fn is_textured(&self) -> bool {
        self.texture.is_some()
    }
}
