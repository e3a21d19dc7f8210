//! Fixed view settings

use crate::camera::Camera;
use roomcast_core::{Color, Vec3, ViewConfig};

/// Viewport size, camera placement, and background
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSettings {
    pub size: (u32, u32),
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub up_vector: Vec3,
    pub background: Color,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self::sideview()
    }
}

impl ViewSettings {
    /// 512x512 side view of a room centred on the origin, white background
    pub fn sideview() -> Self {
        Self {
            size: (512, 512),
            camera_position: Vec3::new(-0.1, 1.9, -7.2),
            camera_target: Vec3::ZERO,
            up_vector: Vec3::UP,
            background: Color::WHITE,
        }
    }

    /// Apply `[view]` config overrides
    pub fn with_overrides(mut self, config: &ViewConfig) -> Self {
        if let Some([w, h]) = config.size {
            self.size = (w.max(1), h.max(1));
        }
        if let Some(p) = config.camera_position {
            self.camera_position = Vec3::from_array(p);
        }
        if let Some(t) = config.camera_target {
            self.camera_target = Vec3::from_array(t);
        }
        if let Some(u) = config.up_vector {
            self.up_vector = Vec3::from_array(u);
        }
        if let Some([r, g, b, a]) = config.background {
            self.background = Color::new(r, g, b, a);
        }
        self
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.size.0 as f32 / self.size.1.max(1) as f32
    }

    pub fn camera(&self) -> Camera {
        let mut camera = Camera::look_at(self.camera_position, self.camera_target, self.up_vector);
        camera.aspect = self.aspect_ratio();
        camera
    }
}
