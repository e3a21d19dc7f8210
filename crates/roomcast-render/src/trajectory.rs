//! Camera trajectories

use roomcast_core::Vec3;
use std::f32::consts::TAU;

/// A circular path around `center`, starting at `start`, in the plane normal to `normal`.
///
/// `speed` is the fraction of a full turn advanced per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec3,
    pub start: Vec3,
    pub normal: Vec3,
    pub speed: f32,
}

impl Circle {
    pub fn new(center: Vec3, start: Vec3, normal: Vec3, speed: f32) -> Self {
        Self {
            center,
            start,
            normal,
            speed,
        }
    }

    /// Camera position for frame `frame`
    pub fn position(&self, frame: usize) -> Vec3 {
        let n = self.normal.normalized();
        let offset = self.start - self.center;
        let radial = offset - n * offset.dot(&n);
        let tangent = n.cross(&radial);
        let angle = TAU * self.speed * frame as f32;
        self.center + n * offset.dot(&n) + radial * angle.cos() + tangent * angle.sin()
    }
}
