//! Orbit camera

use roomcast_core::{mat4_mul, Vec3};

/// A perspective camera orbiting a target point
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Width / height
    pub aspect: f32,

    // Orbit state, kept in sync with `position`
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::look_at(Vec3::new(0.0, 2.0, -7.0), Vec3::ZERO, Vec3::UP)
    }
}

impl Camera {
    /// Camera at `position` looking at `target`
    pub fn look_at(position: Vec3, target: Vec3, up: Vec3) -> Self {
        let mut camera = Self {
            position,
            target,
            up,
            fov: 45.0,
            near: 0.05,
            far: 100.0,
            aspect: 1.0,
            distance: 1.0,
            yaw: 0.0,
            pitch: 0.0,
        };
        camera.sync_orbit();
        camera
    }

    /// Recompute orbit angles from the current position and target
    fn sync_orbit(&mut self) {
        let offset = self.position - self.target;
        self.distance = offset.length().max(1e-3);
        self.pitch = (offset.y / self.distance).clamp(-1.0, 1.0).asin();
        self.yaw = offset.x.atan2(offset.z);
    }

    /// Move the camera, keeping the target
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.sync_orbit();
    }

    /// Update position based on orbit parameters
    pub fn update_orbit(&mut self) {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.position = self.target + Vec3::new(x, y, z);
    }

    pub fn orbit_horizontal(&mut self, delta: f32) {
        self.yaw += delta;
        self.update_orbit();
    }

    pub fn orbit_vertical(&mut self, delta: f32) {
        self.pitch = (self.pitch + delta).clamp(-1.56, 1.56);
        self.update_orbit();
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance - delta).clamp(0.5, 50.0);
        self.update_orbit();
    }

    /// Pan the camera (move target)
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let forward = (self.target - self.position).normalized();
        let right = forward.cross(&self.up).normalized();
        let up = right.cross(&forward);

        self.target = self.target + right * dx + up * dy;
        self.update_orbit();
    }

    /// Get the view matrix (4x4, column-major)
    pub fn view_matrix(&self) -> [[f32; 4]; 4] {
        let f = (self.target - self.position).normalized();
        let s = f.cross(&self.up).normalized();
        let u = s.cross(&f);

        [
            [s.x, u.x, -f.x, 0.0],
            [s.y, u.y, -f.y, 0.0],
            [s.z, u.z, -f.z, 0.0],
            [
                -s.dot(&self.position),
                -u.dot(&self.position),
                f.dot(&self.position),
                1.0,
            ],
        ]
    }

    /// Perspective projection mapping depth to [0, 1]
    pub fn projection_matrix(&self) -> [[f32; 4]; 4] {
        let f = 1.0 / (self.fov.to_radians() / 2.0).tan();
        let depth = self.far - self.near;

        [
            [f / self.aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, -self.far / depth, -1.0],
            [0.0, 0.0, -(self.far * self.near) / depth, 0.0],
        ]
    }

    pub fn view_projection_matrix(&self) -> [[f32; 4]; 4] {
        mat4_mul(&self.projection_matrix(), &self.view_matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(m: &[[f32; 4]; 4], p: Vec3) -> [f32; 4] {
        let mut out = [0.0; 4];
        for (row, o) in out.iter_mut().enumerate() {
            *o = m[0][row] * p.x + m[1][row] * p.y + m[2][row] * p.z + m[3][row];
        }
        out
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let camera = Camera::look_at(Vec3::new(-0.1, 1.9, -7.2), Vec3::ZERO, Vec3::UP);
        let clip = project(&camera.view_projection_matrix(), Vec3::ZERO);
        assert!((clip[0] / clip[3]).abs() < 1e-4);
        assert!((clip[1] / clip[3]).abs() < 1e-4);
        let depth = clip[2] / clip[3];
        assert!(depth > 0.0 && depth < 1.0, "depth {}", depth);
    }

    #[test]
    fn test_orbit_preserves_distance() {
        let mut camera = Camera::look_at(Vec3::new(0.0, 3.0, -4.0), Vec3::ZERO, Vec3::UP);
        let before = camera.distance;
        camera.orbit_horizontal(0.7);
        camera.orbit_vertical(-0.2);
        assert!(((camera.position - camera.target).length() - before).abs() < 1e-4);
    }

    #[test]
    fn test_sync_then_update_is_stable() {
        let start = Vec3::new(-0.1, 1.9, -7.2);
        let mut camera = Camera::look_at(start, Vec3::ZERO, Vec3::UP);
        camera.update_orbit();
        assert!((camera.position - start).length() < 1e-4);
    }
}
