//! Spatial and common types

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// Column-major 4x4 identity
pub const IDENTITY_MATRIX: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// A 3D vector
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const ONE: Self = Self {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };
    pub const UP: Self = Self {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn from_array(arr: [f32; 3]) -> Self {
        Self {
            x: arr[0],
            y: arr[1],
            z: arr[2],
        }
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
                z: self.z / len,
            }
        } else {
            Self::ZERO
        }
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Component-wise product
    pub fn scaled(&self, other: &Self) -> Self {
        Self {
            x: self.x * other.x,
            y: self.y * other.y,
            z: self.z * other.z,
        }
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(arr: [f32; 3]) -> Self {
        Self::from_array(arr)
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> Self {
        v.to_array()
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

/// A rigid placement with scale.
///
/// Points are mapped as `rotation * (scale * p - pivot) + position`, so `pivot`
/// is expressed in scaled model space. Furniture uses it to move the model's
/// bounding-box centre onto the predicted translation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    /// Quaternion rotation [x, y, z, w]
    pub rotation: [f32; 4],
    pub scale: Vec3,
    #[serde(default)]
    pub pivot: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: [0.0, 0.0, 0.0, 1.0],
        scale: Vec3::ONE,
        pivot: Vec3::ZERO,
    };

    /// Rotation of `angle` radians about +Y
    pub fn from_yaw(angle: f32) -> Self {
        let half = angle * 0.5;
        Self {
            rotation: [0.0, half.sin(), 0.0, half.cos()],
            ..Self::IDENTITY
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_pivot(mut self, pivot: Vec3) -> Self {
        self.pivot = pivot;
        self
    }

    pub fn with_rotation(mut self, q: [f32; 4]) -> Self {
        self.rotation = q;
        self
    }

    /// Rotation part as a row-major 3x3 matrix
    fn rotation_matrix(&self) -> [[f32; 3]; 3] {
        let [x, y, z, w] = self.rotation;
        let norm = (x * x + y * y + z * z + w * w).sqrt();
        let (x, y, z, w) = if norm > 0.0 {
            (x / norm, y / norm, z / norm, w / norm)
        } else {
            (0.0, 0.0, 0.0, 1.0)
        };
        [
            [
                1.0 - 2.0 * (y * y + z * z),
                2.0 * (x * y - w * z),
                2.0 * (x * z + w * y),
            ],
            [
                2.0 * (x * y + w * z),
                1.0 - 2.0 * (x * x + z * z),
                2.0 * (y * z - w * x),
            ],
            [
                2.0 * (x * z - w * y),
                2.0 * (y * z + w * x),
                1.0 - 2.0 * (x * x + y * y),
            ],
        ]
    }

    fn rotate(&self, v: Vec3) -> Vec3 {
        let r = self.rotation_matrix();
        Vec3::new(
            r[0][0] * v.x + r[0][1] * v.y + r[0][2] * v.z,
            r[1][0] * v.x + r[1][1] * v.y + r[1][2] * v.z,
            r[2][0] * v.x + r[2][1] * v.y + r[2][2] * v.z,
        )
    }

    /// Map a model-space point into world space
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotate(p.scaled(&self.scale) - self.pivot) + self.position
    }

    /// Map a model-space normal into world space (inverse-transpose of the linear part)
    pub fn transform_normal(&self, n: Vec3) -> Vec3 {
        let inv_scale = Vec3::new(
            safe_recip(self.scale.x),
            safe_recip(self.scale.y),
            safe_recip(self.scale.z),
        );
        self.rotate(n.scaled(&inv_scale)).normalized()
    }

    /// Convert to a 4x4 transformation matrix (column-major)
    pub fn to_matrix(&self) -> [[f32; 4]; 4] {
        let r = self.rotation_matrix();
        let t = self.position - self.rotate(self.pivot);
        [
            [r[0][0] * self.scale.x, r[1][0] * self.scale.x, r[2][0] * self.scale.x, 0.0],
            [r[0][1] * self.scale.y, r[1][1] * self.scale.y, r[2][1] * self.scale.y, 0.0],
            [r[0][2] * self.scale.z, r[1][2] * self.scale.z, r[2][2] * self.scale.z, 0.0],
            [t.x, t.y, t.z, 1.0],
        ]
    }
}

fn safe_recip(v: f32) -> f32 {
    if v.abs() > f32::EPSILON {
        1.0 / v
    } else {
        0.0
    }
}

/// RGBA color
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const GREY: Self = Self {
        r: 0.5,
        g: 0.5,
        b: 0.5,
        a: 1.0,
    };

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Build from 3 (opaque) or 4 components
    pub fn from_slice(values: &[f32]) -> Option<Self> {
        match *values {
            [r, g, b] => Some(Self::rgb(r, g, b)),
            [r, g, b, a] => Some(Self::new(r, g, b, a)),
            _ => None,
        }
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Multiply two 4x4 column-major matrices
pub fn mat4_mul(a: &[[f32; 4]; 4], b: &[[f32; 4]; 4]) -> [[f32; 4]; 4] {
    let mut result = [[0.0; 4]; 4];
    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[k][j] * b[i][k];
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    fn apply(m: &[[f32; 4]; 4], p: Vec3) -> Vec3 {
        Vec3::new(
            m[0][0] * p.x + m[1][0] * p.y + m[2][0] * p.z + m[3][0],
            m[0][1] * p.x + m[1][1] * p.y + m[2][1] * p.z + m[3][1],
            m[0][2] * p.x + m[1][2] * p.y + m[2][2] * p.z + m[3][2],
        )
    }

    #[test]
    fn test_vec3_operations() {
        let v1 = Vec3::new(1.0, 2.0, 3.0);
        let v2 = Vec3::new(4.0, 5.0, 6.0);

        assert_eq!(v1 + v2, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(v2 - v1, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(v1 * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(-v1, Vec3::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn test_vec3_serde_as_array() {
        let v: Vec3 = toml::from_str::<toml::Table>("v = [1.0, 2.0, 3.0]")
            .unwrap()
            .get("v")
            .unwrap()
            .clone()
            .try_into()
            .unwrap();
        assert_eq!(v, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_yaw_rotates_x_towards_minus_z() {
        let t = Transform::from_yaw(std::f32::consts::FRAC_PI_2);
        let p = t.transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!(approx(p, Vec3::new(0.0, 0.0, -1.0)), "got {:?}", p);
    }

    #[test]
    fn test_matrix_matches_transform_point() {
        let t = Transform::from_yaw(0.7)
            .with_position(Vec3::new(1.0, 2.0, 3.0))
            .with_scale(Vec3::new(2.0, 1.0, 0.5))
            .with_pivot(Vec3::new(0.1, 0.2, 0.3));
        let m = t.to_matrix();
        let p = Vec3::new(0.4, -1.2, 2.5);
        assert!(approx(apply(&m, p), t.transform_point(p)));
    }

    #[test]
    fn test_pivot_lands_on_position() {
        let pivot = Vec3::new(0.5, 0.5, 0.5);
        let t = Transform::from_yaw(1.3)
            .with_position(Vec3::new(2.0, 0.0, -1.0))
            .with_pivot(pivot);
        assert!(approx(t.transform_point(pivot), Vec3::new(2.0, 0.0, -1.0)));
    }

    #[test]
    fn test_color_from_slice() {
        assert_eq!(Color::from_slice(&[0.2, 0.3, 0.4]), Some(Color::new(0.2, 0.3, 0.4, 1.0)));
        assert_eq!(
            Color::from_slice(&[0.2, 0.3, 0.4, 0.5]),
            Some(Color::new(0.2, 0.3, 0.4, 0.5))
        );
        assert_eq!(Color::from_slice(&[0.2]), None);
    }

    #[test]
    fn test_mat4_mul_identity() {
        let t = Transform::IDENTITY.with_position(Vec3::new(1.0, 2.0, 3.0)).to_matrix();
        assert_eq!(mat4_mul(&IDENTITY_MATRIX, &t), t);
    }
}
