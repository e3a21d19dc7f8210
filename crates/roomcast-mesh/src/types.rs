//! Import result types

/// Result of importing a model file
#[derive(Debug, Clone)]
pub struct ImportResult {
    /// File stem of the imported model
    pub name: String,
    /// Extracted meshes
    pub meshes: Vec<ImportedMesh>,
    /// Extracted textures, already expanded to RGBA8
    pub textures: Vec<ImportedTexture>,
    /// Extracted materials
    pub materials: Vec<ImportedMaterial>,
}

impl ImportResult {
    /// Compute the combined bounding box across all meshes
    pub fn bounds(&self) -> Option<MeshBounds> {
        self.meshes
            .iter()
            .filter_map(|m| m.bounds())
            .reduce(|a, b| a.union(&b))
    }

    /// Material assigned to a mesh, if any
    pub fn material_for(&self, mesh: &ImportedMesh) -> Option<&ImportedMaterial> {
        mesh.material_index.and_then(|i| self.materials.get(i))
    }

    /// Base color texture of a material, if it references an embedded one
    pub fn texture_for(&self, material: &ImportedMaterial) -> Option<&ImportedTexture> {
        material
            .base_color_texture
            .and_then(|i| self.textures.get(i))
    }
}

/// Axis-aligned bounding box computed from vertex positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshBounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl MeshBounds {
    /// Compute bounds from a set of vertex positions
    pub fn from_positions(positions: &[[f32; 3]]) -> Option<Self> {
        if positions.is_empty() {
            return None;
        }
        let mut min = positions[0];
        let mut max = positions[0];
        for p in positions.iter().skip(1) {
            for i in 0..3 {
                if p[i] < min[i] { min[i] = p[i]; }
                if p[i] > max[i] { max[i] = p[i]; }
            }
        }
        Some(Self { min, max })
    }

    /// Size along each axis
    pub fn size(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// Midpoint of the box
    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }

    /// Merge with another bounds to get the union
    pub fn union(&self, other: &MeshBounds) -> MeshBounds {
        MeshBounds {
            min: [
                self.min[0].min(other.min[0]),
                self.min[1].min(other.min[1]),
                self.min[2].min(other.min[2]),
            ],
            max: [
                self.max[0].max(other.max[0]),
                self.max[1].max(other.max[1]),
                self.max[2].max(other.max[2]),
            ],
        }
    }
}

impl std::fmt::Display for MeshBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.size();
        write!(
            f,
            "{:.2} x {:.2} x {:.2} (min [{:.2}, {:.2}, {:.2}], max [{:.2}, {:.2}, {:.2}])",
            s[0], s[1], s[2],
            self.min[0], self.min[1], self.min[2],
            self.max[0], self.max[1], self.max[2],
        )
    }
}

/// An imported mesh with vertex data
#[derive(Debug, Clone, Default)]
pub struct ImportedMesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    pub material_index: Option<usize>,
}

impl ImportedMesh {
    /// Compute the axis-aligned bounding box of this mesh's vertices
    pub fn bounds(&self) -> Option<MeshBounds> {
        MeshBounds::from_positions(&self.positions)
    }

    /// Fill in smooth per-vertex normals when the source had none
    pub fn ensure_normals(&mut self) {
        if self.normals.len() == self.positions.len() {
            return;
        }

        let mut normals = vec![[0.0f32; 3]; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            if a >= normals.len() || b >= normals.len() || c >= normals.len() {
                continue;
            }
            let (pa, pb, pc) = (self.positions[a], self.positions[b], self.positions[c]);
            let e1 = [pb[0] - pa[0], pb[1] - pa[1], pb[2] - pa[2]];
            let e2 = [pc[0] - pa[0], pc[1] - pa[1], pc[2] - pa[2]];
            let n = [
                e1[1] * e2[2] - e1[2] * e2[1],
                e1[2] * e2[0] - e1[0] * e2[2],
                e1[0] * e2[1] - e1[1] * e2[0],
            ];
            for &i in &[a, b, c] {
                for k in 0..3 {
                    normals[i][k] += n[k];
                }
            }
        }

        for n in &mut normals {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            *n = if len > 0.0 {
                [n[0] / len, n[1] / len, n[2] / len]
            } else {
                [0.0, 1.0, 0.0]
            };
        }
        self.normals = normals;
    }
}

/// An imported texture, RGBA8
#[derive(Debug, Clone)]
pub struct ImportedTexture {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// An imported material
#[derive(Debug, Clone)]
pub struct ImportedMaterial {
    pub name: String,
    pub base_color: [f32; 4],
    /// Index into `ImportResult::textures`
    pub base_color_texture: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> ImportedMesh {
        ImportedMesh {
            name: "quad".to_string(),
            positions: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 0.0, -1.0],
                [0.0, 0.0, -1.0],
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
            ..Default::default()
        }
    }

    #[test]
    fn test_bounds_union() {
        let a = MeshBounds::from_positions(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]).unwrap();
        let b = MeshBounds::from_positions(&[[-1.0, 0.5, 0.0], [0.5, 2.0, 0.5]]).unwrap();
        let u = a.union(&b);
        assert_eq!(u.min, [-1.0, 0.0, 0.0]);
        assert_eq!(u.max, [1.0, 2.0, 1.0]);
        assert_eq!(u.center(), [0.0, 1.0, 0.5]);
    }

    #[test]
    fn test_empty_bounds() {
        assert!(MeshBounds::from_positions(&[]).is_none());
    }

    #[test]
    fn test_ensure_normals_points_up_for_ccw_floor() {
        let mut mesh = quad();
        mesh.ensure_normals();
        assert_eq!(mesh.normals.len(), 4);
        for n in &mesh.normals {
            assert!((n[1] - 1.0).abs() < 1e-6, "normal {:?}", n);
        }
    }

    #[test]
    fn test_ensure_normals_keeps_existing() {
        let mut mesh = quad();
        mesh.normals = vec![[1.0, 0.0, 0.0]; 4];
        mesh.ensure_normals();
        assert_eq!(mesh.normals[0], [1.0, 0.0, 0.0]);
    }
}
