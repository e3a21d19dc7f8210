//! GPU-ready mesh data

use bytemuck::{Pod, Zeroable};
use roomcast_mesh::ImportedMesh;

/// A vertex with position, normal, color, and UV coordinates
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x4,
        3 => Float32x2,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// A mesh with vertices and indices
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl From<&ImportedMesh> for Mesh {
    /// White vertices; colour comes from the renderable
    fn from(imported: &ImportedMesh) -> Self {
        let vertices = imported
            .positions
            .iter()
            .enumerate()
            .map(|(i, &position)| Vertex {
                position,
                normal: imported.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                color: [1.0, 1.0, 1.0, 1.0],
                uv: imported.uvs.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect();

        Mesh {
            vertices,
            indices: imported.indices.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> ImportedMesh {
        ImportedMesh {
            name: "tri".to_string(),
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            uvs: vec![[0.0, 0.0], [1.0, 0.0]],
            indices: vec![0, 1, 2],
            ..Default::default()
        }
    }

    #[test]
    fn test_from_imported_fills_missing_attributes() {
        let mesh = Mesh::from(&triangle());
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.vertices[1].uv, [1.0, 0.0]);
        assert_eq!(mesh.vertices[2].uv, [0.0, 0.0]);
        assert_eq!(mesh.vertices[0].normal, [0.0, 1.0, 0.0]);
    }
}
