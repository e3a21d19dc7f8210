//! Room footprint and overlay geometry

use roomcast_core::Vec3;
use roomcast_layout::{Extra, FloorPlan};
use roomcast_mesh::ImportedMesh;

/// Metres covered by one repeat of a floor texture
pub const FLOOR_TILE_SIZE: f32 = 0.3;

/// Planar floor mesh, re-centred on `centroid`, with UVs tiling every `FLOOR_TILE_SIZE`
pub fn floor_mesh(plan: &FloorPlan, centroid: Vec3) -> ImportedMesh {
    let positions: Vec<[f32; 3]> = plan
        .vertices
        .iter()
        .map(|&v| (Vec3::from_array(v) - centroid).to_array())
        .collect();

    let (min_x, min_z) = positions
        .iter()
        .fold((f32::INFINITY, f32::INFINITY), |(mx, mz), p| (mx.min(p[0]), mz.min(p[2])));
    let uvs = positions
        .iter()
        .map(|p| [(p[0] - min_x) / FLOOR_TILE_SIZE, (p[2] - min_z) / FLOOR_TILE_SIZE])
        .collect();

    ImportedMesh {
        name: "floor".to_string(),
        normals: vec![[0.0, 1.0, 0.0]; positions.len()],
        uvs,
        indices: plan.faces.iter().flatten().copied().collect(),
        positions,
        material_index: None,
    }
}

/// Mesh of a wall, door, or window element, re-centred on `centroid`
pub fn extra_mesh(extra: &Extra, centroid: Vec3) -> ImportedMesh {
    let mut mesh = ImportedMesh {
        name: extra.model_type.clone(),
        positions: extra
            .xyz
            .iter()
            .map(|&v| (Vec3::from_array(v) - centroid).to_array())
            .collect(),
        indices: extra.faces.iter().flatten().copied().collect(),
        ..Default::default()
    };
    mesh.ensure_normals();
    mesh
}
