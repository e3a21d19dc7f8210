//! Ground-truth scene export

use crate::floor::floor_mesh;
use crate::models::ModelCache;
use crate::policy::FloorPolicy;
use roomcast_core::{Color, Result, Transform, Vec3};
use roomcast_layout::SceneRecord;
use roomcast_mesh::{export_meshes, ExportMesh, ImportedMesh};
use std::path::{Path, PathBuf};

/// Write the scene's furniture and floor to `<output_directory>/<scene_id>/`.
///
/// Furniture comes first in scene order, the floor last; `NoFloor` writes no floor.
/// Returns the directory written.
pub fn export_scene(
    output_directory: &Path,
    scene: &SceneRecord,
    floor: &FloorPolicy,
    models: &mut ModelCache,
) -> Result<PathBuf> {
    let directory = output_directory.join(&scene.scene_id);
    let mut meshes = Vec::with_capacity(scene.furniture.len() + 1);

    for furniture in &scene.furniture {
        let model = models.model(&furniture.raw_model_path)?;
        let texture = models.texture_for(&model, furniture.texture_image_path.as_deref())?;
        let transform = furniture
            .transform()
            .with_position(furniture.position - scene.centroid);

        let color = if texture.is_some() { Color::WHITE } else { Color::GREY };
        let mut mesh = to_export(&furniture.model_jid, &model.mesh, &transform, color);
        mesh.texture = texture;
        meshes.push(mesh);
    }

    match floor {
        FloorPolicy::NoFloor => {}
        FloorPolicy::SolidColor(color) => {
            let plan = floor_mesh(&scene.floor_plan, scene.centroid);
            meshes.push(to_export("floor", &plan, &Transform::IDENTITY, *color));
        }
        FloorPolicy::Textured(path) => {
            let plan = floor_mesh(&scene.floor_plan, scene.centroid);
            let mut mesh = to_export("floor", &plan, &Transform::IDENTITY, Color::WHITE);
            mesh.texture = Some(models.image(path)?);
            meshes.push(mesh);
        }
    }

    export_meshes(&directory, &meshes)?;
    println!("[export] Saved {} meshes to {}", meshes.len(), directory.display());
    Ok(directory)
}

fn to_export(name: &str, mesh: &ImportedMesh, transform: &Transform, color: Color) -> ExportMesh {
    ExportMesh {
        name: name.to_string(),
        positions: mesh
            .positions
            .iter()
            .map(|&p| transform.transform_point(Vec3::from_array(p)).to_array())
            .collect(),
        normals: mesh
            .normals
            .iter()
            .map(|&n| transform.transform_normal(Vec3::from_array(n)).to_array())
            .collect(),
        uvs: mesh.uvs.clone(),
        indices: mesh.indices.clone(),
        color: color.to_array(),
        texture: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomcast_layout::{FloorPlan, FurnitureInstance};

    fn scratch() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("roomcast_export_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn scene(model: &Path) -> SceneRecord {
        SceneRecord {
            scene_id: "LivingRoom-42".to_string(),
            centroid: Vec3::new(1.0, 0.0, 0.0),
            floor_plan: FloorPlan {
                vertices: vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [2.0, 0.0, 2.0]],
                faces: vec![[0, 2, 1]],
            },
            extras: vec![],
            furniture: vec![FurnitureInstance {
                model_jid: "sofa".to_string(),
                label: "sofa".to_string(),
                raw_model_path: model.to_path_buf(),
                texture_image_path: None,
                position: Vec3::new(3.0, 0.0, 0.0),
                rotation: [0.0, 0.0, 0.0, 1.0],
                scale: Vec3::ONE,
            }],
        }
    }

    #[test]
    fn test_export_writes_furniture_then_floor() {
        let dir = scratch();
        let model = dir.join("sofa.obj");
        std::fs::write(&model, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let out = dir.join("out");

        let mut models = ModelCache::new();
        let written = export_scene(
            &out,
            &scene(&model),
            &FloorPolicy::SolidColor(Color::WHITE),
            &mut models,
        )
        .unwrap();

        assert_eq!(written, out.join("LivingRoom-42"));
        assert!(written.join("object_000.obj").exists());
        assert!(written.join("object_001.obj").exists());
        assert!(!written.join("object_002.obj").exists());

        // Furniture is re-centred with the floor
        let sofa = std::fs::read_to_string(written.join("object_000.obj")).unwrap();
        assert!(sofa.contains("v 2.000000 0.000000 0.000000"), "{}", sofa);
        let floor = std::fs::read_to_string(written.join("object_001.obj")).unwrap();
        assert!(floor.starts_with("# floor"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_no_floor_exports_furniture_only() {
        let dir = scratch();
        let model = dir.join("sofa.obj");
        std::fs::write(&model, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let mut models = ModelCache::new();
        let written =
            export_scene(&dir, &scene(&model), &FloorPolicy::NoFloor, &mut models).unwrap();
        assert!(written.join("object_000.obj").exists());
        assert!(!written.join("object_001.obj").exists());

        std::fs::remove_dir_all(&dir).ok();
    }
}
