//! Test dataset and ground-truth scene records

use roomcast_core::{Result, RoomcastError, Transform, Vec3};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The dataset a results bundle was evaluated against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestDataset {
    /// Object-type vocabulary; predicted class vectors index into it
    pub object_types: Vec<String>,
    pub scenes: Vec<SceneRecord>,
}

impl TestDataset {
    /// Load a dataset file, resolving model paths relative to its directory
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RoomcastError::InvalidBundle(format!(
                "Failed to read test dataset {}: {}",
                path.display(),
                e
            ))
        })?;
        let mut dataset: TestDataset = serde_json::from_str(&content).map_err(|e| {
            RoomcastError::ParseError(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        dataset.resolve_paths(path.parent().unwrap_or_else(|| Path::new(".")));
        Ok(dataset)
    }

    pub fn n_object_types(&self) -> usize {
        self.object_types.len()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&SceneRecord> {
        self.scenes.get(index).ok_or(RoomcastError::SceneOutOfRange {
            index,
            len: self.scenes.len(),
        })
    }

    pub(crate) fn resolve_paths(&mut self, base: &Path) {
        for scene in &mut self.scenes {
            for furniture in &mut scene.furniture {
                furniture.raw_model_path = resolve(base, &furniture.raw_model_path);
                furniture.texture_image_path = furniture
                    .texture_image_path
                    .as_ref()
                    .map(|p| resolve(base, p));
            }
        }
    }
}

pub(crate) fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// One ground-truth room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneRecord {
    pub scene_id: String,
    /// Subtracted from every scene-space coordinate before rendering
    pub centroid: Vec3,
    pub floor_plan: FloorPlan,
    #[serde(default)]
    pub extras: Vec<Extra>,
    #[serde(default)]
    pub furniture: Vec<FurnitureInstance>,
}

impl SceneRecord {
    pub fn walls(&self) -> impl Iterator<Item = &Extra> {
        self.extras.iter().filter(|e| e.is_wall())
    }

    pub fn doors_and_windows(&self) -> impl Iterator<Item = &Extra> {
        self.extras.iter().filter(|e| e.is_door_or_window())
    }
}

/// Room footprint as a triangulated polygon in scene coordinates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FloorPlan {
    pub vertices: Vec<[f32; 3]>,
    pub faces: Vec<[u32; 3]>,
}

/// A non-furniture element: wall, door, window, ceiling...
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extra {
    pub model_uid: String,
    pub model_type: String,
    pub xyz: Vec<[f32; 3]>,
    pub faces: Vec<[u32; 3]>,
}

impl Extra {
    pub fn is_wall(&self) -> bool {
        self.model_type.contains("WallInner")
    }

    pub fn is_door_or_window(&self) -> bool {
        self.model_type.contains("Window") || self.model_type.contains("Door")
    }
}

/// A placed 3D-FUTURE model in a ground-truth scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FurnitureInstance {
    pub model_jid: String,
    pub label: String,
    pub raw_model_path: PathBuf,
    #[serde(default)]
    pub texture_image_path: Option<PathBuf>,
    pub position: Vec3,
    /// Quaternion [x, y, z, w]
    pub rotation: [f32; 4],
    pub scale: Vec3,
}

impl FurnitureInstance {
    /// Placement in scene coordinates
    pub fn transform(&self) -> Transform {
        Transform::IDENTITY
            .with_position(self.position)
            .with_rotation(self.rotation)
            .with_scale(self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extra(model_type: &str) -> Extra {
        Extra {
            model_uid: "uid".to_string(),
            model_type: model_type.to_string(),
            xyz: vec![],
            faces: vec![],
        }
    }

    #[test]
    fn test_extra_markers() {
        assert!(extra("WallInner").is_wall());
        assert!(!extra("WallOuter").is_wall());
        assert!(extra("Window").is_door_or_window());
        assert!(extra("SingleDoor").is_door_or_window());
        assert!(!extra("Ceiling").is_door_or_window());
    }

    #[test]
    fn test_scene_record_parses_with_defaults() {
        let json = r#"{
            "scene_id": "Bedroom-1234",
            "centroid": [1.0, 0.0, 2.0],
            "floor_plan": { "vertices": [[0,0,0],[1,0,0],[1,0,1]], "faces": [[0,2,1]] }
        }"#;
        let scene: SceneRecord = serde_json::from_str(json).unwrap();
        assert_eq!(scene.centroid, Vec3::new(1.0, 0.0, 2.0));
        assert!(scene.extras.is_empty());
        assert!(scene.furniture.is_empty());
        assert_eq!(scene.floor_plan.faces.len(), 1);
    }

    #[test]
    fn test_relative_model_paths_resolved() {
        let mut dataset = TestDataset {
            object_types: vec!["bed".to_string()],
            scenes: vec![SceneRecord {
                scene_id: "s".to_string(),
                centroid: Vec3::ZERO,
                floor_plan: FloorPlan::default(),
                extras: vec![],
                furniture: vec![FurnitureInstance {
                    model_jid: "jid".to_string(),
                    label: "bed".to_string(),
                    raw_model_path: PathBuf::from("models/jid/raw_model.obj"),
                    texture_image_path: Some(PathBuf::from("/abs/texture.png")),
                    position: Vec3::ZERO,
                    rotation: [0.0, 0.0, 0.0, 1.0],
                    scale: Vec3::ONE,
                }],
            }],
        };
        dataset.resolve_paths(Path::new("/data"));
        let f = &dataset.scenes[0].furniture[0];
        assert_eq!(f.raw_model_path, PathBuf::from("/data/models/jid/raw_model.obj"));
        assert_eq!(f.texture_image_path, Some(PathBuf::from("/abs/texture.png")));
    }

    #[test]
    fn test_get_out_of_range() {
        let dataset = TestDataset {
            object_types: vec![],
            scenes: vec![],
        };
        assert!(matches!(
            dataset.get(3),
            Err(RoomcastError::SceneOutOfRange { index: 3, len: 0 })
        ));
    }
}
