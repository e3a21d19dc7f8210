//! Results bundle loading

use crate::dataset::{SceneRecord, TestDataset};
use crate::predicted::PredictedLayout;
use crate::room_type::RoomType;
use roomcast_core::{Result, RoomcastError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Value of the `type` field every results bundle must carry
pub const RESULTS_BUNDLE_TYPE: &str = "ThreedFrontResults";

/// Where the test dataset lives: beside the bundle or inline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DatasetSource {
    File { path: PathBuf },
    Inline(TestDataset),
}

#[derive(Debug, Deserialize)]
struct BundleFile {
    config: serde_json::Value,
    test_dataset: DatasetSource,
    scene_indices: Vec<usize>,
    predicted_layouts: Vec<PredictedLayout>,
}

/// Predicted layouts together with the dataset and training config they came from
#[derive(Debug, Clone)]
pub struct ResultsBundle {
    pub config: serde_json::Value,
    pub test_dataset: TestDataset,
    pub scene_indices: Vec<usize>,
    pub predicted_layouts: Vec<PredictedLayout>,
    /// File the bundle was read from
    pub source: PathBuf,
}

/// The scene and layout picked out by a resolved index
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    /// Position in the bundle's index list
    pub index: usize,
    /// Position in the test dataset
    pub scene_index: usize,
    pub scene: &'a SceneRecord,
    pub layout: &'a PredictedLayout,
}

impl ResultsBundle {
    /// Load and validate a bundle file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let mut bundle = Self::from_json(&content, base)?;
        bundle.source = path.to_path_buf();
        Ok(bundle)
    }

    /// Parse a bundle from JSON text; relative dataset and model paths resolve against `base`
    pub fn from_json(content: &str, base: &Path) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| RoomcastError::ParseError(format!("Failed to parse results bundle: {}", e)))?;

        let found = value
            .get("type")
            .and_then(|t| t.as_str())
            .unwrap_or("<missing>");
        if found != RESULTS_BUNDLE_TYPE {
            return Err(RoomcastError::BundleType {
                expected: RESULTS_BUNDLE_TYPE.to_string(),
                found: found.to_string(),
            });
        }

        let file: BundleFile = serde_json::from_value(value)
            .map_err(|e| RoomcastError::InvalidBundle(e.to_string()))?;

        let test_dataset = match file.test_dataset {
            DatasetSource::File { path } => TestDataset::load(crate::dataset::resolve(base, &path))?,
            DatasetSource::Inline(mut dataset) => {
                dataset.resolve_paths(base);
                dataset
            }
        };

        let bundle = Self {
            config: file.config,
            test_dataset,
            scene_indices: file.scene_indices,
            predicted_layouts: file.predicted_layouts,
            source: PathBuf::new(),
        };
        bundle.validate()?;
        Ok(bundle)
    }

    fn validate(&self) -> Result<()> {
        if self.scene_indices.len() != self.predicted_layouts.len() {
            return Err(RoomcastError::InvalidBundle(format!(
                "{} scene indices but {} predicted layouts",
                self.scene_indices.len(),
                self.predicted_layouts.len()
            )));
        }
        if self.scene_indices.is_empty() {
            return Err(RoomcastError::InvalidBundle(
                "bundle holds no predicted layouts".to_string(),
            ));
        }
        if let Some(&bad) = self
            .scene_indices
            .iter()
            .find(|&&i| i >= self.test_dataset.len())
        {
            return Err(RoomcastError::SceneOutOfRange {
                index: bad,
                len: self.test_dataset.len(),
            });
        }
        for layout in &self.predicted_layouts {
            layout.validate()?;
        }
        Ok(())
    }

    /// Number of predicted layouts
    pub fn len(&self) -> usize {
        self.scene_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scene_indices.is_empty()
    }

    /// Look up a dotted key such as `data.dataset_directory` in the config mapping
    pub fn config_value(&self, dotted: &str) -> Option<&serde_json::Value> {
        dotted
            .split('.')
            .try_fold(&self.config, |value, key| value.get(key))
    }

    pub fn dataset_directory(&self) -> Result<&str> {
        self.config_value("data.dataset_directory")
            .and_then(|v| v.as_str())
            .ok_or_else(|| RoomcastError::MissingConfigKey("data.dataset_directory".to_string()))
    }

    /// Whether the model was conditioned on the room mask; absent means yes
    pub fn room_mask_condition(&self) -> bool {
        self.config_value("network.room_mask_condition")
            .and_then(|v| v.as_bool())
            .unwrap_or(true)
    }

    pub fn room_type(&self) -> Result<RoomType> {
        RoomType::detect(self.dataset_directory()?)
    }

    /// Scene and layout for an already-resolved index
    pub fn select(&self, index: usize) -> Result<Selection<'_>> {
        let scene_index = *self
            .scene_indices
            .get(index)
            .ok_or(RoomcastError::SceneOutOfRange {
                index,
                len: self.scene_indices.len(),
            })?;
        Ok(Selection {
            index,
            scene_index,
            scene: self.test_dataset.get(scene_index)?,
            layout: &self.predicted_layouts[index],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle_json(kind: &str, room_mask: Option<bool>) -> String {
        let network = match room_mask {
            Some(v) => format!(r#"{{ "room_mask_condition": {} }}"#, v),
            None => "{}".to_string(),
        };
        format!(
            r#"{{
                "type": "{kind}",
                "config": {{
                    "data": {{ "dataset_directory": "/data/threed_front_bedroom" }},
                    "network": {network}
                }},
                "test_dataset": {{
                    "object_types": ["bed", "chair"],
                    "scenes": [
                        {{ "scene_id": "a", "centroid": [0,0,0], "floor_plan": {{ "vertices": [], "faces": [] }} }},
                        {{ "scene_id": "b", "centroid": [0,0,0], "floor_plan": {{ "vertices": [], "faces": [] }} }}
                    ]
                }},
                "scene_indices": [1, 0],
                "predicted_layouts": [
                    {{ "class_labels": [[1.0, 0.0]], "translations": [[0,0,0]], "sizes": [[1,1,1]], "angles": [[0]] }},
                    {{ "class_labels": [], "translations": [], "sizes": [], "angles": [] }}
                ]
            }}"#
        )
    }

    #[test]
    fn test_load_inline_bundle() {
        let bundle = ResultsBundle::from_json(&bundle_json("ThreedFrontResults", None), Path::new("/tmp")).unwrap();
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.test_dataset.n_object_types(), 2);
        assert_eq!(bundle.room_type().unwrap(), RoomType::Bedroom);
        assert!(bundle.room_mask_condition());

        let selection = bundle.select(0).unwrap();
        assert_eq!(selection.scene_index, 1);
        assert_eq!(selection.scene.scene_id, "b");
        assert_eq!(selection.layout.len(), 1);
    }

    #[test]
    fn test_wrong_bundle_type_is_named() {
        let err = ResultsBundle::from_json(&bundle_json("SomethingElse", None), Path::new("/tmp")).unwrap_err();
        match err {
            RoomcastError::BundleType { found, .. } => assert_eq!(found, "SomethingElse"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_room_mask_condition_read_from_config() {
        let bundle = ResultsBundle::from_json(&bundle_json("ThreedFrontResults", Some(false)), Path::new("/tmp")).unwrap();
        assert!(!bundle.room_mask_condition());
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let json = bundle_json("ThreedFrontResults", None).replace("[1, 0]", "[1]");
        let err = ResultsBundle::from_json(&json, Path::new("/tmp")).unwrap_err();
        assert!(matches!(err, RoomcastError::InvalidBundle(_)));
    }

    #[test]
    fn test_scene_index_outside_dataset_rejected() {
        let json = bundle_json("ThreedFrontResults", None).replace("[1, 0]", "[1, 5]");
        let err = ResultsBundle::from_json(&json, Path::new("/tmp")).unwrap_err();
        assert!(matches!(err, RoomcastError::SceneOutOfRange { index: 5, len: 2 }));
    }

    #[test]
    fn test_dataset_from_file() {
        let dir = std::env::temp_dir().join(format!("roomcast_bundle_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("dataset.json"),
            r#"{ "object_types": ["bed"], "scenes": [
                { "scene_id": "only", "centroid": [0,0,0], "floor_plan": { "vertices": [], "faces": [] } }
            ] }"#,
        )
        .unwrap();
        let bundle_path = dir.join("results.json");
        std::fs::write(
            &bundle_path,
            r#"{ "type": "ThreedFrontResults",
                 "config": { "data": { "dataset_directory": "x_library" } },
                 "test_dataset": { "path": "dataset.json" },
                 "scene_indices": [0],
                 "predicted_layouts": [ { "class_labels": [], "translations": [], "sizes": [], "angles": [] } ] }"#,
        )
        .unwrap();

        let bundle = ResultsBundle::load(&bundle_path).unwrap();
        assert_eq!(bundle.source, bundle_path);
        assert_eq!(bundle.test_dataset.scenes[0].scene_id, "only");
        assert_eq!(bundle.room_type().unwrap(), RoomType::Library);

        std::fs::remove_dir_all(&dir).ok();
    }
}
