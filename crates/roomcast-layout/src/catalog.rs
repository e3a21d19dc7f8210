//! Furniture catalog lookup

use crate::dataset::resolve;
use roomcast_core::{Result, RoomcastError, Vec3};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One 3D-FUTURE model available for retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub model_jid: String,
    pub label: String,
    /// Half extents of the model's bounding box
    pub size: Vec3,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
    pub raw_model_path: PathBuf,
    #[serde(default)]
    pub texture_image_path: Option<PathBuf>,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

impl CatalogEntry {
    fn size_distance(&self, size: Vec3) -> f32 {
        let d = self.size - size;
        d.dot(&d)
    }
}

/// The furniture models of one room type
#[derive(Debug, Clone, Default)]
pub struct FurnitureCatalog {
    entries: Vec<CatalogEntry>,
}

impl FurnitureCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Load a catalog file, resolving model paths relative to its directory
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RoomcastError::CatalogError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let mut entries: Vec<CatalogEntry> = serde_json::from_str(&content).map_err(|e| {
            RoomcastError::CatalogError(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for entry in &mut entries {
            entry.raw_model_path = resolve(base, &entry.raw_model_path);
            entry.texture_image_path = entry.texture_image_path.as_ref().map(|p| resolve(base, p));
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// The model of `label` whose half extents are closest to `size`.
    ///
    /// Ties keep the earliest entry.
    pub fn closest_to_box(&self, label: &str, size: Vec3) -> Result<&CatalogEntry> {
        let mut best: Option<(&CatalogEntry, f32)> = None;
        for entry in self.entries.iter().filter(|e| e.label == label) {
            let d = entry.size_distance(size);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((entry, d)),
            }
        }
        best.map(|(e, _)| e)
            .ok_or_else(|| RoomcastError::NoMatchingFurniture(label.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(jid: &str, label: &str, size: [f32; 3]) -> CatalogEntry {
        CatalogEntry {
            model_jid: jid.to_string(),
            label: label.to_string(),
            size: Vec3::from_array(size),
            scale: Vec3::ONE,
            raw_model_path: PathBuf::from(format!("{}.obj", jid)),
            texture_image_path: None,
        }
    }

    fn catalog() -> FurnitureCatalog {
        FurnitureCatalog::new(vec![
            entry("small_bed", "double_bed", [0.8, 0.4, 1.0]),
            entry("large_bed", "double_bed", [1.2, 0.5, 1.1]),
            entry("chair", "chair", [0.3, 0.5, 0.3]),
        ])
    }

    #[test]
    fn test_closest_by_size_within_label() {
        let c = catalog();
        let hit = c.closest_to_box("double_bed", Vec3::new(1.1, 0.5, 1.0)).unwrap();
        assert_eq!(hit.model_jid, "large_bed");
        let hit = c.closest_to_box("double_bed", Vec3::new(0.7, 0.4, 1.0)).unwrap();
        assert_eq!(hit.model_jid, "small_bed");
    }

    #[test]
    fn test_label_is_never_crossed() {
        let c = catalog();
        let hit = c.closest_to_box("chair", Vec3::new(1.2, 0.5, 1.1)).unwrap();
        assert_eq!(hit.model_jid, "chair");
    }

    #[test]
    fn test_ties_keep_first_entry() {
        let c = FurnitureCatalog::new(vec![
            entry("first", "table", [0.5, 0.5, 0.5]),
            entry("second", "table", [0.5, 0.5, 0.5]),
        ]);
        let hit = c.closest_to_box("table", Vec3::new(0.5, 0.5, 0.5)).unwrap();
        assert_eq!(hit.model_jid, "first");
    }

    #[test]
    fn test_unknown_label() {
        let err = catalog().closest_to_box("piano", Vec3::ONE).unwrap_err();
        assert!(matches!(err, RoomcastError::NoMatchingFurniture(ref l) if l == "piano"));
    }

    #[test]
    fn test_load_resolves_paths() {
        let dir = std::env::temp_dir().join(format!("roomcast_catalog_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("threed_future_model_bedroom.json");
        std::fs::write(
            &path,
            r#"[ { "model_jid": "m1", "label": "wardrobe", "size": [0.5, 1.0, 0.3],
                   "raw_model_path": "m1/raw_model.obj", "texture_image_path": "m1/texture.png" } ]"#,
        )
        .unwrap();

        let c = FurnitureCatalog::load(&path).unwrap();
        assert_eq!(c.len(), 1);
        let e = &c.entries()[0];
        assert_eq!(e.scale, Vec3::ONE);
        assert_eq!(e.raw_model_path, dir.join("m1/raw_model.obj"));
        assert_eq!(e.texture_image_path.as_deref(), Some(dir.join("m1/texture.png").as_path()));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_catalog_file() {
        let err = FurnitureCatalog::load("/nonexistent/roomcast/catalog.json").unwrap_err();
        assert!(matches!(err, RoomcastError::CatalogError(_)));
    }
}
