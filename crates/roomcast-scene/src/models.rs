//! Furniture model and image cache

use image::RgbaImage;
use roomcast_core::{Result, RoomcastError};
use roomcast_mesh::{import_model, ImportResult, ImportedMesh, MeshBounds};
use roomcast_render::Mesh;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One imported model, merged into a single mesh
#[derive(Debug)]
pub struct LoadedModel {
    pub name: String,
    /// Model-space geometry with normals and UVs for every vertex
    pub mesh: ImportedMesh,
    pub render_mesh: Arc<Mesh>,
    pub bounds: MeshBounds,
    /// Base colour texture embedded in the model file, if any
    pub embedded_texture: Option<Arc<RgbaImage>>,
}

impl LoadedModel {
    fn from_import(path: &Path, result: ImportResult) -> Result<Self> {
        let mut merged = ImportedMesh {
            name: result.name.clone(),
            ..Default::default()
        };
        for mesh in &result.meshes {
            let mut mesh = mesh.clone();
            mesh.ensure_normals();
            let base = merged.positions.len() as u32;
            let count = mesh.positions.len();
            merged.positions.extend_from_slice(&mesh.positions);
            merged.normals.extend_from_slice(&mesh.normals);
            if mesh.uvs.len() == count {
                merged.uvs.extend_from_slice(&mesh.uvs);
            } else {
                merged.uvs.extend(std::iter::repeat([0.0, 0.0]).take(count));
            }
            merged.indices.extend(mesh.indices.iter().map(|i| i + base));
        }

        let bounds = merged.bounds().ok_or_else(|| {
            RoomcastError::ImportError(format!("{} contains no geometry", path.display()))
        })?;

        let embedded_texture = result
            .meshes
            .iter()
            .filter_map(|m| result.material_for(m))
            .find_map(|m| result.texture_for(m))
            .and_then(|t| RgbaImage::from_raw(t.width, t.height, t.data.clone()))
            .map(Arc::new);

        Ok(Self {
            name: result.name,
            render_mesh: Arc::new(Mesh::from(&merged)),
            mesh: merged,
            bounds,
            embedded_texture,
        })
    }
}

/// Imports each model and image at most once per run
#[derive(Debug, Default)]
pub struct ModelCache {
    models: HashMap<PathBuf, Arc<LoadedModel>>,
    images: HashMap<PathBuf, Arc<RgbaImage>>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(&mut self, path: &Path) -> Result<Arc<LoadedModel>> {
        if let Some(model) = self.models.get(path) {
            return Ok(model.clone());
        }
        let model = Arc::new(LoadedModel::from_import(path, import_model(path)?)?);
        self.models.insert(path.to_path_buf(), model.clone());
        Ok(model)
    }

    pub fn image(&mut self, path: &Path) -> Result<Arc<RgbaImage>> {
        if let Some(image) = self.images.get(path) {
            return Ok(image.clone());
        }
        let image = image::open(path)
            .map_err(|e| {
                RoomcastError::ImportError(format!("Failed to open image '{}': {}", path.display(), e))
            })?
            .to_rgba8();
        let image = Arc::new(image);
        self.images.insert(path.to_path_buf(), image.clone());
        Ok(image)
    }

    /// Texture for a model: the explicit image if given, else whatever the file embeds
    pub fn texture_for(
        &mut self,
        model: &LoadedModel,
        texture_path: Option<&Path>,
    ) -> Result<Option<Arc<RgbaImage>>> {
        match texture_path {
            Some(path) => self.image(path).map(Some),
            None => Ok(model.embedded_texture.clone()),
        }
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}
