//! Roomcast Mesh - Model import and scene export
//!
//! Furniture models arrive as Wavefront OBJ (the 3D-FUTURE layout) or
//! glTF/GLB. Both importers produce the same `ImportResult`. The exporter
//! writes transformed meshes back out as OBJ + MTL pairs.

mod export;
mod gltf_import;
mod obj_import;
mod types;

pub use export::{export_meshes, ExportMesh};
pub use gltf_import::import_gltf;
pub use obj_import::import_obj;
pub use types::{ImportResult, ImportedMaterial, ImportedMesh, ImportedTexture, MeshBounds};

use roomcast_core::{Result, RoomcastError};
use std::path::Path;

/// Import a model file, choosing the importer by extension
pub fn import_model<P: AsRef<Path>>(path: P) -> Result<ImportResult> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "obj" => import_obj(path),
        "gltf" | "glb" => import_gltf(path),
        other => Err(RoomcastError::ImportError(format!(
            "Unsupported model format '{}' for {}",
            other,
            path.display()
        ))),
    }
}
