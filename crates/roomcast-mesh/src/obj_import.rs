//! Wavefront OBJ importer

use crate::types::{ImportResult, ImportedMesh};
use roomcast_core::{Result, RoomcastError};
use std::collections::HashMap;
use std::path::Path;

/// Import an OBJ file. Each group becomes one mesh; polygons are fan-triangulated.
///
/// OBJ texture space has v pointing up, so v is flipped to match image rows.
pub fn import_obj<P: AsRef<Path>>(path: P) -> Result<ImportResult> {
    let path = path.as_ref();
    let obj = obj::Obj::load(path).map_err(|e| {
        RoomcastError::ImportError(format!("Failed to import OBJ {}: {}", path.display(), e))
    })?;
    let data = &obj.data;

    let file_name = path
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed")
        .to_string();

    let mut meshes = Vec::new();

    for object in &data.objects {
        for group in &object.groups {
            let mut mesh = ImportedMesh {
                name: if group.name.is_empty() {
                    object.name.clone()
                } else {
                    format!("{}/{}", object.name, group.name)
                },
                ..Default::default()
            };
            let mut remap: HashMap<(usize, Option<usize>, Option<usize>), u32> = HashMap::new();
            let mut has_normals = true;

            for poly in &group.polys {
                let mut corners = Vec::with_capacity(poly.0.len());
                for tuple in &poly.0 {
                    let key = (tuple.0, tuple.1, tuple.2);
                    let index = match remap.get(&key) {
                        Some(&i) => i,
                        None => {
                            let position = *data.position.get(tuple.0).ok_or_else(|| {
                                RoomcastError::ImportError(format!(
                                    "{}: position index {} out of range",
                                    path.display(),
                                    tuple.0
                                ))
                            })?;
                            let uv = tuple
                                .1
                                .and_then(|t| data.texture.get(t))
                                .map(|t| [t[0], 1.0 - t[1]])
                                .unwrap_or([0.0, 0.0]);
                            match tuple.2.and_then(|n| data.normal.get(n)) {
                                Some(n) => mesh.normals.push(*n),
                                None => has_normals = false,
                            }

                            let i = mesh.positions.len() as u32;
                            mesh.positions.push(position);
                            mesh.uvs.push(uv);
                            remap.insert(key, i);
                            i
                        }
                    };
                    corners.push(index);
                }

                for k in 1..corners.len().saturating_sub(1) {
                    mesh.indices
                        .extend_from_slice(&[corners[0], corners[k], corners[k + 1]]);
                }
            }

            if mesh.indices.is_empty() {
                continue;
            }
            if !has_normals {
                mesh.normals.clear();
            }
            mesh.ensure_normals();
            meshes.push(mesh);
        }
    }

    if meshes.is_empty() {
        return Err(RoomcastError::ImportError(format!(
            "{} contains no faces",
            path.display()
        )));
    }

    Ok(ImportResult {
        name: file_name,
        meshes,
        textures: Vec::new(),
        materials: Vec::new(),
    })
}
