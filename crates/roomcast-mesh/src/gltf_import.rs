//! glTF/GLB file importer

use crate::types::{ImportResult, ImportedMaterial, ImportedMesh, ImportedTexture};
use roomcast_core::{Result, RoomcastError};
use std::path::Path;

/// Import a glTF or GLB file
pub fn import_gltf<P: AsRef<Path>>(path: P) -> Result<ImportResult> {
    let path = path.as_ref();
    let (document, buffers, images) = gltf::import(path).map_err(|e| {
        RoomcastError::ImportError(format!("Failed to import glTF {}: {}", path.display(), e))
    })?;

    let file_name = path
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed")
        .to_string();

    let mut meshes = Vec::new();

    for mesh in document.meshes() {
        let mesh_name = mesh
            .name()
            .map(String::from)
            .unwrap_or_else(|| format!("mesh_{}", mesh.index()));

        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .map(|iter| iter.collect())
                .unwrap_or_default();

            let normals: Vec<[f32; 3]> = reader
                .read_normals()
                .map(|iter| iter.collect())
                .unwrap_or_default();

            let uvs: Vec<[f32; 2]> = reader
                .read_tex_coords(0)
                .map(|iter| iter.into_f32().collect())
                .unwrap_or_default();

            let indices: Vec<u32> = reader
                .read_indices()
                .map(|iter| iter.into_u32().collect())
                .unwrap_or_else(|| (0..positions.len() as u32).collect());

            let mut imported = ImportedMesh {
                name: mesh_name.clone(),
                positions,
                normals,
                uvs,
                indices,
                material_index: primitive.material().index(),
            };
            imported.ensure_normals();
            meshes.push(imported);
        }
    }

    // glTF images are indexed by source image, textures point at images
    let textures: Vec<ImportedTexture> = document
        .textures()
        .filter_map(|texture| {
            let image = images.get(texture.source().index())?;
            let name = texture
                .name()
                .map(String::from)
                .unwrap_or_else(|| format!("texture_{}", texture.index()));
            Some(ImportedTexture {
                name,
                width: image.width,
                height: image.height,
                data: to_rgba8(image),
            })
        })
        .collect();

    let materials = document
        .materials()
        .map(|material| {
            let pbr = material.pbr_metallic_roughness();
            ImportedMaterial {
                name: material
                    .name()
                    .map(String::from)
                    .unwrap_or_else(|| format!("material_{}", material.index().unwrap_or(0))),
                base_color: pbr.base_color_factor(),
                base_color_texture: pbr.base_color_texture().map(|info| info.texture().index()),
            }
        })
        .collect();

    Ok(ImportResult {
        name: file_name,
        meshes,
        textures,
        materials,
    })
}

fn to_rgba8(image: &gltf::image::Data) -> Vec<u8> {
    let pixel_count = (image.width * image.height) as usize;
    match image.format {
        gltf::image::Format::R8G8B8A8 => image.pixels.clone(),
        gltf::image::Format::R8G8B8 => image
            .pixels
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], 255])
            .collect(),
        gltf::image::Format::R8G8 => image
            .pixels
            .chunks_exact(2)
            .flat_map(|c| [c[0], c[1], 0, 255])
            .collect(),
        gltf::image::Format::R8 => image
            .pixels
            .iter()
            .flat_map(|&b| [b, b, b, 255])
            .collect(),
        // Wider formats are rare for furniture albedo; fall back to white
        _ => vec![255u8; pixel_count * 4],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "buffers": [ { "uri": "seat.bin", "byteLength": 60 } ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 24 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0, 0, 0], "max": [1, 1, 0] },
            { "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC2" }
        ],
        "images": [ { "uri": "albedo.png" } ],
        "textures": [ { "source": 0 } ],
        "materials": [ { "name": "fabric",
                         "pbrMetallicRoughness": { "baseColorTexture": { "index": 0 } } } ],
        "meshes": [ { "name": "seat", "primitives": [
            { "attributes": { "POSITION": 0, "TEXCOORD_0": 1 }, "material": 0 } ] } ]
    }"#;

    /// A one-triangle glTF with a 2x2 base colour texture beside it
    fn write_triangle(dir: &Path) -> PathBuf {
        std::fs::create_dir_all(dir).unwrap();
        let floats: [f32; 15] = [
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, // positions
            0.0, 0.0, 1.0, 0.0, 0.0, 1.0, // uvs
        ];
        let bytes: Vec<u8> = floats.iter().flat_map(|f| f.to_le_bytes()).collect();
        std::fs::write(dir.join("seat.bin"), bytes).unwrap();
        image::RgbaImage::from_pixel(2, 2, image::Rgba([90, 60, 30, 255]))
            .save(dir.join("albedo.png"))
            .unwrap();
        let path = dir.join("seat.gltf");
        std::fs::write(&path, TRIANGLE_GLTF).unwrap();
        path
    }

    #[test]
    fn test_import_triangle_with_texture() {
        let dir = std::env::temp_dir().join(format!("roomcast_gltf_test_{}", uuid::Uuid::new_v4()));
        let path = write_triangle(&dir);

        let result = crate::import_model(&path).unwrap();
        assert_eq!(result.name, "seat");
        assert_eq!(result.meshes.len(), 1);

        let mesh = &result.meshes[0];
        assert_eq!(mesh.positions.len(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.uvs[1], [1.0, 0.0]);
        // Generated from the counter-clockwise winding
        assert_eq!(mesh.normals[0], [0.0, 0.0, 1.0]);

        let material = &result.materials[mesh.material_index.unwrap()];
        assert_eq!(material.name, "fabric");
        let texture = result.texture_for(material).unwrap();
        assert_eq!((texture.width, texture.height), (2, 2));
        assert_eq!(&texture.data[..4], &[90, 60, 30, 255]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_buffer_is_import_error() {
        let dir = std::env::temp_dir().join(format!("roomcast_gltf_test_{}", uuid::Uuid::new_v4()));
        let path = write_triangle(&dir);
        std::fs::remove_file(dir.join("seat.bin")).unwrap();

        let err = import_gltf(&path).unwrap_err();
        assert!(matches!(err, RoomcastError::ImportError(_)));

        std::fs::remove_dir_all(&dir).ok();
    }
}
