//! OBJ + MTL scene export

use image::RgbaImage;
use roomcast_core::{Result, RoomcastError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A world-space mesh ready to be written to disk
#[derive(Debug, Clone)]
pub struct ExportMesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    pub color: [f32; 4],
    pub texture: Option<Arc<RgbaImage>>,
}

/// Write each mesh as `object_NNN.obj` + `object_NNN.mtl` (plus `material_NNN.png`
/// for textured meshes) into `directory`, creating it if needed.
///
/// Returns the paths of the written OBJ files in input order.
pub fn export_meshes<P: AsRef<Path>>(directory: P, meshes: &[ExportMesh]) -> Result<Vec<PathBuf>> {
    let directory = directory.as_ref();
    std::fs::create_dir_all(directory)?;

    let mut written = Vec::with_capacity(meshes.len());
    for (i, mesh) in meshes.iter().enumerate() {
        let stem = format!("object_{:03}", i);
        let material = format!("material_{:03}", i);

        let texture_file = match &mesh.texture {
            Some(texture) => {
                let file = format!("{}.png", material);
                texture.save(directory.join(&file)).map_err(|e| {
                    RoomcastError::ExportError(format!("Failed to write texture {}: {}", file, e))
                })?;
                Some(file)
            }
            None => None,
        };

        write_mtl(&directory.join(format!("{}.mtl", stem)), &material, mesh, texture_file.as_deref())?;

        let obj_path = directory.join(format!("{}.obj", stem));
        write_obj(&obj_path, &stem, &material, mesh)?;
        written.push(obj_path);
    }

    Ok(written)
}

fn write_mtl(path: &Path, material: &str, mesh: &ExportMesh, texture: Option<&str>) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    let [r, g, b, a] = mesh.color;
    writeln!(out, "newmtl {}", material)?;
    writeln!(out, "Ka 0.0 0.0 0.0")?;
    writeln!(out, "Kd {:.6} {:.6} {:.6}", r, g, b)?;
    writeln!(out, "Ks 0.0 0.0 0.0")?;
    writeln!(out, "d {:.6}", a)?;
    if let Some(texture) = texture {
        writeln!(out, "map_Kd {}", texture)?;
    }
    out.flush()?;
    Ok(())
}

fn write_obj(path: &Path, stem: &str, material: &str, mesh: &ExportMesh) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    let has_uvs = mesh.uvs.len() == mesh.positions.len();
    let has_normals = mesh.normals.len() == mesh.positions.len();

    writeln!(out, "# {}", mesh.name)?;
    writeln!(out, "mtllib {}.mtl", stem)?;
    writeln!(out, "o {}", stem)?;
    for p in &mesh.positions {
        writeln!(out, "v {:.6} {:.6} {:.6}", p[0], p[1], p[2])?;
    }
    if has_uvs {
        // Back to OBJ's v-up texture space
        for uv in &mesh.uvs {
            writeln!(out, "vt {:.6} {:.6}", uv[0], 1.0 - uv[1])?;
        }
    }
    if has_normals {
        for n in &mesh.normals {
            writeln!(out, "vn {:.6} {:.6} {:.6}", n[0], n[1], n[2])?;
        }
    }
    writeln!(out, "usemtl {}", material)?;
    for tri in mesh.indices.chunks_exact(3) {
        let corner = |i: u32| -> String {
            let k = i + 1;
            match (has_uvs, has_normals) {
                (true, true) => format!("{}/{}/{}", k, k, k),
                (true, false) => format!("{}/{}", k, k),
                (false, true) => format!("{}//{}", k, k),
                (false, false) => k.to_string(),
            }
        };
        writeln!(out, "f {} {} {}", corner(tri[0]), corner(tri[1]), corner(tri[2]))?;
    }
    out.flush()?;
    Ok(())
}
