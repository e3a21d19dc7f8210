//! Floor texture candidates

use roomcast_core::{Result, RoomcastError};
use std::path::{Path, PathBuf};

/// Every file in `path` (sorted), or `path` itself when it names a file.
///
/// A missing path or a directory with no files is `NoFloorTextures`; any
/// other failure to list the directory is an I/O error.
pub fn texture_candidates(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let no_textures = || RoomcastError::NoFloorTextures(path.display().to_string());
    let entries = std::fs::read_dir(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => no_textures(),
        _ => RoomcastError::IoError(e),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let file = entry?.path();
        if file.is_file() {
            files.push(file);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(no_textures());
    }
    Ok(files)
}
