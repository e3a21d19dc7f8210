//! Behaviours attached to a render run

use crate::trajectory::Circle;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub enum Behaviour {
    /// Move the point light to the camera before every frame
    LightToCamera,
    /// Save the current frame as a PNG in `directory` when `S` is pressed
    SnapshotOnKey { directory: PathBuf },
    /// Drive the camera position along a path, one step per frame
    CameraTrajectory(Circle),
    /// Collect every `every_n`th frame into a looping GIF
    SaveGif {
        path: PathBuf,
        every_n: usize,
        duration_ms: u32,
    },
}

/// Lookup helpers over a behaviour slice
pub(crate) struct Behaviours<'a>(pub &'a [Behaviour]);

impl<'a> Behaviours<'a> {
    pub fn light_to_camera(&self) -> bool {
        self.0.iter().any(|b| matches!(b, Behaviour::LightToCamera))
    }

    pub fn snapshot_directory(&self) -> Option<&'a Path> {
        self.0.iter().find_map(|b| match b {
            Behaviour::SnapshotOnKey { directory } => Some(directory.as_path()),
            _ => None,
        })
    }

    pub fn trajectory(&self) -> Option<&'a Circle> {
        self.0.iter().find_map(|b| match b {
            Behaviour::CameraTrajectory(circle) => Some(circle),
            _ => None,
        })
    }

    /// `(path, every_n, duration_ms)` of the first GIF behaviour
    pub fn gif(&self) -> Option<(&'a Path, usize, u32)> {
        self.0.iter().find_map(|b| match b {
            Behaviour::SaveGif {
                path,
                every_n,
                duration_ms,
            } => Some((path.as_path(), (*every_n).max(1), *duration_ms)),
            _ => None,
        })
    }
}
