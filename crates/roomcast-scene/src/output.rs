//! Output stage: interactive view or GIF trajectory

use roomcast_core::Result;
use roomcast_render::{Behaviour, Circle, RenderSink, Renderable, ViewSettings};
use std::path::{Path, PathBuf};

/// Frames in one full camera revolution
pub const TRAJECTORY_FRAMES: usize = 360;
pub const DEFAULT_FRAME_DURATION_MS: u32 = 36;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Interactive,
    Batch,
}

/// Everything the output stage needs besides the renderables
#[derive(Debug, Clone)]
pub struct OutputPlan {
    pub mode: OutputMode,
    pub output_directory: PathBuf,
    /// Index text as the user typed it; names the GIF
    pub requested_index: String,
    /// Flat-palette renders get a `_notexture` suffix
    pub flat_palette: bool,
    pub frame_duration_ms: u32,
}

/// `<output_directory>/<index>[_notexture].gif`
pub fn gif_path(output_directory: &Path, requested_index: &str, flat_palette: bool) -> PathBuf {
    let stem = if flat_palette {
        format!("{}_notexture", requested_index)
    } else {
        requested_index.to_string()
    };
    output_directory.join(format!("{}.gif", stem))
}

/// Light on the camera, one revolution around the view's vertical axis, every frame to GIF
pub fn batch_behaviours(view: &ViewSettings, path: PathBuf, frame_duration_ms: u32) -> Vec<Behaviour> {
    let camera = view.camera_position;
    let circle = Circle::new(
        camera.scaled(&view.up_vector.normalized()),
        camera,
        view.up_vector,
        1.0 / TRAJECTORY_FRAMES as f32,
    );
    vec![
        Behaviour::LightToCamera,
        Behaviour::CameraTrajectory(circle),
        Behaviour::SaveGif {
            path,
            every_n: 1,
            duration_ms: frame_duration_ms,
        },
    ]
}

pub fn interactive_behaviours(snapshot_directory: &Path) -> Vec<Behaviour> {
    vec![
        Behaviour::LightToCamera,
        Behaviour::SnapshotOnKey {
            directory: snapshot_directory.to_path_buf(),
        },
    ]
}

/// Hand the scene to `sink` in the planned mode.
///
/// Returns the GIF path in batch mode.
pub fn run_output(
    sink: &mut dyn RenderSink,
    scene: &[Renderable],
    plan: &OutputPlan,
    view: &ViewSettings,
) -> Result<Option<PathBuf>> {
    match plan.mode {
        OutputMode::Interactive => {
            let behaviours = interactive_behaviours(&plan.output_directory);
            sink.show(scene, &behaviours, view)?;
            Ok(None)
        }
        OutputMode::Batch => {
            std::fs::create_dir_all(&plan.output_directory)?;
            let path = gif_path(&plan.output_directory, &plan.requested_index, plan.flat_palette);
            let behaviours = batch_behaviours(view, path.clone(), plan.frame_duration_ms);
            sink.render(scene, &behaviours, TRAJECTORY_FRAMES, view)?;
            println!("[render] Saved scene to {}", path.display());
            Ok(Some(path))
        }
    }
}
