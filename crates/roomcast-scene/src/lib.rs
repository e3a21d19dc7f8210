//! Roomcast Scene - From a selected layout to pixels and meshes
//!
//! Policies are resolved once from the run's flags, the assembler turns a
//! scene record and predicted layout into an ordered renderable list, and
//! the output stage hands that list to a render sink and optionally
//! exports the ground-truth scene as meshes.

mod assemble;
mod export;
mod floor;
mod models;
mod output;
mod palette;
mod policy;
mod textures;

pub use assemble::{OverlayFlags, SceneAssembler, OVERLAY_COLOR};
pub use export::export_scene;
pub use floor::{extra_mesh, floor_mesh, FLOOR_TILE_SIZE};
pub use models::{LoadedModel, ModelCache};
pub use output::{
    batch_behaviours, gif_path, interactive_behaviours, run_output, OutputMode, OutputPlan,
    DEFAULT_FRAME_DURATION_MS, TRAJECTORY_FRAMES,
};
pub use palette::{hls_palette, hls_to_rgb};
pub use policy::{
    resolve_color_policy, resolve_floor_policy, ColorPolicy, FloorPolicy, PolicyInputs,
};
pub use textures::texture_candidates;
