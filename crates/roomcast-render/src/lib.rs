//! Roomcast Render - wgpu backend for assembled scenes
//!
//! Scene assembly produces an ordered list of [`Renderable`]s and a set of
//! [`Behaviour`]s. A [`RenderSink`] consumes them either as an interactive
//! window or as a fixed-frame batch written to an animated GIF.

mod behaviour;
mod camera;
mod context;
mod gif_writer;
mod headless;
mod pipeline;
mod primitives;
mod renderable;
mod renderer;
mod sink;
mod texture;
mod trajectory;
mod view;
mod window;

pub use behaviour::Behaviour;
pub use camera::Camera;
pub use context::{RenderContext, RenderError};
pub use gif_writer::GifWriter;
pub use headless::{HeadlessContext, OffscreenTarget};
pub use pipeline::{CameraUniforms, ObjectUniforms, RenderPipeline};
pub use primitives::{Mesh, Vertex};
pub use renderable::Renderable;
pub use renderer::SceneRenderer;
pub use sink::{RenderSink, WgpuSink};
pub use trajectory::Circle;
pub use view::ViewSettings;

#[cfg(test)]
mod tests {
    #[test]
    fn shader_wgsl_parses() {
        let source = include_str!("shader.wgsl");
        naga::front::wgsl::parse_str(source).expect("shader.wgsl failed to parse");
    }
}
