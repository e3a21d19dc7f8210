//! Render sinks: where an assembled scene goes

use crate::behaviour::{Behaviour, Behaviours};
use crate::gif_writer::GifWriter;
use crate::headless::HeadlessContext;
use crate::renderable::Renderable;
use crate::renderer::SceneRenderer;
use crate::view::ViewSettings;
use crate::window;
use roomcast_core::Result;

/// Consumes a renderable list with a behaviour set.
///
/// `show` runs an interactive loop until the user closes it; `render` runs
/// exactly `n_frames` frames without a display.
pub trait RenderSink {
    fn show(
        &mut self,
        scene: &[Renderable],
        behaviours: &[Behaviour],
        view: &ViewSettings,
    ) -> Result<()>;

    fn render(
        &mut self,
        scene: &[Renderable],
        behaviours: &[Behaviour],
        n_frames: usize,
        view: &ViewSettings,
    ) -> Result<()>;
}

/// The wgpu implementation: a winit window or a headless device
#[derive(Debug, Default)]
pub struct WgpuSink;

impl WgpuSink {
    pub fn new() -> Self {
        Self
    }
}

impl RenderSink for WgpuSink {
    fn show(
        &mut self,
        scene: &[Renderable],
        behaviours: &[Behaviour],
        view: &ViewSettings,
    ) -> Result<()> {
        window::run(scene, behaviours, view)
    }

    fn render(
        &mut self,
        scene: &[Renderable],
        behaviours: &[Behaviour],
        n_frames: usize,
        view: &ViewSettings,
    ) -> Result<()> {
        let behaviours = Behaviours(behaviours);
        let (width, height) = view.size;

        let context = pollster::block_on(HeadlessContext::new(width, height))?;
        let renderer = SceneRenderer::new(
            &context.device,
            &context.queue,
            context.target.format,
            scene,
        );
        println!(
            "[render] {} draws, {} frames at {}x{}",
            renderer.draw_count(),
            n_frames,
            width,
            height
        );

        let mut camera = view.camera();
        camera.aspect = context.aspect_ratio();
        let fixed_light = view.camera_position;

        let mut gif = match behaviours.gif() {
            Some((path, every_n, duration_ms)) => {
                Some((GifWriter::create(path, view.size, duration_ms)?, every_n))
            }
            None => None,
        };

        for frame in 0..n_frames {
            if let Some(circle) = behaviours.trajectory() {
                camera.set_position(circle.position(frame));
            }
            let light = if behaviours.light_to_camera() {
                camera.position
            } else {
                fixed_light
            };

            renderer.update_camera(&context.queue, &camera, light);
            renderer.render(
                &context.device,
                &context.queue,
                &context.target.color_view,
                &context.target.depth_view,
                view.background,
            );

            if let Some((writer, every_n)) = gif.as_mut() {
                if frame % *every_n == 0 {
                    writer.add_frame(context.read_pixels()?)?;
                }
            }
        }

        if let Some((writer, _)) = gif {
            let frames = writer.finish()?;
            println!("[render] Encoded {} GIF frames", frames);
        }

        Ok(())
    }
}
