//! Interactive window loop

use crate::behaviour::{Behaviour, Behaviours};
use crate::camera::Camera;
use crate::context::RenderContext;
use crate::headless::OffscreenTarget;
use crate::renderable::Renderable;
use crate::renderer::SceneRenderer;
use crate::view::ViewSettings;
use roomcast_core::{Result, RoomcastError};
use std::path::PathBuf;
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Open a window and run until it is closed
pub(crate) fn run(scene: &[Renderable], behaviours: &[Behaviour], view: &ViewSettings) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|e| RoomcastError::DisplayUnavailable(e.to_string()))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(scene, behaviours, view);
    event_loop
        .run_app(&mut app)
        .map_err(|e| RoomcastError::DisplayUnavailable(e.to_string()))?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct ViewerApp<'a> {
    scene: &'a [Renderable],
    view: &'a ViewSettings,
    light_to_camera: bool,
    snapshot_directory: Option<PathBuf>,
    snapshot_count: usize,

    window: Option<Arc<Window>>,
    render_context: Option<RenderContext>,
    renderer: Option<SceneRenderer>,
    camera: Camera,
    error: Option<RoomcastError>,

    // Input state
    mouse_pressed: bool,
    right_mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
}

impl<'a> ViewerApp<'a> {
    fn new(scene: &'a [Renderable], behaviours: &'a [Behaviour], view: &'a ViewSettings) -> Self {
        let behaviours = Behaviours(behaviours);
        Self {
            scene,
            view,
            light_to_camera: behaviours.light_to_camera(),
            snapshot_directory: behaviours.snapshot_directory().map(|p| p.to_path_buf()),
            snapshot_count: 0,
            window: None,
            render_context: None,
            renderer: None,
            camera: view.camera(),
            error: None,
            mouse_pressed: false,
            right_mouse_pressed: false,
            last_mouse_pos: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: RoomcastError) {
        eprintln!("[render] {}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) {
        let (width, height) = self.view.size;
        let window_attrs = Window::default_attributes()
            .with_title("roomcast")
            .with_inner_size(PhysicalSize::new(width, height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, RoomcastError::DisplayUnavailable(e.to_string())),
        };
        self.window = Some(window.clone());

        let render_context = match pollster::block_on(RenderContext::new(window)) {
            Ok(context) => context,
            Err(e) => return self.fail(event_loop, e.into()),
        };

        self.camera.aspect = render_context.aspect_ratio();
        let renderer = SceneRenderer::new(
            &render_context.device,
            &render_context.queue,
            render_context.format(),
            self.scene,
        );
        println!("[render] Window open with {} draws", renderer.draw_count());

        self.render_context = Some(render_context);
        self.renderer = Some(renderer);
    }

    fn light_position(&self) -> roomcast_core::Vec3 {
        if self.light_to_camera {
            self.camera.position
        } else {
            self.view.camera_position
        }
    }

    fn render(&mut self) {
        let light = self.light_position();
        let Some(context) = &mut self.render_context else { return };
        let Some(renderer) = &self.renderer else { return };

        let output = match context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = context.size;
                context.resize(size);
                return;
            }
            Err(e) => {
                eprintln!("[render] Surface error: {:?}", e);
                return;
            }
        };

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        renderer.update_camera(&context.queue, &self.camera, light);
        renderer.render(
            &context.device,
            &context.queue,
            &view,
            &context.depth_view,
            self.view.background,
        );
        output.present();
    }

    /// Render the current view offscreen and save it as the next numbered PNG
    fn save_snapshot(&mut self) {
        let light = self.light_position();
        let (Some(context), Some(renderer), Some(directory)) = (
            &self.render_context,
            &self.renderer,
            &self.snapshot_directory,
        ) else {
            return;
        };

        let target = OffscreenTarget::new(
            &context.device,
            context.config.width,
            context.config.height,
            context.format(),
        );
        renderer.update_camera(&context.queue, &self.camera, light);
        renderer.render(
            &context.device,
            &context.queue,
            &target.color_view,
            &target.depth_view,
            self.view.background,
        );

        let image = match target.read_pixels(&context.device, &context.queue) {
            Ok(image) => image,
            Err(e) => {
                eprintln!("[render] Snapshot failed: {}", e);
                return;
            }
        };

        let path = directory.join(format!("snapshot_{:03}.png", self.snapshot_count));
        let saved = std::fs::create_dir_all(directory)
            .map_err(|e| e.to_string())
            .and_then(|_| image.save(&path).map_err(|e| e.to_string()));
        match saved {
            Ok(()) => {
                println!("[render] Saved snapshot {}", path.display());
                self.snapshot_count += 1;
            }
            Err(e) => eprintln!("[render] Failed to save {}: {}", path.display(), e),
        }
    }
}

impl ApplicationHandler for ViewerApp<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            self.initialize(event_loop);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(context) = &mut self.render_context {
                    context.resize(new_size);
                    self.camera.aspect = context.aspect_ratio();
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    match event.physical_key {
                        PhysicalKey::Code(KeyCode::Escape) => {
                            event_loop.exit();
                        }
                        PhysicalKey::Code(KeyCode::KeyS) => {
                            self.save_snapshot();
                        }
                        PhysicalKey::Code(KeyCode::Space) => {
                            // Back to the starting view
                            let aspect = self.camera.aspect;
                            self.camera = self.view.camera();
                            self.camera.aspect = aspect;
                        }
                        _ => {}
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => match button {
                MouseButton::Left => {
                    self.mouse_pressed = state == ElementState::Pressed;
                }
                MouseButton::Right => {
                    self.right_mouse_pressed = state == ElementState::Pressed;
                }
                _ => {}
            },

            WindowEvent::CursorMoved { position, .. } => {
                if let Some((last_x, last_y)) = self.last_mouse_pos {
                    let dx = (position.x - last_x) as f32;
                    let dy = (position.y - last_y) as f32;

                    if self.mouse_pressed {
                        self.camera.orbit_horizontal(-dx * 0.01);
                        self.camera.orbit_vertical(dy * 0.01);
                    }
                    if self.right_mouse_pressed {
                        self.camera.pan(-dx * 0.01, dy * 0.01);
                    }
                }
                self.last_mouse_pos = Some((position.x, position.y));
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y * 0.5,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.camera.zoom(scroll);
            }

            WindowEvent::RedrawRequested => {
                self.render();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
