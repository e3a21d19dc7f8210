//! Uploads a renderable list and draws it

use crate::camera::Camera;
use crate::pipeline::{CameraUniforms, ObjectUniforms, RenderPipeline};
use crate::renderable::Renderable;
use crate::texture::TextureCache;
use roomcast_core::{Color, Vec3};
use std::collections::HashMap;
use std::sync::Arc;
use wgpu::util::DeviceExt;

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct DrawItem {
    mesh: usize,
    bind_group: wgpu::BindGroup,
    translucent: bool,
}

/// GPU state for one static scene.
///
/// Opaque renderables are drawn first, then translucent ones, each group in
/// list order.
pub struct SceneRenderer {
    pipeline: RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    textures: TextureCache,
    meshes: Vec<GpuMesh>,
    draws: Vec<DrawItem>,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        renderables: &[Renderable],
    ) -> Self {
        let pipeline = RenderPipeline::new(device, format);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Uniform Buffer"),
            contents: bytemuck::bytes_of(&CameraUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &pipeline.camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let mut renderer = Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            textures: TextureCache::new(device, queue),
            meshes: Vec::new(),
            draws: Vec::new(),
        };
        renderer.upload(device, queue, renderables);
        renderer
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, renderables: &[Renderable]) {
        let mut mesh_slots: HashMap<usize, usize> = HashMap::new();

        for renderable in renderables {
            if renderable.mesh.is_empty() {
                continue;
            }

            let key = Arc::as_ptr(&renderable.mesh) as usize;
            let mesh = *mesh_slots.entry(key).or_insert_with(|| {
                let mesh = &renderable.mesh;
                self.meshes.push(GpuMesh {
                    vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(&format!("{} Vertex Buffer", renderable.label)),
                        contents: bytemuck::cast_slice(&mesh.vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    }),
                    index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(&format!("{} Index Buffer", renderable.label)),
                        contents: bytemuck::cast_slice(&mesh.indices),
                        usage: wgpu::BufferUsages::INDEX,
                    }),
                    index_count: mesh.indices.len() as u32,
                });
                self.meshes.len() - 1
            });

            let uniforms = ObjectUniforms::new(&renderable.transform, renderable.color);
            let object_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Object Buffer", renderable.label)),
                contents: bytemuck::bytes_of(&uniforms),
                usage: wgpu::BufferUsages::UNIFORM,
            });

            let texture = self
                .textures
                .texture_for(device, queue, renderable.texture.as_ref());
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{} Bind Group", renderable.label)),
                layout: &self.pipeline.object_bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: object_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&texture.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&texture.sampler),
                    },
                ],
            });

            self.draws.push(DrawItem {
                mesh,
                bind_group,
                translucent: renderable.translucent,
            });
        }
    }

    pub fn draw_count(&self) -> usize {
        self.draws.len()
    }

    /// Write camera matrices and the light position for the next frame
    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &Camera, light_position: Vec3) {
        let uniforms = CameraUniforms::new(
            camera.view_projection_matrix(),
            camera.position,
            light_position,
        );
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        background: Color,
    ) {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Scene Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: background.r as f64,
                            g: background.g as f64,
                            b: background.b as f64,
                            a: background.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

            for (pipeline, translucent) in [(&self.pipeline.opaque, false), (&self.pipeline.translucent, true)] {
                render_pass.set_pipeline(pipeline);
                for draw in self.draws.iter().filter(|d| d.translucent == translucent) {
                    let mesh = &self.meshes[draw.mesh];
                    render_pass.set_bind_group(1, &draw.bind_group, &[]);
                    render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}
