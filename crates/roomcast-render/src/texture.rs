//! GPU texture cache keyed by shared image identity

use image::RgbaImage;
use std::collections::HashMap;
use std::sync::Arc;
use wgpu::util::DeviceExt;

/// A GPU-resident texture with its view and sampler
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Uploaded textures plus a 1x1 white fallback for untextured draws.
///
/// Renderables sharing one `Arc<RgbaImage>` share one GPU texture.
pub struct TextureCache {
    textures: HashMap<usize, GpuTexture>,
    pub default_white: GpuTexture,
}

impl TextureCache {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let white = RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
        Self {
            textures: HashMap::new(),
            default_white: Self::create(device, queue, &white, "Default White"),
        }
    }

    /// Texture for a renderable, uploading it on first use
    pub fn texture_for(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: Option<&Arc<RgbaImage>>,
    ) -> &GpuTexture {
        let Some(image) = image else {
            return &self.default_white;
        };
        let key = Arc::as_ptr(image) as usize;
        self.textures
            .entry(key)
            .or_insert_with(|| Self::create(device, queue, image, "Renderable Texture"))
    }

    fn create(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &RgbaImage,
        label: &str,
    ) -> GpuTexture {
        let (width, height) = image.dimensions();
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            image.as_raw(),
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            ..Default::default()
        });

        GpuTexture {
            texture,
            view,
            sampler,
        }
    }
}
