//! Sampled 2D textures loaded from image files.

use std::path::Path;

use wgpu::util::DeviceExt;

use crate::error::{RenderError, Result};

/// A sampled RGBA texture with its own repeat sampler.
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Decode a PNG/JPEG file into an sRGB texture.
    pub fn load(device: &wgpu::Device, queue: &wgpu::Queue, path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = image::load_from_memory(&bytes)
            .map_err(|source| RenderError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("loaded texture {} ({width}x{height})", path.display());

        let label = path.file_name().and_then(|n| n.to_str()).unwrap_or("texture");
        Ok(Self::from_rgba(device, queue, label, width, height, &rgba))
    }

    /// 1×1 texture of a single color.
    pub fn solid(device: &wgpu::Device, queue: &wgpu::Queue, color: [u8; 4]) -> Self {
        Self::from_rgba(device, queue, "Solid Texture", 1, 1, &color)
    }

    /// Load `path`, or fall back to a solid color when it is missing or undecodable.
    pub fn load_or_solid(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
        fallback: [u8; 4],
    ) -> Self {
        match Self::load(device, queue, path) {
            Ok(texture) => texture,
            Err(e) => {
                log::warn!("{e}; using solid color {fallback:?}");
                Self::solid(device, queue, fallback)
            }
        }
    }

    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Self {
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
            rgba,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            width,
            height,
        }
    }
}
