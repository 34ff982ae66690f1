//! Textured, lit mesh pipeline for the court scene.

use crate::camera::CameraUniform;
use crate::context::{RenderContext, DEPTH_FORMAT};
use crate::mesh::{vertex_buffer_layout, GpuMesh};
use crate::texture::Texture;

/// Light uniform data.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    /// Directional light direction (world space, normalized, pointing toward the light).
    pub direction: [f32; 4],
    /// Directional light color and intensity.
    pub color: [f32; 4],
    /// Ambient light color and intensity.
    pub ambient: [f32; 4],
}

impl Default for LightUniform {
    fn default() -> Self {
        let d = glam::Vec3::new(0.3, 1.0, 0.4).normalize();
        Self {
            direction: [d.x, d.y, d.z, 0.0],
            color: [1.0, 0.97, 0.92, 0.85],
            ambient: [0.9, 0.92, 1.0, 0.35],
        }
    }
}

const IDENTITY_MAT4: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Per-object material (must match MaterialUniform in scene.wgsl).
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    /// Tint multiplied with the texture sample (RGB) + alpha.
    pub base_color: [f32; 4],
    /// x: unlit flag (> 0.5 skips lighting), y: specular strength, z/w unused.
    pub params: [f32; 4],
    /// Model matrix (object → world).
    pub model: [[f32; 4]; 4],
}

impl MaterialUniform {
    /// Plain textured surface lit by the scene light.
    pub fn lit(base_color: [f32; 4]) -> Self {
        Self {
            base_color,
            params: [0.0, 0.2, 0.0, 0.0],
            model: IDENTITY_MAT4,
        }
    }

    /// Shiny surface (ring metal, ball leather).
    pub fn glossy(base_color: [f32; 4]) -> Self {
        Self {
            base_color,
            params: [0.0, 0.8, 0.0, 0.0],
            model: IDENTITY_MAT4,
        }
    }

    /// Texture shown as-is (backdrop).
    pub fn unlit() -> Self {
        Self {
            base_color: [1.0; 4],
            params: [1.0, 0.0, 0.0, 0.0],
            model: IDENTITY_MAT4,
        }
    }

    /// Set model matrix, returning modified copy.
    pub fn with_model(mut self, model: glam::Mat4) -> Self {
        self.model = model.to_cols_array_2d();
        self
    }
}

/// A material's uniform buffer and its bind group (group 1).
pub struct Material {
    pub uniform: MaterialUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl Material {
    /// Move the object: rewrite the model matrix in place.
    pub fn set_model(&mut self, queue: &wgpu::Queue, model: glam::Mat4) {
        self.uniform.model = model.to_cols_array_2d();
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&self.uniform));
    }
}

/// Scene render pipeline and the shared per-frame uniforms.
pub struct ScenePipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub camera_buffer: wgpu::Buffer,
    pub light_buffer: wgpu::Buffer,
    pub frame_bind_group_layout: wgpu::BindGroupLayout,
    pub frame_bind_group: wgpu::BindGroup,
    pub material_bind_group_layout: wgpu::BindGroupLayout,
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl ScenePipeline {
    pub fn new(ctx: &RenderContext) -> Self {
        let shader = ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Scene Shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/scene.wgsl").into()),
            });

        let camera_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniform"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let light_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Light Uniform"),
            size: std::mem::size_of::<LightUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Group 0: per-frame (camera, light)
        let frame_bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("Scene Frame Bind Group Layout"),
                    entries: &[
                        uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT),
                        uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
                    ],
                });

        let frame_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Frame Bind Group"),
            layout: &frame_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: light_buffer.as_entire_binding(),
                },
            ],
        });

        // Group 1: per-object (material, texture, sampler)
        let material_bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("Scene Material Bind Group Layout"),
                    entries: &[
                        uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT),
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 2,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                    ],
                });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Scene Pipeline Layout"),
                bind_group_layouts: &[&frame_bind_group_layout, &material_bind_group_layout],
                push_constant_ranges: &[],
            });

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Scene Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[vertex_buffer_layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.format(),
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        Self {
            pipeline,
            camera_buffer,
            light_buffer,
            frame_bind_group_layout,
            frame_bind_group,
            material_bind_group_layout,
        }
    }

    /// Update camera uniform.
    pub fn update_camera(&self, queue: &wgpu::Queue, uniform: &CameraUniform) {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(uniform));
    }

    /// Update light uniform.
    pub fn update_light(&self, queue: &wgpu::Queue, uniform: &LightUniform) {
        queue.write_buffer(&self.light_buffer, 0, bytemuck::bytes_of(uniform));
    }

    /// Create a material bind group binding `uniform` and `texture`. Done once per object.
    pub fn create_material(
        &self,
        device: &wgpu::Device,
        label: &str,
        uniform: MaterialUniform,
        texture: &Texture,
    ) -> Material {
        use wgpu::util::DeviceExt;
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Material")),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} Material Bind Group")),
            layout: &self.material_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
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
        Material {
            uniform,
            buffer,
            bind_group,
        }
    }

    /// Set pipeline and per-frame bind group. Call once before drawing objects.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.frame_bind_group, &[]);
    }

    /// Draw one mesh with its material. `bind` must have been called on this pass.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, mesh: &GpuMesh, material: &Material) {
        pass.set_bind_group(1, &material.bind_group, &[]);
        mesh.draw(pass);
    }
}
