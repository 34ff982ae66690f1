//! 3D line rendering pipeline for court markings and the ball trail.

use glam::Vec3;

use crate::context::{RenderContext, DEPTH_FORMAT};

/// Vertex for colored 3D lines.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    pub fn new(position: Vec3, color: [f32; 4]) -> Self {
        Self {
            position: position.to_array(),
            color,
        }
    }
}

/// Maximum number of line vertices (8K segments).
const MAX_VERTICES: usize = 16 * 1024;

/// Append one segment.
pub fn push_segment(out: &mut Vec<LineVertex>, a: Vec3, b: Vec3, color: [f32; 4]) {
    out.push(LineVertex::new(a, color));
    out.push(LineVertex::new(b, color));
}

/// Append a closed polyline through `points`.
pub fn push_loop(out: &mut Vec<LineVertex>, points: &[Vec3], color: [f32; 4]) {
    for (i, &p) in points.iter().enumerate() {
        push_segment(out, p, points[(i + 1) % points.len()], color);
    }
}

/// Append an arc in the horizontal plane at `center.y`, from `start` to `end` radians.
/// Angle 0 points along +X, positive angles turn toward +Z.
pub fn push_arc(
    out: &mut Vec<LineVertex>,
    center: Vec3,
    radius: f32,
    start: f32,
    end: f32,
    segments: u32,
    color: [f32; 4],
) {
    let segments = segments.max(1);
    let point = |t: f32| {
        let a = start + (end - start) * t;
        center + Vec3::new(a.cos() * radius, 0.0, a.sin() * radius)
    };
    for i in 0..segments {
        let t0 = i as f32 / segments as f32;
        let t1 = (i + 1) as f32 / segments as f32;
        push_segment(out, point(t0), point(t1), color);
    }
}

/// Append an open strip through `points` whose alpha ramps from 0 (oldest) to `color[3]`.
pub fn push_fading_strip(out: &mut Vec<LineVertex>, points: &[Vec3], color: [f32; 4]) {
    if points.len() < 2 {
        return;
    }
    let last = (points.len() - 1) as f32;
    for (i, pair) in points.windows(2).enumerate() {
        let fade = |k: usize| {
            let mut c = color;
            c[3] *= k as f32 / last;
            c
        };
        out.push(LineVertex::new(pair[0], fade(i)));
        out.push(LineVertex::new(pair[1], fade(i + 1)));
    }
}

/// 3D line rendering pipeline.
pub struct LinePipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub num_vertices: u32,
}

impl LinePipeline {
    /// Create the line pipeline. Shares the camera buffer from the scene pipeline.
    pub fn new(ctx: &RenderContext, camera_buffer: &wgpu::Buffer) -> Self {
        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Line Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/line.wgsl").into()),
        });

        let bind_group_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Line Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Line Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Line Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Line Vertex Buffer"),
            size: (MAX_VERTICES * std::mem::size_of::<LineVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Line Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<LineVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x3,
                        },
                        wgpu::VertexAttribute {
                            offset: 12,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x4,
                        },
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.format(),
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false, // lines overlay the surfaces they sit on
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            vertex_buffer,
            bind_group,
            num_vertices: 0,
        }
    }

    /// Upload line vertices to the GPU. Returns the number of vertices uploaded.
    pub fn upload(&mut self, queue: &wgpu::Queue, vertices: &[LineVertex]) -> u32 {
        let count = vertices.len().min(MAX_VERTICES);
        if count < vertices.len() {
            log::debug!("line buffer full: dropping {} vertices", vertices.len() - count);
        }
        if count > 0 {
            queue.write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(&vertices[..count]),
            );
        }
        self.num_vertices = count as u32;
        self.num_vertices
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.num_vertices == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..self.num_vertices, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_loop_closes() {
        let mut out = Vec::new();
        let pts = [Vec3::ZERO, Vec3::X, Vec3::new(1.0, 0.0, 1.0), Vec3::Z];
        push_loop(&mut out, &pts, WHITE);
        assert_eq!(out.len(), 8);
        assert_eq!(out[7].position, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_arc_stays_on_radius() {
        let mut out = Vec::new();
        let c = Vec3::new(0.0, -0.49, 0.0);
        push_arc(&mut out, c, 1.2, 0.0, std::f32::consts::TAU, 24, WHITE);
        assert_eq!(out.len(), 48);
        for v in &out {
            let p = Vec3::from(v.position);
            assert!(((p - c).length() - 1.2).abs() < 1e-5);
            assert_eq!(p.y, -0.49);
        }
    }

    #[test]
    fn test_fading_strip_alpha_ramp() {
        let mut out = Vec::new();
        let pts: Vec<Vec3> = (0..5).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        push_fading_strip(&mut out, &pts, [1.0, 0.5, 0.0, 0.8]);
        assert_eq!(out.len(), 8);
        assert_eq!(out[0].color[3], 0.0);
        assert!((out[7].color[3] - 0.8).abs() < 1e-6);
        for pair in out.windows(2) {
            assert!(pair[1].color[3] >= pair[0].color[3]);
        }
    }

    #[test]
    fn test_fading_strip_needs_two_points() {
        let mut out = Vec::new();
        push_fading_strip(&mut out, &[Vec3::ONE], WHITE);
        assert!(out.is_empty());
    }
}
