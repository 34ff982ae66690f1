//! GPU-side scene: everything created once the window exists.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use courtside_render::context::RenderContext;
use courtside_render::pipelines::line::{push_fading_strip, LinePipeline, LineVertex};
use courtside_render::pipelines::scene::{LightUniform, Material, MaterialUniform, ScenePipeline};
use courtside_render::shapes::generate_sphere;
use courtside_render::{CameraUniform, GpuMesh, RenderError, Texture};

use crate::ball::BALL_RADIUS;
use crate::config::GameConfig;
use crate::court::{self, Surface};
use crate::game::GameState;
use crate::hud;

const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;
const TRAIL_COLOR: [f32; 4] = [1.0, 0.6, 0.15, 0.9];

/// One static mesh with its material bind group.
struct StaticObject {
    mesh: GpuMesh,
    material: Material,
}

/// Textures keyed by court surface.
struct SurfaceTextures {
    floor: Texture,
    wall: Texture,
    backdrop: Texture,
    home: Texture,
    away: Texture,
    ring: Texture,
    pole: Texture,
    bench: Texture,
}

impl SurfaceTextures {
    fn load(ctx: &RenderContext, config: &GameConfig) -> Self {
        let (device, queue) = (&ctx.device, &ctx.queue);
        let assets = &config.assets;
        Self {
            floor: Texture::load_or_solid(device, queue, &assets.path(&assets.floor), [176, 122, 72, 255]),
            wall: Texture::solid(device, queue, [52, 60, 78, 255]),
            backdrop: Texture::load_or_solid(device, queue, &assets.path(&assets.background), [18, 20, 30, 255]),
            home: Texture::load_or_solid(device, queue, &assets.path(&assets.home), [200, 48, 40, 255]),
            away: Texture::load_or_solid(device, queue, &assets.path(&assets.away), [40, 72, 200, 255]),
            ring: Texture::solid(device, queue, [235, 96, 24, 255]),
            pole: Texture::solid(device, queue, [70, 72, 78, 255]),
            bench: Texture::solid(device, queue, [110, 70, 40, 255]),
        }
    }

    fn get(&self, surface: Surface) -> &Texture {
        match surface {
            Surface::Floor => &self.floor,
            Surface::Wall => &self.wall,
            Surface::Backdrop => &self.backdrop,
            Surface::HomeBoard => &self.home,
            Surface::AwayBoard => &self.away,
            Surface::Ring => &self.ring,
            Surface::Pole => &self.pole,
            Surface::Bench => &self.bench,
        }
    }
}

fn material_for(surface: Surface) -> MaterialUniform {
    match surface {
        Surface::Backdrop => MaterialUniform::unlit(),
        Surface::Ring | Surface::Pole => MaterialUniform::glossy([1.0; 4]),
        _ => MaterialUniform::lit([1.0; 4]),
    }
}

/// Window, GPU resources, egui and the game they display.
pub struct Scene {
    pub window: Arc<Window>,
    pub ctx: RenderContext,
    pub game: GameState,
    pipeline: ScenePipeline,
    lines: LinePipeline,
    objects: Vec<StaticObject>,
    ball_mesh: GpuMesh,
    ball_material: Material,
    markings: Vec<LineVertex>,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    // kept alive for the ball bind group
    _ball_texture: Texture,
}

impl Scene {
    pub fn new(
        window: Arc<Window>,
        config: &GameConfig,
        egui_ctx: &egui::Context,
    ) -> Result<Self, RenderError> {
        let ctx = pollster::block_on(RenderContext::new(window.clone()))?;
        let pipeline = ScenePipeline::new(&ctx);
        pipeline.update_light(&ctx.queue, &LightUniform::default());
        let lines = LinePipeline::new(&ctx, &pipeline.camera_buffer);

        let game = GameState::new(config);
        let textures = SurfaceTextures::load(&ctx, config);

        let objects: Vec<StaticObject> = court::court_pieces(config.court.half_extent)
            .into_iter()
            .map(|piece| {
                let (vertices, indices) = &piece.mesh;
                let mesh = GpuMesh::upload(&ctx.device, piece.name, vertices, indices);
                let material = pipeline.create_material(
                    &ctx.device,
                    piece.name,
                    material_for(piece.surface).with_model(piece.model),
                    textures.get(piece.surface),
                );
                StaticObject { mesh, material }
            })
            .collect();

        let (ball_v, ball_i) = generate_sphere(BALL_RADIUS, 16, 24);
        let ball_mesh = GpuMesh::upload(&ctx.device, "Ball", &ball_v, &ball_i);
        let ball_texture = Texture::solid(&ctx.device, &ctx.queue, [214, 92, 28, 255]);
        let ball_material = pipeline.create_material(
            &ctx.device,
            "Ball",
            MaterialUniform::glossy([1.0; 4]).with_model(Mat4::from_translation(game.ball_position())),
            &ball_texture,
        );

        let markings = court::marking_lines(&game.bounds);

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &*window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.format(), None, 1, false);

        log::info!(
            "scene ready: {} static objects, {} marking segments",
            objects.len(),
            markings.len() / 2
        );

        Ok(Self {
            window,
            ctx,
            game,
            pipeline,
            lines,
            objects,
            ball_mesh,
            ball_material,
            markings,
            egui_state,
            egui_renderer,
            _ball_texture: ball_texture,
        })
    }

    /// Forward a window event to egui.
    pub fn on_window_event(&mut self, event: &winit::event::WindowEvent) {
        let _ = self.egui_state.on_window_event(&self.window, event);
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.ctx.resize(size);
    }

    /// Draw one frame. Lost/outdated surfaces are reconfigured and the frame
    /// skipped; only out-of-memory is returned as an error.
    pub fn render(&mut self, egui_ctx: &egui::Context, fps: f64) -> Result<(), RenderError> {
        let output = match self.ctx.surface.get_current_texture() {
            Ok(o) => o,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated, reconfiguring");
                self.ctx.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory));
            }
            Err(e) => {
                log::warn!("skipping frame: {e}");
                return Ok(());
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let ctx = &self.ctx;

        // Per-frame uniforms
        let cam_uniform = CameraUniform::from_camera(&self.game.camera, ctx.aspect());
        self.pipeline.update_camera(&ctx.queue, &cam_uniform);
        self.ball_material
            .set_model(&ctx.queue, Mat4::from_translation(self.game.ball_position()));

        // Markings + trail share one line buffer
        let mut line_verts = self.markings.clone();
        let trail: Vec<Vec3> = self.game.trail.iter().copied().collect();
        push_fading_strip(&mut line_verts, &trail, TRAIL_COLOR);
        self.lines.upload(&ctx.queue, &line_verts);

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        // Pass 1: court, ball, lines
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            self.pipeline.bind(&mut pass);
            for obj in &self.objects {
                self.pipeline.draw(&mut pass, &obj.mesh, &obj.material);
            }
            self.pipeline
                .draw(&mut pass, &self.ball_mesh, &self.ball_material);

            self.lines.draw(&mut pass);
        }

        // Pass 2: egui overlay
        let egui_input = self.egui_state.take_egui_input(&self.window);
        egui_ctx.begin_pass(egui_input);

        hud::draw_hud(egui_ctx, &self.game, fps);

        let egui_output = egui_ctx.end_pass();
        let egui_prims = egui_ctx.tessellate(egui_output.shapes, egui_output.pixels_per_point);
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [ctx.config.width, ctx.config.height],
            pixels_per_point: egui_output.pixels_per_point,
        };
        for (id, delta) in &egui_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&ctx.device, &ctx.queue, *id, delta);
        }
        let egui_cmd_bufs = self.egui_renderer.update_buffers(
            &ctx.device,
            &ctx.queue,
            &mut encoder,
            &egui_prims,
            &screen,
        );
        {
            let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
            let mut pass = pass.forget_lifetime();
            self.egui_renderer.render(&mut pass, &egui_prims, &screen);
        }
        for id in &egui_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        self.egui_state
            .handle_platform_output(&self.window, egui_output.platform_output);

        let mut cmd_bufs: Vec<wgpu::CommandBuffer> = egui_cmd_bufs;
        cmd_bufs.push(encoder.finish());
        ctx.queue.submit(cmd_bufs);
        output.present();
        Ok(())
    }
}
