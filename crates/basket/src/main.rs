//! Courtside: first-person basketball throwing on a small indoor court.
//!
//! Walk with WASD, look with the mouse, throw with the left button and call
//! the ball back with the right button.

use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window, WindowId};

mod ball;
mod config;
mod court;
mod game;
mod hud;
mod input;
mod scene;

use config::GameConfig;
use input::InputState;
use scene::Scene;

/// Max frame time to prevent spiral of death.
const MAX_FRAME_TIME: f64 = 0.05;

struct App {
    config: GameConfig,
    /// Created in `resumed`, once a window can exist.
    scene: Option<Scene>,
    input: InputState,
    /// Raw mouse motion is only taken while the window has focus.
    focused: bool,
    egui_ctx: egui::Context,
    last_frame: Instant,
    fps: f64,
    frame_count: u32,
    fps_timer: Instant,
    /// Fatal error that stopped the event loop.
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: GameConfig) -> Self {
        let now = Instant::now();
        Self {
            config,
            scene: None,
            input: InputState::new(),
            focused: true,
            egui_ctx: egui::Context::default(),
            last_frame: now,
            fps: 0.0,
            frame_count: 0,
            fps_timer: now,
            error: None,
        }
    }

    /// Stop the loop; `run` returns the error.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        self.error = Some(err);
        event_loop.exit();
    }

    fn create_scene(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<Scene> {
        let win = &self.config.window;
        let window = Arc::new(
            event_loop.create_window(
                Window::default_attributes()
                    .with_title(win.title.clone())
                    .with_inner_size(winit::dpi::LogicalSize::new(win.width, win.height)),
            )?,
        );
        grab_cursor(&window);
        Ok(Scene::new(window, &self.config, &self.egui_ctx)?)
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };

        // Timing
        let now = Instant::now();
        let raw_dt = now.duration_since(self.last_frame).as_secs_f64();
        let frame_dt = raw_dt.min(MAX_FRAME_TIME);
        self.last_frame = now;

        let input = self.input.frame();
        if let Some(event) = scene.game.update(&input, frame_dt as f32) {
            log::debug!("ball event: {event:?}");
        }

        if let Err(e) = scene.render(&self.egui_ctx, self.fps) {
            self.fail(event_loop, e.into());
            return;
        }

        // FPS
        self.frame_count += 1;
        let fps_elapsed = now.duration_since(self.fps_timer).as_secs_f64();
        if fps_elapsed >= 1.0 {
            self.fps = self.frame_count as f64 / fps_elapsed;
            self.frame_count = 0;
            self.fps_timer = now;
        }
    }
}

/// Keep the cursor inside the window and hidden so mouse look never runs out of screen.
fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
    if let Err(e) = grabbed {
        log::warn!("cursor grab unavailable: {e}");
    }
    window.set_cursor_visible(false);
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.scene.is_some() {
            return;
        }
        match self.create_scene(event_loop) {
            Ok(scene) => {
                self.last_frame = Instant::now();
                self.scene = Some(scene);
            }
            Err(e) => self.fail(event_loop, e.context("failed to set up the scene")),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(scene) = &self.scene {
            scene.window.request_redraw();
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if self.scene.is_some() && self.focused {
                self.input.on_mouse_motion(dx, dy);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        // Let egui handle events first
        if let Some(scene) = &mut self.scene {
            scene.on_window_event(&event);
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(scene) = &mut self.scene {
                    scene.resize(new_size);
                }
            }
            WindowEvent::Focused(focused) => {
                self.focused = focused;
                if focused {
                    if let Some(scene) = &mut self.scene {
                        scene.game.reset_look();
                        grab_cursor(&scene.window);
                    }
                } else {
                    self.input.release_all();
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.input.on_key(code, state);
                if self.input.quit_requested() {
                    log::info!("escape pressed, exiting");
                    event_loop.exit();
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.on_mouse_button(button, state);
            }
            WindowEvent::RedrawRequested => self.frame(event_loop),
            _ => {}
        }
    }
}

fn run() -> anyhow::Result<()> {
    let config_path = GameConfig::default_path();
    let config = GameConfig::from_file(&config_path);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    if let Some(scene) = &app.scene {
        let g = &scene.game;
        log::info!(
            "session over: {} throws, {} recalls, {} drops",
            g.throws,
            g.recalls,
            g.drops
        );
    }
    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("fatal: {e:#}");
        std::process::exit(1);
    }
}
