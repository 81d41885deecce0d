//! Click-to-spawn Gravity Sandbox
//!
//! Every left click drops a body at rest where the cursor ray meets the
//! z = 0 plane. All bodies attract each other under softened gravity.
//!
//! Controls:
//! - Left click: Spawn a body
//! - Right mouse drag: Orbit camera
//! - Scroll: Zoom in/out
//! - Space: Pause/resume
//! - N: Single step while paused
//! - G: Toggle grid
//! - R: Clear all bodies and reset the view

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use common::{Camera3D, GraphicsContext};
use glam::Vec2;
use gravity_sandbox::{
    config::SpawnConfig,
    driver::{FrameStep, SpawnScene},
    equations_ui::{
        draw_equations_sidebar, draw_status_bar, EguiOverlay, Status, GRAVITY_VARIABLES,
        SOFTENED_GRAVITY_EQUATIONS, SPAWN_EQUATIONS,
    },
    renderer_3d::Renderer3D,
    SimConfig,
};
use winit::{
    event::{ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

#[derive(Parser, Debug)]
#[command(about = "Click to spawn bodies that attract each other")]
struct Args {
    /// YAML config file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

struct App {
    ctx: GraphicsContext,
    renderer: Renderer3D,
    scene: SpawnScene,
    camera: Camera3D,
    config: SpawnConfig,
    paused: bool,
    show_grid: bool,
    cursor: Vec2,
    orbiting: bool,
    last_mouse_pos: Option<Vec2>,
    egui: EguiOverlay,
}

impl App {
    fn new(ctx: GraphicsContext, config: SpawnConfig) -> Self {
        let camera = Self::initial_camera(&config, ctx.aspect_ratio());
        let renderer = Renderer3D::new(&ctx, &camera, config.max_bodies, 0);
        let scene = SpawnScene::new(&config);
        let egui = EguiOverlay::new(&ctx);

        Self {
            ctx,
            renderer,
            scene,
            camera,
            config,
            paused: false,
            show_grid: true,
            cursor: Vec2::ZERO,
            orbiting: false,
            last_mouse_pos: None,
            egui,
        }
    }

    fn initial_camera(config: &SpawnConfig, aspect_ratio: f32) -> Camera3D {
        Camera3D::facing_xy_plane(aspect_ratio, config.camera_distance, config.camera_fov_degrees)
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if !self.ctx.resize(new_size) {
            return;
        }
        self.camera.update_aspect_ratio(self.ctx.aspect_ratio());
        self.renderer
            .resize(&self.ctx.device, self.ctx.size.width, self.ctx.size.height);
    }

    fn update(&mut self) {
        if !self.paused {
            self.scene.tick();
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.update_camera(&self.ctx.queue, &self.camera);
        self.renderer
            .update_bodies(&self.ctx.queue, self.scene.bodies());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer
            .render(&mut encoder, &view, self.show_grid, false);

        let status = Status {
            scene: "Click to Spawn",
            bodies: self.scene.sim.bodies.len(),
            steps: self.scene.steps(),
            elapsed_time: self.scene.sim.elapsed_time,
            energy: self.scene.sim.total_energy(),
            paused: self.paused,
            hint: "Left click: spawn  |  R: clear",
        };
        self.egui.draw(&self.ctx, &mut encoder, &view, |ctx| {
            draw_equations_sidebar(
                ctx,
                "Softened N-Body Gravity",
                &[SOFTENED_GRAVITY_EQUATIONS, SPAWN_EQUATIONS],
                GRAVITY_VARIABLES,
            );
            draw_status_bar(ctx, &status);
        });

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        if state != ElementState::Pressed {
            return;
        }

        match key {
            KeyCode::Space => self.paused = !self.paused,
            KeyCode::KeyN if self.paused => self.scene.tick(),
            KeyCode::KeyG => self.show_grid = !self.show_grid,
            KeyCode::KeyR => {
                self.scene.reset();
                self.camera = Self::initial_camera(&self.config, self.ctx.aspect_ratio());
            }
            _ => {}
        }
    }

    fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match (button, state) {
            (MouseButton::Left, ElementState::Pressed) => {
                // Failures are logged by the scene; a missed click spawns nothing
                let _ = self
                    .scene
                    .click(&self.camera, self.cursor, self.ctx.viewport());
            }
            (MouseButton::Right, _) => {
                self.orbiting = state == ElementState::Pressed;
                if !self.orbiting {
                    self.last_mouse_pos = None;
                }
            }
            _ => {}
        }
    }

    fn handle_mouse_move(&mut self, x: f64, y: f64) {
        self.cursor = Vec2::new(x as f32, y as f32);

        if self.orbiting {
            if let Some(last) = self.last_mouse_pos {
                let delta = (self.cursor - last) * 0.01;
                self.camera.orbit(delta.x, delta.y);
            }
            self.last_mouse_pos = Some(self.cursor);
        }
    }

    fn handle_scroll(&mut self, delta: f32) {
        self.camera.zoom(delta * 3.0);
    }
}

fn main() -> anyhow::Result<()> {
    common::init_logging();

    let args = Args::parse();
    let config = SimConfig::load_or_default(args.config.as_deref())
        .context("failed to load configuration")?;

    let (ctx, event_loop) = pollster::block_on(GraphicsContext::new(
        "Gravity Sandbox - Click to Spawn",
        1280,
        720,
    ))?;

    let mut app = App::new(ctx, config.spawn);
    log::info!(
        "Spawn sandbox ready (G = {}, m = {}, dt = {})",
        app.scene.params().g,
        app.scene.params().mass,
        app.scene.params().dt
    );

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, .. } => {
                let consumed = app.egui.on_window_event(&app.ctx.window, event);

                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::Resized(size) => app.resize(*size),
                    WindowEvent::RedrawRequested => {
                        app.update();
                        match app.render() {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost) => app.resize(app.ctx.size),
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("Out of GPU memory, exiting");
                                elwt.exit()
                            }
                            Err(e) => log::warn!("Render error: {:?}", e),
                        }
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        app.handle_mouse_move(position.x, position.y);
                    }
                    _ if consumed => {}
                    WindowEvent::MouseInput { state, button, .. } => {
                        app.handle_mouse_button(*button, *state);
                    }
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(key),
                                state,
                                ..
                            },
                        ..
                    } => app.handle_key(*key, *state),
                    WindowEvent::MouseWheel { delta, .. } => {
                        let scroll = match delta {
                            MouseScrollDelta::LineDelta(_, y) => *y,
                            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                        };
                        app.handle_scroll(scroll);
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                app.ctx.window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
