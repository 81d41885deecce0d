//! Three-Body Gravity Trails
//!
//! Three bodies with fixed starting velocities orbit each other under
//! softened gravity, each leaving a fading trail of its last positions.
//!
//! Controls:
//! - Right mouse drag: Orbit camera
//! - Scroll: Zoom in/out
//! - Space: Pause/resume
//! - N: Single step while paused
//! - T: Toggle trails
//! - G: Toggle grid
//! - R: Restart from the initial state

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use common::{Camera3D, GraphicsContext};
use glam::Vec2;
use gravity_sandbox::{
    config::ThreeBodyConfig,
    driver::{FrameStep, ThreeBodyScene},
    equations_ui::{
        draw_equations_sidebar, draw_status_bar, EguiOverlay, Status, GRAVITY_VARIABLES,
        SOFTENED_GRAVITY_EQUATIONS,
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
#[command(about = "Three bodies under softened gravity with fading trails")]
struct Args {
    /// YAML config file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

struct App {
    ctx: GraphicsContext,
    renderer: Renderer3D,
    scene: ThreeBodyScene,
    camera: Camera3D,
    camera_distance: f32,
    paused: bool,
    show_grid: bool,
    show_trails: bool,
    orbiting: bool,
    last_mouse_pos: Option<Vec2>,
    egui: EguiOverlay,
}

impl App {
    fn new(ctx: GraphicsContext, config: &ThreeBodyConfig) -> anyhow::Result<Self> {
        let scene = ThreeBodyScene::new(config)?;
        let camera = Self::initial_camera(config.camera_distance, ctx.aspect_ratio());
        let max_trail_vertices = scene.bodies.len() * config.trail_length;
        let renderer = Renderer3D::new(&ctx, &camera, scene.bodies.len(), max_trail_vertices);
        let egui = EguiOverlay::new(&ctx);

        Ok(Self {
            ctx,
            renderer,
            scene,
            camera,
            camera_distance: config.camera_distance,
            paused: false,
            show_grid: false,
            show_trails: true,
            orbiting: false,
            last_mouse_pos: None,
            egui,
        })
    }

    fn initial_camera(distance: f32, aspect_ratio: f32) -> Camera3D {
        let mut camera = Camera3D::facing_xy_plane(aspect_ratio, distance, 60.0);
        camera.pitch = 0.4;
        camera.update_orbital();
        camera
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
            .update_bodies(&self.ctx.queue, &self.scene.bodies);
        self.renderer
            .update_trails(&self.ctx.queue, &mut self.scene.trails, &self.scene.bodies);

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer
            .render(&mut encoder, &view, self.show_grid, self.show_trails);

        let status = Status {
            scene: "Three-Body Trails",
            bodies: self.scene.bodies.len(),
            steps: self.scene.steps(),
            elapsed_time: self.scene.elapsed_time(),
            energy: self.scene.total_energy(),
            paused: self.paused,
            hint: if self.show_trails { "Trails ON" } else { "" },
        };
        self.egui.draw(&self.ctx, &mut encoder, &view, |ctx| {
            draw_equations_sidebar(
                ctx,
                "Three-Body Problem",
                &[SOFTENED_GRAVITY_EQUATIONS],
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
            KeyCode::KeyT => self.show_trails = !self.show_trails,
            KeyCode::KeyR => {
                self.scene.reset();
                self.camera = Self::initial_camera(self.camera_distance, self.ctx.aspect_ratio());
            }
            _ => {}
        }
    }

    fn handle_mouse_move(&mut self, x: f64, y: f64) {
        if self.orbiting {
            let cursor = Vec2::new(x as f32, y as f32);
            if let Some(last) = self.last_mouse_pos {
                let delta = (cursor - last) * 0.01;
                self.camera.orbit(delta.x, delta.y);
            }
            self.last_mouse_pos = Some(cursor);
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
        "Gravity Sandbox - Three-Body Trails",
        1280,
        720,
    ))?;

    let mut app = App::new(ctx, &config.three_body)?;
    log::info!(
        "Three-body scene ready (G = {}, dt = {}, trail length {})",
        app.scene.params.g,
        app.scene.params.dt,
        config.three_body.trail_length
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
                    _ if consumed => {}
                    WindowEvent::MouseInput { state, button, .. } => {
                        if *button == MouseButton::Right {
                            app.orbiting = *state == ElementState::Pressed;
                            if !app.orbiting {
                                app.last_mouse_pos = None;
                            }
                        }
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        app.handle_mouse_move(position.x, position.y);
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
