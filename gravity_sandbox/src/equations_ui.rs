//! Equations sidebar and status bar drawn with egui

use common::GraphicsContext;
use egui::{Color32, Context, RichText};
use winit::{event::WindowEvent, window::Window};

/// egui context, winit input state and wgpu painter for one window
pub struct EguiOverlay {
    ctx: Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl EguiOverlay {
    pub fn new(gfx: &GraphicsContext) -> Self {
        let ctx = Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            &gfx.window,
            Some(gfx.window.scale_factor() as f32),
            None,
        );
        let renderer = egui_wgpu::Renderer::new(&gfx.device, gfx.config.format, None, 1);

        Self { ctx, state, renderer }
    }

    /// Feed a window event to egui; true when egui consumed it
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Build the UI with `build_ui` and paint it on top of `view`
    pub fn draw(
        &mut self,
        gfx: &GraphicsContext,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        build_ui: impl FnMut(&Context),
    ) {
        let raw_input = self.state.take_egui_input(&gfx.window);
        let full_output = self.ctx.run(raw_input, build_ui);

        self.state
            .handle_platform_output(&gfx.window, full_output.platform_output);
        let tris = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(&gfx.device, &gfx.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gfx.size.width, gfx.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        self.renderer.update_buffers(
            &gfx.device,
            &gfx.queue,
            encoder,
            &tris,
            &screen_descriptor,
        );
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.renderer.render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

/// An equation with its name and formula
pub struct Equation {
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
}

/// Draw the equations sidebar, one group per equation across all `sections`
pub fn draw_equations_sidebar(
    ctx: &Context,
    title: &str,
    sections: &[&[Equation]],
    variables: &[(&str, &str)],
) {
    egui::SidePanel::right("equations_panel")
        .resizable(true)
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.heading(RichText::new(title).color(Color32::LIGHT_BLUE));
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.collapsing(RichText::new("📐 Equations").strong(), |ui| {
                    for eq in sections.iter().flat_map(|section| section.iter()) {
                        ui.group(|ui| {
                            ui.label(RichText::new(eq.name).strong().color(Color32::YELLOW));
                            ui.label(RichText::new(eq.formula).monospace().color(Color32::WHITE));
                            ui.label(RichText::new(eq.description).small().italics());
                        });
                        ui.add_space(4.0);
                    }
                });

                ui.add_space(8.0);

                ui.collapsing(RichText::new("📖 Variables").strong(), |ui| {
                    egui::Grid::new("variables_grid")
                        .num_columns(2)
                        .spacing([10.0, 4.0])
                        .show(ui, |ui| {
                            for (symbol, meaning) in variables {
                                ui.label(RichText::new(*symbol).monospace().color(Color32::LIGHT_GREEN));
                                ui.label(*meaning);
                                ui.end_row();
                            }
                        });
                });
            });
        });
}

/// Values shown in the top status bar
pub struct Status<'a> {
    pub scene: &'a str,
    pub bodies: usize,
    pub steps: u64,
    pub elapsed_time: f32,
    pub energy: f32,
    pub paused: bool,
    pub hint: &'a str,
}

pub fn draw_status_bar(ctx: &Context, status: &Status) {
    egui::TopBottomPanel::top("status").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(status.scene);
            ui.separator();
            ui.label(format!("Bodies: {}", status.bodies));
            ui.separator();
            ui.label(format!("Step: {}", status.steps));
            ui.separator();
            ui.label(format!("t = {:.2}", status.elapsed_time));
            ui.separator();
            ui.label(format!("E = {:.4}", status.energy));
            ui.separator();
            if status.paused {
                ui.label(RichText::new("PAUSED").color(Color32::YELLOW));
            } else {
                ui.label(RichText::new("RUNNING").color(Color32::GREEN));
            }
            if !status.hint.is_empty() {
                ui.separator();
                ui.label(RichText::new(status.hint).small());
            }
        });
    });
}

// ============================================================================
// Softened gravity and integration
// ============================================================================

pub const SOFTENED_GRAVITY_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Softened Attraction",
        formula: "F⃗ᵢ = Σⱼ G·m² / (r² + ε) · r̂ᵢⱼ",
        description: "ε keeps the force finite as r → 0",
    },
    Equation {
        name: "Velocity Update",
        formula: "v⃗ ← v⃗ + F⃗·Δt",
        description: "Force applied as acceleration",
    },
    Equation {
        name: "Position Update",
        formula: "x⃗ ← x⃗ + v⃗·Δt",
        description: "Uses the velocity from this step (semi-implicit Euler)",
    },
    Equation {
        name: "Softened Potential Energy",
        formula: "U = -Σᵢ<ⱼ G·m² / √(r² + ε)",
        description: "Shown as E with kinetic energy",
    },
];

pub const SPAWN_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Click to NDC",
        formula: "x = 2·px/w - 1,  y = 1 - 2·py/h",
        description: "Normalized device coordinates",
    },
    Equation {
        name: "Ray-Plane Intersection",
        formula: "t = -(o⃗·n̂ + d) / (d⃗·n̂)",
        description: "Spawn plane z = 0, no body if t < 0 or d⃗·n̂ = 0",
    },
];

pub const GRAVITY_VARIABLES: &[(&str, &str)] = &[
    ("G", "Gravitational constant (scaled)"),
    ("m", "Mass shared by all bodies"),
    ("r", "Distance between bodies"),
    ("ε", "Softening constant (0.1)"),
    ("r̂ᵢⱼ", "Unit vector from i toward j"),
    ("Δt", "Fixed step per frame"),
    ("v⃗, x⃗", "Velocity, position"),
];
