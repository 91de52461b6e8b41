//! Interactive 3-D cluster viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the simulation
//! ([`ClusterSimulator`]), the pending command queue and the camera, and
//! implements [`eframe::App`] to tick, control and draw the scene.

use eframe::App;
use glam::{Mat3, Vec3, Vec4};
use rand::rngs::ThreadRng;
use sim_core::{
    command::{Command, CommandQueue},
    config::Config,
    entity::{Category, Entity},
    error::ConfigError,
    overlay,
    simulator::ClusterSimulator,
    store::EntityStore,
};
use tracing::{info, warn};

/// Keys that spawn an entity, paired with the category code they map to.
const SPAWN_KEYS: [(egui::Key, u8); 4] = [
    (egui::Key::Num1, 0),
    (egui::Key::Num2, 1),
    (egui::Key::Num3, 2),
    (egui::Key::Num4, 3),
];

const DEFAULT_YAW: f32 = 0.6;
const DEFAULT_PITCH: f32 = 0.5;
const DEFAULT_ZOOM: f32 = 120.0;

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: [`ClusterSimulator`] and a [`CommandQueue`].
/// - Host-only state: the overlay toggle, run/pause, tick timing.
/// - An orbit camera (yaw/pitch from mouse drag, zoom from scroll).
///
/// The typical per-frame update is:
/// 1. Translate keys and button presses into [`Command`]s.
/// 2. If `running` is `true` and enough time has passed, call [`Viewer::step_once`].
/// 3. Draw the entities and, when enabled, the connection overlay.
///
/// ### Fields
/// - `sim` - The clustering simulation.
/// - `commands` - Commands waiting for the next tick boundary.
/// - `cfg_edit` - Config being edited in the side panel, applied on demand.
/// - `cfg_error` - Last validation error from applying `cfg_edit`.
///
/// - `overlay_enabled` - Whether same-category connection lines are drawn.
/// - `running` - Whether the simulation is currently auto-advancing.
///
/// - `yaw`, `pitch` - Camera orbit angles in radians.
/// - `zoom` - Pixels per world unit.
/// - `pan` - Screen-space pan offset in pixels.
///
/// - `last_pruned` - Entities removed in the last step.
/// - `step_interval` - Target time between automatic steps (seconds).
/// - `last_step_time` - Time stamp of the last step (egui time).
/// - `last_step_dt` - Actual time delta between the last two steps.
pub struct Viewer {
    sim: ClusterSimulator<ThreadRng>,
    commands: CommandQueue,
    cfg_edit: Config,
    cfg_error: Option<String>,

    overlay_enabled: bool,
    running: bool,

    yaw: f32,
    pitch: f32,
    zoom: f32,
    pan: egui::Vec2,

    last_pruned: usize,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
}

impl Viewer {
    /// Creates a viewer with `cfg.initial_population` random entities.
    ///
    /// ### Returns
    /// An error if `cfg` does not validate.
    pub fn new(cfg: Config) -> Result<Self, ConfigError> {
        let store = EntityStore::new(rand::rng(), cfg.spawn_half_extent);
        let mut sim = ClusterSimulator::new(store, cfg)?;
        sim.reset();

        Ok(Self {
            sim,
            commands: CommandQueue::new(),
            cfg_edit: cfg,
            cfg_error: None,
            overlay_enabled: true,
            running: true,
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            zoom: DEFAULT_ZOOM,
            pan: egui::vec2(0.0, 0.0),
            last_pruned: 0,
            step_interval: 0.05,
            last_step_time: 0.0,
            last_step_dt: 0.0,
        })
    }

    /// Applies pending commands, then advances the simulation by one tick.
    fn step_once(&mut self) {
        self.apply_commands();
        let report = self.sim.step();
        self.last_pruned = report.pruned.len();
    }

    /// Queues a command for the next tick boundary.
    pub fn queue(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Applies pending commands without stepping.
    fn apply_commands(&mut self) {
        self.commands
            .drain_into(&mut self.sim, &mut self.overlay_enabled);
    }

    /// Queues a repopulate with the configured initial population.
    fn request_repopulate(&mut self) {
        let count = self.sim.config().initial_population;
        self.commands.push(Command::Repopulate(count));
    }

    /// Tries to apply the side-panel config to the simulation.
    fn apply_config(&mut self) {
        match self.sim.set_config(self.cfg_edit) {
            Ok(()) => {
                info!(cfg = ?self.cfg_edit, "applied config");
                self.cfg_error = None;
            }
            Err(e) => {
                warn!(error = %e, "rejected config");
                self.cfg_error = Some(e.to_string());
            }
        }
    }

    fn reset_camera(&mut self) {
        self.yaw = DEFAULT_YAW;
        self.pitch = DEFAULT_PITCH;
        self.zoom = DEFAULT_ZOOM;
        self.pan = egui::vec2(0.0, 0.0);
    }

    /// World-to-view rotation for the current orbit angles.
    fn view_rotation(&self) -> Mat3 {
        Mat3::from_rotation_x(self.pitch) * Mat3::from_rotation_y(self.yaw)
    }

    /// Projects a world-space position to screen-space.
    ///
    /// The point is rotated into view space, scaled by `zoom`, offset by
    /// `pan` and centered inside `rect` (orthographic). The y-axis is
    /// flipped so that positive y goes up. The view-space depth is
    /// returned alongside so callers can draw back to front.
    fn world_to_screen(&self, p: Vec3, rect: egui::Rect) -> (egui::Pos2, f32) {
        let v = self.view_rotation() * p;
        let center = rect.center();
        (
            egui::pos2(
                center.x + v.x * self.zoom + self.pan.x,
                center.y - v.y * self.zoom + self.pan.y,
            ),
            v.z,
        )
    }

    fn to_color32(c: Vec4) -> egui::Color32 {
        let [r, g, b, a] = (c.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).to_array();
        egui::Color32::from_rgba_unmultiplied(r as u8, g as u8, b as u8, a as u8)
    }

    /// Reads keyboard shortcuts and turns them into commands or host actions.
    fn handle_keys(&mut self, ctx: &egui::Context) {
        for (key, code) in SPAWN_KEYS {
            if ctx.input(|i| i.key_pressed(key)) {
                match Category::try_from(code) {
                    Ok(category) => self.commands.push(Command::AddEntity(category)),
                    Err(e) => warn!(error = %e, "ignoring spawn key"),
                }
            }
        }

        if ctx.input(|i| i.key_pressed(egui::Key::L)) {
            self.commands
                .push(Command::SetOverlayEnabled(!self.overlay_enabled));
        }
        if ctx.input(|i| i.key_pressed(egui::Key::R)) {
            self.request_repopulate();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            self.running = !self.running;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::S)) {
            self.step_once();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::C)) {
            self.reset_camera();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        // Overlay toggles and spawns should show up even while paused.
        if !self.running && !self.commands.is_empty() {
            self.apply_commands();
        }
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, stepping, spawning, overlay).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.01..=1.0)
                        .speed(0.01),
                );

                if ui.button("Step").clicked() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                if ui.button("Repopulate").clicked() {
                    self.request_repopulate();
                }

                ui.separator();
                for category in Category::ALL {
                    if ui.button(format!("+ {category}")).clicked() {
                        self.commands.push(Command::AddEntity(category));
                    }
                }

                ui.separator();
                let mut overlay = self.overlay_enabled;
                if ui.checkbox(&mut overlay, "Lines").changed() {
                    self.commands.push(Command::SetOverlayEnabled(overlay));
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 10.0..=1000.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (tick, population per category, pruning).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt target = {:.3} s", self.step_interval));
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("pruned last = {}", self.last_pruned));
                let counts = self.sim.store().category_counts();
                for category in Category::ALL.into_iter().rev() {
                    ui.label(format!("{category} = {}", counts[category.index()]));
                }
                ui.label(format!("entities = {}", self.sim.store().len()));
                ui.separator();
                ui.label(format!("tick = {}", self.sim.tick()));
            });
        });
    }

    /// Builds the right-hand configuration panel for simulation parameters.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Motion");
                Self::labeled_drag_f32(
                    ui,
                    "step_size:",
                    &mut self.cfg_edit.step_size,
                    0.001..=2.0,
                    0.005,
                );
                Self::labeled_drag_f32(
                    ui,
                    "prune_threshold:",
                    &mut self.cfg_edit.prune_threshold,
                    0.001..=2.0,
                    0.005,
                );

                ui.separator();
                ui.label("Spawning");
                Self::labeled_drag_f32(
                    ui,
                    "half_extent:",
                    &mut self.cfg_edit.spawn_half_extent,
                    0.0..=50.0,
                    0.1,
                );
                Self::labeled_drag_usize(
                    ui,
                    "population:",
                    &mut self.cfg_edit.initial_population,
                    0..=2000,
                    1.0,
                );

                ui.separator();
                if ui.button("Apply").clicked() {
                    self.apply_config();
                }
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg_edit = Config::default();
                    self.apply_config();
                }
                if let Some(err) = &self.cfg_error {
                    ui.colored_label(egui::Color32::RED, err);
                }

                ui.separator();
                ui.label("Keys: 1-4 spawn, L lines, R repopulate");
                ui.label("Space run/pause, S step, C camera");
            });
    }

    /// Draws one marker for `e` at its projected position.
    fn draw_entity(&self, painter: &egui::Painter, e: &Entity, p: egui::Pos2) {
        let r = (0.06 * e.scale.max_element() * self.zoom).max(2.0);
        let fill = Self::to_color32(e.color);
        let outline = egui::Stroke::new(1.0, egui::Color32::from_gray(40));

        match e.category() {
            Category::Teapot => {
                painter.circle(p, r, fill, outline);
            }
            Category::Cube => {
                let rect = egui::Rect::from_center_size(p, egui::vec2(2.0 * r, 2.0 * r));
                painter.rect(rect, 0.0, fill, outline, egui::StrokeKind::Middle);
            }
            Category::Sphere => {
                painter.circle_filled(p, r, fill);
                painter.circle_stroke(p, r * 0.6, outline);
            }
            Category::Troll => {
                let yaw = e.facing_yaw().to_radians();
                let tip = self.view_rotation() * Vec3::new(yaw.sin(), 0.0, yaw.cos());
                let fwd = egui::vec2(tip.x, -tip.y).normalized();
                let fwd = if fwd.is_finite() { fwd } else { egui::vec2(0.0, -1.0) };
                let side = egui::vec2(-fwd.y, fwd.x);
                let points = vec![
                    p + fwd * r * 1.3,
                    p - fwd * r * 0.8 + side * r,
                    p - fwd * r * 0.8 - side * r,
                ];
                painter.add(egui::Shape::convex_polygon(points, fill, outline));
            }
        }
    }

    /// Builds the central panel where entities and overlay lines are drawn.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Orbit with primary drag, pan with secondary drag.
            if response.dragged_by(egui::PointerButton::Primary) {
                let delta = response.drag_delta();
                self.yaw += delta.x * 0.01;
                self.pitch = (self.pitch + delta.y * 0.01).clamp(-1.5, 1.5);
            }
            if response.dragged_by(egui::PointerButton::Secondary) {
                self.pan += response.drag_delta();
            }

            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(10.0, 1000.0);
            }

            // Ground-plane outline of the spawn region.
            let h = self.sim.store().spawn_half_extent();
            let corners: Vec<egui::Pos2> = [(-h, -h), (h, -h), (h, h), (-h, h)]
                .into_iter()
                .map(|(x, z)| self.world_to_screen(Vec3::new(x, 0.0, z), rect).0)
                .collect();
            painter.add(egui::Shape::closed_line(
                corners,
                egui::Stroke::new(1.0, egui::Color32::from_gray(180)),
            ));

            if self.overlay_enabled {
                for line in overlay::connection_lines(self.sim.entities()) {
                    let (a, _) = self.world_to_screen(line.from.pos, rect);
                    let (b, _) = self.world_to_screen(line.to.pos, rect);
                    let color = Self::to_color32(line.from.color).gamma_multiply(0.35);
                    painter.line_segment([a, b], egui::Stroke::new(1.0, color));
                }
            }

            // Back to front.
            let mut projected: Vec<(usize, egui::Pos2, f32)> = self
                .sim
                .entities()
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    let (p, depth) = self.world_to_screen(e.position, rect);
                    (i, p, depth)
                })
                .collect();
            projected.sort_by(|a, b| b.2.total_cmp(&a.2));
            for (i, p, _) in projected {
                self.draw_entity(&painter, &self.sim.entities()[i], p);
            }

            // Auto-run simulation if requested.
            if self.running {
                let now = ctx.input(|i| i.time);
                let elapsed = now - self.last_step_time;
                if elapsed >= self.step_interval {
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = elapsed;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
