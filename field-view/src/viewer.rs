//! Interactive point-field viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a [`Simulator`] and
//! implements [`eframe::App`] to drive it from pointer input and a
//! settings panel, and to paint its draw list every frame.

use eframe::App;
use field_core::{
    config::{Rgb, Setting, Settings, limits},
    render::DrawList,
    sim::Simulator,
};
use glam::Vec2;
use tracing::warn;

/// Canvas size used until the first frame reports the real one.
const INITIAL_CANVAS: Vec2 = Vec2::new(800.0, 600.0);

/// Main application state for the interactive viewer.
///
/// The typical per-frame update is:
/// 1. Build the panels; changed controls become [`Setting`]s.
/// 2. Regenerate the field if the canvas changed size.
/// 3. Forward pointer presses, moves and releases to the simulator.
/// 4. If `running`, advance the simulation one tick.
/// 5. Paint the draw list.
///
/// ### Fields
/// - `sim` - The simulation core.
/// - `running` - Whether a tick runs every frame.
/// - `canvas_size` - Canvas size the field was last generated for.
/// - `last_frame_time` - egui time of the previous frame.
/// - `last_frame_dt` - Time between the last two frames (display only).
pub struct Viewer {
    sim: Simulator,
    running: bool,
    canvas_size: egui::Vec2,
    last_frame_time: f64,
    last_frame_dt: f64,
}

impl Viewer {
    /// Creates a viewer around a freshly populated simulator.
    ///
    /// ### Parameters
    /// - `settings` - Validated start-up settings.
    /// - `seed` - Fixed seed for the population, or `None` for OS entropy.
    pub fn new(settings: Settings, seed: Option<u64>) -> Self {
        let sim = match seed {
            Some(seed) => Simulator::with_seed(settings, INITIAL_CANVAS, seed),
            None => Simulator::new(settings, INITIAL_CANVAS),
        };

        Self {
            sim,
            running: true,
            canvas_size: egui::vec2(INITIAL_CANVAS.x, INITIAL_CANVAS.y),
            last_frame_time: 0.0,
            last_frame_dt: 0.0,
        }
    }

    /// Sends a setting to the simulator, logging and dropping rejected values.
    fn apply(&mut self, setting: Setting) {
        if let Err(e) = self.sim.apply_setting(setting) {
            warn!(error = %e, "setting rejected");
        }
    }

    /// Converts an egui screen position into canvas pixels.
    fn screen_to_canvas(p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        Vec2::new(p.x - rect.min.x, p.y - rect.min.y)
    }

    /// Converts canvas pixels into an egui screen position.
    fn canvas_to_screen(p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        egui::pos2(rect.min.x + p.x, rect.min.y + p.y)
    }

    fn color32(c: Rgb, alpha: f32) -> egui::Color32 {
        let [r, g, b] = c.0;
        egui::Color32::from_rgb(r, g, b).gamma_multiply(alpha.clamp(0.0, 1.0))
    }

    /// Helper to draw a labeled `f32` slider; returns the new value if it changed.
    fn labeled_slider_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: f32,
        range: std::ops::RangeInclusive<f32>,
    ) -> Option<f32> {
        let mut v = value;
        let changed = ui
            .horizontal(|ui| {
                ui.label(label);
                ui.add(egui::Slider::new(&mut v, range)).changed()
            })
            .inner;
        changed.then_some(v)
    }

    /// Helper to draw a labeled `usize` slider; returns the new value if it changed.
    fn labeled_slider_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: usize,
        range: std::ops::RangeInclusive<usize>,
    ) -> Option<usize> {
        let mut v = value;
        let changed = ui
            .horizontal(|ui| {
                ui.label(label);
                ui.add(egui::Slider::new(&mut v, range)).changed()
            })
            .inner;
        changed.then_some(v)
    }

    /// Helper to draw a labeled colour button; returns the new colour if it changed.
    fn labeled_color(ui: &mut egui::Ui, label: &str, value: Rgb) -> Option<Rgb> {
        let mut rgb = value.0;
        let changed = ui
            .horizontal(|ui| {
                ui.label(label);
                ui.color_edit_button_srgb(&mut rgb).changed()
            })
            .inner;
        changed.then_some(Rgb(rgb))
    }

    /// Builds the top panel UI (run controls, regeneration).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Step").clicked() {
                    self.sim.tick();
                }

                if ui.button("Regenerate").clicked() {
                    self.sim.regenerate();
                }

                ui.separator();
                ui.label("Left-drag: grab or create a point · Right-click: add a point");
            });
        });
    }

    /// Builds the bottom status bar (frame time, point and link counts).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt last = {:.3} s", self.last_frame_dt));
                ui.separator();
                ui.label(format!("points = {}", self.sim.point_count()));
                ui.label(format!("links = {}", self.sim.links().len()));
                if let Some(id) = self.sim.dragged() {
                    ui.label(format!("dragging #{id}"));
                }
            });
        });
    }

    /// Live point count next to the count the next regeneration will scatter.
    ///
    /// Clicks and drags grow the field past `num_points`, so the slider
    /// value alone does not say how many points are on the canvas.
    fn population_label(&self) -> String {
        let live = self.sim.point_count();
        let manual = self.sim.field().points.iter().filter(|p| p.is_manual).count();
        format!("live points: {live} ({manual} added by hand)")
    }

    /// Builds the right-hand settings panel.
    ///
    /// Every control reads the current value from the simulator and, on
    /// change, goes back through [`Viewer::apply`] so the simulator can
    /// validate and propagate it.
    fn ui_settings_panel(&mut self, ctx: &egui::Context) {
        let s = *self.sim.settings();
        let population = self.population_label();
        let mut changes: Vec<Setting> = Vec::new();

        egui::SidePanel::right("settings_panel")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Settings");

                ui.separator();
                ui.label("Pulse");
                if let Some(v) =
                    Self::labeled_slider_f32(ui, "pulse speed:", s.pulse_speed, limits::PULSE_SPEED)
                {
                    changes.push(Setting::PulseSpeed(v));
                }
                if let Some(v) = Self::labeled_slider_f32(
                    ui,
                    "pulse amount:",
                    s.pulse_amount,
                    limits::PULSE_AMOUNT,
                ) {
                    changes.push(Setting::PulseAmount(v));
                }
                if let Some(v) =
                    Self::labeled_slider_f32(ui, "base radius:", s.base_radius, limits::BASE_RADIUS)
                {
                    changes.push(Setting::BaseRadius(v));
                }

                ui.separator();
                ui.label("Population");
                ui.label(population);
                if let Some(n) = Self::labeled_slider_usize(
                    ui,
                    "regenerate with:",
                    s.num_points,
                    limits::NUM_POINTS,
                ) {
                    changes.push(Setting::NumPoints(n));
                }
                if let Some(v) = Self::labeled_slider_f32(
                    ui,
                    "new point radius:",
                    s.new_point_radius,
                    limits::NEW_POINT_RADIUS,
                ) {
                    changes.push(Setting::NewPointRadius(v));
                }

                ui.separator();
                ui.label("Connections");
                if let Some(v) = Self::labeled_slider_f32(
                    ui,
                    "distance:",
                    s.connection_distance,
                    limits::CONNECTION_DISTANCE,
                ) {
                    changes.push(Setting::ConnectionDistance(v));
                }
                if let Some(n) = Self::labeled_slider_usize(
                    ui,
                    "max per new point:",
                    s.max_connections,
                    limits::MAX_CONNECTIONS,
                ) {
                    changes.push(Setting::MaxConnections(n));
                }

                ui.separator();
                ui.label("Fluid");
                if let Some(v) =
                    Self::labeled_slider_f32(ui, "drag force:", s.drag_force, limits::DRAG_FORCE)
                {
                    changes.push(Setting::DragForce(v));
                }
                if let Some(v) = Self::labeled_slider_f32(
                    ui,
                    "friction:",
                    s.fluid_friction,
                    limits::FLUID_FRICTION,
                ) {
                    changes.push(Setting::FluidFriction(v));
                }
                if let Some(v) =
                    Self::labeled_slider_f32(ui, "range:", s.fluid_range, limits::FLUID_RANGE)
                {
                    changes.push(Setting::FluidRange(v));
                }
                if let Some(v) = Self::labeled_slider_f32(
                    ui,
                    "repulsion:",
                    s.repulsion_force,
                    limits::REPULSION_FORCE,
                ) {
                    changes.push(Setting::RepulsionForce(v));
                }
                if let Some(v) =
                    Self::labeled_slider_f32(ui, "max speed:", s.max_speed, limits::MAX_SPEED)
                {
                    changes.push(Setting::MaxSpeed(v));
                }

                ui.separator();
                ui.label("Colours");
                if let Some(c) = Self::labeled_color(ui, "points:", s.point_color) {
                    changes.push(Setting::PointColor(c));
                }
                if let Some(c) = Self::labeled_color(ui, "connections:", s.connection_color) {
                    changes.push(Setting::ConnectionColor(c));
                }

                ui.separator();
                if ui.button("Reset settings to default").clicked() {
                    changes.extend(Settings::default().entries());
                }
            });

        for setting in changes {
            self.apply(setting);
        }
    }

    /// Forwards pointer input on the canvas to the simulator.
    fn handle_pointer(&mut self, ctx: &egui::Context, response: &egui::Response, rect: egui::Rect) {
        let (pressed, released, moved, latest) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.delta() != egui::Vec2::ZERO,
                i.pointer.latest_pos(),
            )
        });

        if let Some(pos) = latest {
            let canvas_pos = Self::screen_to_canvas(pos, rect);
            if pressed && response.hovered() {
                let _ = self.sim.pointer_down(canvas_pos);
            } else if moved && self.sim.dragged().is_some() {
                self.sim.pointer_move(canvas_pos);
            }
        }

        if released {
            self.sim.pointer_up();
        }

        if response.secondary_clicked()
            && let Some(pos) = response.interact_pointer_pos()
        {
            self.sim.click(Self::screen_to_canvas(pos, rect));
        }
    }

    /// Replays a draw list with the egui painter.
    fn paint(painter: &egui::Painter, rect: egui::Rect, list: &DrawList) {
        for line in &list.lines {
            let a = Self::canvas_to_screen(line.from, rect);
            let b = Self::canvas_to_screen(line.to, rect);
            painter.line_segment(
                [a, b],
                egui::Stroke::new(line.width, Self::color32(line.color, line.alpha)),
            );
        }

        for c in &list.circles {
            let center = Self::canvas_to_screen(c.center, rect);
            painter.circle_filled(center, c.radius.max(0.0), Self::color32(c.color, 1.0));
        }
    }

    /// Builds the central canvas: resize tracking, input, stepping and painting.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::WHITE))
            .show(ctx, |ui| {
                let response =
                    ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
                let rect = response.rect;
                let painter = ui.painter_at(rect);

                if rect.size() != self.canvas_size {
                    self.canvas_size = rect.size();
                    self.sim.resize(Vec2::new(rect.width(), rect.height()));
                }

                self.handle_pointer(ctx, &response, rect);

                let now = ctx.input(|i| i.time);
                if self.running {
                    if self.last_frame_time > 0.0 {
                        self.last_frame_dt = now - self.last_frame_time;
                    }
                    self.sim.tick();
                    ctx.request_repaint();
                }
                self.last_frame_time = now;

                Self::paint(&painter, rect, self.sim.frame());
            });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_settings_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(40.0, 25.0), egui::vec2(800.0, 600.0))
    }

    fn seeded_viewer() -> Viewer {
        Viewer::new(Settings::default(), Some(17))
    }

    #[test]
    fn screen_to_canvas_and_back_is_roundtrip() {
        let rect = test_rect();

        for p in [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 500.0),
            Vec2::new(799.5, 3.25),
        ] {
            let screen = Viewer::canvas_to_screen(p, rect);
            let back = Viewer::screen_to_canvas(screen, rect);
            assert!((back - p).length() < 1e-4, "p={p:?}, back={back:?}");
        }

        assert_eq!(
            Viewer::screen_to_canvas(egui::pos2(40.0, 25.0), rect),
            Vec2::ZERO
        );
    }

    #[test]
    fn new_starts_running_with_initial_population() {
        let viewer = seeded_viewer();

        assert!(viewer.running);
        assert_eq!(viewer.sim.point_count(), Settings::default().num_points);
        assert_eq!(viewer.sim.field().bounds, INITIAL_CANVAS);
    }

    #[test]
    fn rejected_setting_keeps_previous_value() {
        let mut viewer = seeded_viewer();

        viewer.apply(Setting::FluidRange(f32::NAN));
        assert_eq!(viewer.sim.settings().fluid_range, 200.0);

        viewer.apply(Setting::FluidRange(120.0));
        assert_eq!(viewer.sim.settings().fluid_range, 120.0);
    }

    #[test]
    fn reset_entries_restore_defaults() {
        let mut viewer = seeded_viewer();
        viewer.apply(Setting::DragForce(3.0));
        viewer.apply(Setting::PointColor(Rgb([9, 9, 9])));

        for setting in Settings::default().entries() {
            viewer.apply(setting);
        }

        assert_eq!(*viewer.sim.settings(), Settings::default());
    }

    #[test]
    fn population_label_counts_added_points() {
        let mut viewer = seeded_viewer();
        let base = Settings::default().num_points;
        assert_eq!(
            viewer.population_label(),
            format!("live points: {base} (0 added by hand)")
        );

        viewer.sim.click(Vec2::new(-100.0, -100.0)).unwrap();
        viewer.sim.click(Vec2::new(-200.0, -100.0)).unwrap();

        assert_eq!(viewer.sim.settings().num_points, base);
        assert_eq!(
            viewer.population_label(),
            format!("live points: {} (2 added by hand)", base + 2)
        );
    }

    #[test]
    fn color32_scales_alpha() {
        let opaque = Viewer::color32(Rgb::RED, 1.0);
        let clear = Viewer::color32(Rgb::RED, 0.0);

        assert_eq!(opaque, egui::Color32::from_rgb(255, 0, 0));
        assert_eq!(clear.a(), 0);
    }
}
