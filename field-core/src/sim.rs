//! The point-field simulator: state plus the operations input drives.
//!
//! [`Simulator`] owns the settings, the point arena, drag state and the
//! per-frame scratch buffers. Every input the interactive page used to
//! read from the DOM arrives here as a plain call (`tick`, `click`,
//! `pointer_down`, `pointer_move`, `pointer_up`, `resize`,
//! `apply_setting`), so the whole thing runs headless in tests.

use crate::{
    config::{Setting, Settings},
    error::SettingsError,
    field::{PointField, canvas_bounds, random_phase},
    links::LinkBuffer,
    phases,
    point::Point,
    render::{self, DrawList},
    types::PointId,
};
use glam::Vec2;
use rand::{SeedableRng, rngs::StdRng};
use tracing::debug;

/// Scale applied to the final pointer offset when a drag is released.
pub const RELEASE_IMPULSE: f32 = 0.1;

#[derive(Clone, Copy, Debug)]
struct Drag {
    id: PointId,
    last_mouse: Vec2,
}

/// Owns one canvas worth of simulation state.
///
/// ### Fields
/// - `settings` - Current validated settings.
/// - `field` - Point arena and canvas bounds.
/// - `links` - Proximity links from the last [`Simulator::tick`].
/// - `frame` - Draw list from the last [`Simulator::frame`].
/// - `drag` - Active drag, if the pointer is holding a point.
/// - `rng` - Source for positions and pulse phases.
#[derive(Debug)]
pub struct Simulator {
    settings: Settings,
    field: PointField,
    links: LinkBuffer,
    frame: DrawList,
    drag: Option<Drag>,
    rng: StdRng,
}

impl Simulator {
    /// Creates a simulator seeded from the operating system and populates it.
    pub fn new(settings: Settings, bounds: Vec2) -> Self {
        Self::with_rng(settings, bounds, StdRng::from_os_rng())
    }

    /// Creates a simulator with a fixed seed, for reproducible runs.
    pub fn with_seed(settings: Settings, bounds: Vec2, seed: u64) -> Self {
        Self::with_rng(settings, bounds, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: Settings, bounds: Vec2, mut rng: StdRng) -> Self {
        let field = PointField::populate(bounds, &settings, &mut rng);
        Self {
            settings,
            links: LinkBuffer::with_capacity(field.len()),
            field,
            frame: DrawList::default(),
            drag: None,
            rng,
        }
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn field(&self) -> &PointField {
        &self.field
    }

    #[inline]
    pub fn links(&self) -> &LinkBuffer {
        &self.links
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.field.len()
    }

    /// The id of the point currently held by the pointer.
    #[inline]
    pub fn dragged(&self) -> Option<PointId> {
        self.drag.map(|d| d.id)
    }

    /// Throws the whole population away and scatters a new one.
    ///
    /// Any drag in progress is dropped along with its point.
    pub fn regenerate(&mut self) {
        self.field = PointField::populate(self.field.bounds, &self.settings, &mut self.rng);
        self.links.clear();
        self.drag = None;
        debug!(
            points = self.field.len(),
            width = self.field.bounds.x,
            height = self.field.bounds.y,
            "regenerated point field"
        );
    }

    /// Changes the canvas size and regenerates the population.
    ///
    /// Negative or non-finite components become zero.
    pub fn resize(&mut self, bounds: Vec2) {
        self.field.bounds = canvas_bounds(bounds);
        self.regenerate();
    }

    /// Validates and stores a setting, then propagates it.
    ///
    /// Pulse speed, pulse amount and base radius are rewritten on every
    /// existing point, and each radius is recomputed from its current phase.
    /// A new point count regenerates the field. All other settings are read
    /// live by the next tick or event.
    ///
    /// ### Returns
    /// The stored (possibly clamped) setting. On error nothing changes.
    pub fn apply_setting(&mut self, setting: Setting) -> Result<Setting, SettingsError> {
        let stored = self.settings.apply(setting)?;
        match stored {
            Setting::PulseSpeed(v) => self.field.points.iter_mut().for_each(|p| p.pulse_speed = v),
            Setting::PulseAmount(v) => self.field.points.iter_mut().for_each(|p| {
                p.pulse_amount = v;
                p.refresh_radius();
            }),
            Setting::BaseRadius(v) => self.field.points.iter_mut().for_each(|p| {
                p.base_radius = v;
                p.refresh_radius();
            }),
            Setting::NumPoints(_) => self.regenerate(),
            _ => {}
        }
        debug!(setting = ?stored, "setting applied");
        Ok(stored)
    }

    /// Advances one animation frame: motion first, then proximity links.
    pub fn tick(&mut self) {
        phases::motion_phase(&mut self.field, &self.settings);
        phases::link_phase(&self.field, &self.settings, &mut self.links);
    }

    /// Builds the draw list for the state left by the last [`Simulator::tick`].
    pub fn frame(&mut self) -> &DrawList {
        render::build_frame(&self.field, &self.links, &self.settings, &mut self.frame);
        &self.frame
    }

    /// Adds a point at `pos` unless an existing point is under it.
    ///
    /// ### Returns
    /// The new point's id, or `None` when the click hit a point or `pos`
    /// is not finite.
    pub fn click(&mut self, pos: Vec2) -> Option<PointId> {
        if !pos.is_finite() || self.field.hit_test(pos).is_some() {
            return None;
        }
        Some(self.spawn_manual(pos))
    }

    /// Grabs the point under `pos`, or creates one there and grabs it.
    ///
    /// ### Returns
    /// The id of the grabbed point, or `None` for a non-finite `pos`.
    pub fn pointer_down(&mut self, pos: Vec2) -> Option<PointId> {
        if !pos.is_finite() {
            return None;
        }
        let id = match self.field.hit_test(pos) {
            Some(id) => id,
            None => self.spawn_manual(pos),
        };

        self.field.points[id].is_dragging = true;
        self.drag = Some(Drag { id, last_mouse: pos });
        debug!(id, x = pos.x, y = pos.y, "drag started");
        Some(id)
    }

    /// Moves the held point to `pos` and stirs the points around it.
    ///
    /// Does nothing when no point is held or `pos` is not finite.
    ///
    /// ### Returns
    /// `true` if a point was moved.
    pub fn pointer_move(&mut self, pos: Vec2) -> bool {
        if !pos.is_finite() {
            return false;
        }
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };

        let delta = pos - drag.last_mouse;
        drag.last_mouse = pos;
        let id = drag.id;

        self.field.points[id].pos = pos;
        phases::fluid_phase(&mut self.field, id, delta, &self.settings);
        true
    }

    /// Releases the held point with a small impulse toward the last pointer position.
    ///
    /// ### Returns
    /// The id of the released point, if one was held.
    pub fn pointer_up(&mut self) -> Option<PointId> {
        let drag = self.drag.take()?;
        let max_speed = self.settings.max_speed;
        let p = &mut self.field.points[drag.id];

        p.vel = ((drag.last_mouse - p.pos) * RELEASE_IMPULSE).clamp_length_max(max_speed);
        p.is_dragging = false;
        debug!(id = drag.id, vx = p.vel.x, vy = p.vel.y, "drag released");
        Some(drag.id)
    }

    /// Creates a manual point at `pos` with its explicit-link snapshot.
    fn spawn_manual(&mut self, pos: Vec2) -> PointId {
        let mut point = Point::new(
            pos,
            self.settings.new_point_radius,
            random_phase(&mut self.rng),
            self.settings.pulse_speed,
            self.settings.pulse_amount,
        );
        point.connections = self
            .field
            .nearest_neighbors(pos, self.settings.max_connections);
        point.is_manual = true;

        let id = self.field.add_point(point);
        debug!(id, x = pos.x, y = pos.y, total = self.field.len(), "point created");
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_sim() -> Simulator {
        let settings = Settings {
            num_points: 0,
            ..Settings::default()
        };
        Simulator::with_seed(settings, Vec2::new(800.0, 600.0), 1)
    }

    #[test]
    fn new_populates_from_settings() {
        let sim = Simulator::with_seed(Settings::default(), Vec2::new(640.0, 480.0), 3);
        assert_eq!(sim.point_count(), 50);
        assert!(sim.dragged().is_none());
    }

    #[test]
    fn click_on_existing_point_is_a_no_op() {
        let mut sim = empty_sim();
        sim.click(Vec2::new(100.0, 100.0)).unwrap();

        assert_eq!(sim.click(Vec2::new(103.0, 100.0)), None);
        assert_eq!(sim.point_count(), 1);
    }

    #[test]
    fn manual_points_snapshot_nearest_neighbors() {
        let mut sim = empty_sim();
        sim.apply_setting(Setting::MaxConnections(2)).unwrap();
        for x in [100.0, 200.0, 300.0, 400.0] {
            sim.click(Vec2::new(x, 100.0)).unwrap();
        }

        let id = sim.click(Vec2::new(290.0, 300.0)).unwrap();
        let p = &sim.field().points[id];

        assert!(p.is_manual);
        assert_eq!(p.base_radius, sim.settings().new_point_radius);
        assert_eq!(p.connections, vec![2, 1]);
    }

    #[test]
    fn pointer_down_on_empty_space_creates_and_grabs() {
        let mut sim = empty_sim();

        let id = sim.pointer_down(Vec2::new(50.0, 60.0)).unwrap();

        assert_eq!(sim.point_count(), 1);
        assert_eq!(sim.dragged(), Some(id));
        assert!(sim.field().points[id].is_dragging);
        assert!(sim.field().points[id].is_manual);
    }

    #[test]
    fn pointer_move_without_drag_does_nothing() {
        let mut sim = empty_sim();
        sim.click(Vec2::new(10.0, 10.0));

        assert!(!sim.pointer_move(Vec2::new(20.0, 20.0)));
        assert_eq!(sim.field().points[0].pos, Vec2::new(10.0, 10.0));
        assert_eq!(sim.pointer_up(), None);
    }

    #[test]
    fn release_impulse_points_at_last_pointer_position() {
        let mut sim = empty_sim();
        let id = sim.pointer_down(Vec2::new(100.0, 100.0)).unwrap();
        sim.pointer_move(Vec2::new(120.0, 100.0));

        // Something else moved the point after the last pointer event.
        sim.field.points[id].pos = Vec2::new(110.0, 90.0);
        sim.pointer_up();

        let p = &sim.field().points[id];
        assert!(!p.is_dragging);
        assert!((p.vel - Vec2::new(1.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn dragged_point_stirs_its_neighbours() {
        let mut sim = empty_sim();
        let near = sim.click(Vec2::new(150.0, 100.0)).unwrap();
        let far = sim.click(Vec2::new(700.0, 500.0)).unwrap();

        sim.pointer_down(Vec2::new(100.0, 100.0));
        sim.pointer_move(Vec2::new(100.0, 110.0));

        assert_ne!(sim.field().points[near].vel, Vec2::ZERO);
        assert_eq!(sim.field().points[far].vel, Vec2::ZERO);
    }

    #[test]
    fn pulse_settings_propagate_to_existing_points() {
        let mut sim = Simulator::with_seed(Settings::default(), Vec2::new(200.0, 200.0), 9);

        sim.apply_setting(Setting::PulseSpeed(0.2)).unwrap();
        sim.apply_setting(Setting::PulseAmount(0.4)).unwrap();
        sim.apply_setting(Setting::BaseRadius(8.0)).unwrap();

        for p in &sim.field().points {
            assert_eq!(p.pulse_speed, 0.2);
            assert_eq!(p.pulse_amount, 0.4);
            assert_eq!(p.base_radius, 8.0);
        }
    }

    #[test]
    fn radius_follows_base_radius_change_immediately() {
        let mut sim = Simulator::with_seed(Settings::default(), Vec2::new(200.0, 200.0), 4);
        sim.click(Vec2::new(-50.0, -50.0)).unwrap();
        sim.tick();

        sim.apply_setting(Setting::BaseRadius(20.0)).unwrap();
        sim.apply_setting(Setting::PulseAmount(0.5)).unwrap();

        for p in &sim.field().points {
            let expected = 20.0 * (1.0 + p.phase.sin() * 0.5);
            assert!((p.radius - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn clicked_point_radius_reflects_its_phase() {
        let mut sim = empty_sim();
        let id = sim.click(Vec2::new(400.0, 300.0)).unwrap();

        let p = &sim.field().points[id];
        let expected = p.base_radius * (1.0 + p.phase.sin() * p.pulse_amount);
        assert!((p.radius - expected).abs() < 1e-6);
    }

    #[test]
    fn non_finite_pointer_input_is_ignored() {
        let mut sim = empty_sim();

        assert_eq!(sim.click(Vec2::new(f32::NAN, 10.0)), None);
        assert_eq!(sim.pointer_down(Vec2::NAN), None);
        assert_eq!(sim.point_count(), 0);
        assert!(sim.dragged().is_none());

        let id = sim.pointer_down(Vec2::new(30.0, 40.0)).unwrap();
        assert!(!sim.pointer_move(Vec2::new(f32::INFINITY, 40.0)));
        sim.pointer_up();
        sim.tick();

        let p = &sim.field().points[id];
        assert_eq!(p.pos, Vec2::new(30.0, 40.0));
        assert!(p.vel.is_finite());
    }

    #[test]
    fn num_points_regenerates_and_drops_drag() {
        let mut sim = empty_sim();
        sim.pointer_down(Vec2::new(10.0, 10.0));

        sim.apply_setting(Setting::NumPoints(25)).unwrap();

        assert_eq!(sim.point_count(), 25);
        assert!(sim.dragged().is_none());
        assert!(sim.field().points.iter().all(|p| !p.is_manual));
    }

    #[test]
    fn rejected_setting_changes_nothing() {
        let mut sim = empty_sim();
        let before = *sim.settings();

        assert!(sim.apply_setting(Setting::DragForce(f32::NAN)).is_err());
        assert_eq!(*sim.settings(), before);
    }

    #[test]
    fn resize_regenerates_inside_new_bounds() {
        let mut sim = Simulator::with_seed(Settings::default(), Vec2::new(800.0, 600.0), 5);

        sim.resize(Vec2::new(100.0, 50.0));

        assert_eq!(sim.field().bounds, Vec2::new(100.0, 50.0));
        assert_eq!(sim.point_count(), 50);
        assert!(sim.field().points.iter().all(|p| p.pos.x <= 100.0 && p.pos.y <= 50.0));
    }

    #[test]
    fn resize_to_infinite_bounds_does_not_panic() {
        let mut sim = Simulator::with_seed(Settings::default(), Vec2::new(800.0, 600.0), 6);

        sim.resize(Vec2::new(f32::INFINITY, 600.0));
        assert_eq!(sim.field().bounds, Vec2::new(0.0, 600.0));
        assert_eq!(sim.point_count(), 50);
        assert!(sim.field().points.iter().all(|p| p.pos.is_finite()));

        sim.resize(Vec2::NAN);
        assert_eq!(sim.field().bounds, Vec2::ZERO);
        sim.tick();
        assert!(sim.field().points.iter().all(|p| p.pos == Vec2::ZERO));
    }
}
