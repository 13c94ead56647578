use crate::types::PointId;
use glam::Vec2;

/// A pulsing particle on the canvas.
///
/// Outside a drag, `radius` always equals
/// `base_radius * (1 + sin(phase) * pulse_amount)`.
///
/// ### Fields
/// - `pos` - Position in canvas pixels.
/// - `vel` - Velocity in pixels per tick.
/// - `base_radius` - Radius the pulse oscillates around.
/// - `radius` - Current drawn and hit-tested radius.
/// - `phase` - Pulse phase in radians.
/// - `pulse_speed` - Phase advance per tick, copied from the settings at creation.
/// - `pulse_amount` - Relative pulse amplitude, copied from the settings at creation.
/// - `connections` - Explicit-link snapshot taken at creation time, never recomputed.
/// - `is_dragging` - Whether the pointer currently holds this point.
/// - `is_manual` - Created by a click or drag rather than the random population.
#[derive(Clone, Debug)]
pub struct Point {
    pub pos: Vec2,
    pub vel: Vec2,
    pub base_radius: f32,
    pub radius: f32,
    pub phase: f32,
    pub pulse_speed: f32,
    pub pulse_amount: f32,
    pub connections: Vec<PointId>,
    pub is_dragging: bool,
    pub is_manual: bool,
}

impl Point {
    pub fn new(
        pos: Vec2,
        base_radius: f32,
        phase: f32,
        pulse_speed: f32,
        pulse_amount: f32,
    ) -> Self {
        let mut point = Self {
            pos,
            vel: Vec2::ZERO,
            base_radius,
            radius: base_radius,
            phase,
            pulse_speed,
            pulse_amount,
            connections: Vec::new(),
            is_dragging: false,
            is_manual: false,
        };
        point.refresh_radius();
        point
    }

    /// Recomputes `radius` from the current phase without advancing it.
    #[inline]
    pub fn refresh_radius(&mut self) {
        self.radius = self.base_radius * (1.0 + self.phase.sin() * self.pulse_amount);
    }

    /// Advances the pulse phase by one tick and recomputes `radius`.
    #[inline]
    pub fn pulse(&mut self) {
        self.phase += self.pulse_speed;
        self.refresh_radius();
    }

    /// Moves the point by its velocity, damps it, and bounces off the canvas edges.
    ///
    /// Crossing an edge halves and reverses the velocity component on that
    /// axis and clamps the position back into `[0, bounds]`. The resulting
    /// speed is capped at `max_speed`.
    ///
    /// ### Parameters
    /// - `bounds` - Canvas width and height in pixels.
    /// - `friction` - Per-tick velocity multiplier.
    /// - `max_speed` - Upper bound on the velocity length.
    pub fn integrate(&mut self, bounds: Vec2, friction: f32, max_speed: f32) {
        self.pos += self.vel;
        self.vel *= friction;

        if self.pos.x < 0.0 || self.pos.x > bounds.x {
            self.vel.x *= -0.5;
            self.pos.x = self.pos.x.clamp(0.0, bounds.x);
        }
        if self.pos.y < 0.0 || self.pos.y > bounds.y {
            self.vel.y *= -0.5;
            self.pos.y = self.pos.y.clamp(0.0, bounds.y);
        }

        self.vel = self.vel.clamp_length_max(max_speed);
    }

    /// Returns `true` if `pos` is within twice the current radius.
    #[inline]
    pub fn hit(&self, pos: Vec2) -> bool {
        self.pos.distance(pos) < self.radius * 2.0
    }
}
