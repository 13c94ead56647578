use crate::{config::Settings, point::Point, types::PointId};
use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

/// The arena of points living on one canvas.
///
/// Points are only ever appended, so a [`PointId`] stored in
/// [`Point::connections`] keeps referring to the same point until the
/// whole field is replaced by [`PointField::populate`].
#[derive(Debug)]
pub struct PointField {
    pub points: Vec<Point>,
    /// Canvas width and height in pixels.
    pub bounds: Vec2,
}

impl PointField {
    /// Creates an empty field; see [`canvas_bounds`] for how `bounds` is sanitised.
    pub fn new(bounds: Vec2) -> Self {
        Self {
            points: Vec::new(),
            bounds: canvas_bounds(bounds),
        }
    }

    /// Builds a field of `settings.num_points` randomly placed points.
    ///
    /// Every point gets `settings.base_radius`, the current pulse settings
    /// and a random phase in `[0, 2π)`. No explicit connections are made.
    pub fn populate(bounds: Vec2, settings: &Settings, rng: &mut impl Rng) -> Self {
        let mut field = Self::new(bounds);
        let bounds = field.bounds;
        field.points = (0..settings.num_points)
            .map(|_| {
                let x = rng.random_range(0.0..=bounds.x);
                let y = rng.random_range(0.0..=bounds.y);
                Point::new(
                    Vec2::new(x, y),
                    settings.base_radius,
                    random_phase(rng),
                    settings.pulse_speed,
                    settings.pulse_amount,
                )
            })
            .collect();
        field
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn add_point(&mut self, point: Point) -> PointId {
        let id = self.points.len();
        self.points.push(point);
        id
    }

    /// Returns the first point (in insertion order) whose hit area contains `pos`.
    pub fn hit_test(&self, pos: Vec2) -> Option<PointId> {
        self.points.iter().position(|p| p.hit(pos))
    }

    /// Returns up to `k` point ids ordered by distance to `pos`.
    ///
    /// The sort is stable, so equally distant points keep their insertion
    /// order.
    pub fn nearest_neighbors(&self, pos: Vec2, k: usize) -> Vec<PointId> {
        let mut dist_list: Vec<(PointId, f32)> = self
            .points
            .iter()
            .enumerate()
            .map(|(id, p)| (id, p.pos.distance(pos)))
            .collect();

        dist_list.sort_by(|a, b| a.1.total_cmp(&b.1));
        dist_list.into_iter().take(k).map(|(id, _)| id).collect()
    }
}

/// Maps each bounds component that is negative, NaN or infinite to zero.
///
/// Random placement samples `[0, bounds]`, which needs finite, non-negative ends.
pub fn canvas_bounds(bounds: Vec2) -> Vec2 {
    let axis = |v: f32| if v.is_finite() && v > 0.0 { v } else { 0.0 };
    Vec2::new(axis(bounds.x), axis(bounds.y))
}

/// Draws a pulse phase uniformly from `[0, 2π)`.
pub fn random_phase(rng: &mut impl Rng) -> f32 {
    rng.random_range(0.0..TAU)
}
