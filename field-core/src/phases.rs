//! Per-frame and per-event simulation phases for the point field.
//!
//! A frame runs:
//! 1. [`motion_phase`] — pulse and integrate every point that is not being
//!    dragged.
//! 2. [`link_phase`] — rebuild the proximity links from the new positions.
//!
//! [`fluid_phase`] is driven by pointer movement rather than the frame
//! clock. It pushes nearby points along with the dragged one and away
//! from it.

use crate::{config::Settings, field::PointField, links::LinkBuffer, types::PointId};
use glam::Vec2;

/// Advances pulse phase, position and velocity of every free point.
///
/// Dragged points are skipped entirely: their position is owned by the
/// pointer and their pulse is frozen until release.
///
/// ### Parameters
/// - `field` - The points to advance; bounds are taken from `field.bounds`.
/// - `settings` - Provides `fluid_friction` and `max_speed`.
pub fn motion_phase(field: &mut PointField, settings: &Settings) {
    let bounds = field.bounds;
    for p in field.points.iter_mut().filter(|p| !p.is_dragging) {
        p.pulse();
        p.integrate(bounds, settings.fluid_friction, settings.max_speed);
    }
}

/// Rebuilds the proximity links for the current positions.
pub fn link_phase(field: &PointField, settings: &Settings, links: &mut LinkBuffer) {
    links.rebuild(field, settings.connection_distance);
}

/// Applies drag-following and repulsion impulses around a dragged point.
///
/// For every other free point closer than `settings.fluid_range`:
///
/// 1. Adds `delta * (1 - d / fluid_range) * drag_force` to its velocity.
/// 2. Adds a push of magnitude `repulsion_force / (d + 1)` along the
///    direction from the dragged point to it. Coincident points get no push.
/// 3. Caps the resulting speed at `settings.max_speed`.
///
/// ### Parameters
/// - `field` - Point arena; `dragged` must be a valid id in it.
/// - `dragged` - The point under the pointer.
/// - `delta` - Pointer movement since the previous move event.
/// - `settings` - Provides the fluid parameters.
///
/// ### Returns
/// The number of points that received an impulse.
pub fn fluid_phase(
    field: &mut PointField,
    dragged: PointId,
    delta: Vec2,
    settings: &Settings,
) -> usize {
    let Some(origin) = field.points.get(dragged).map(|p| p.pos) else {
        return 0;
    };

    let mut touched = 0;
    for (id, p) in field.points.iter_mut().enumerate() {
        if id == dragged || p.is_dragging {
            continue;
        }

        let offset = p.pos - origin;
        let distance = offset.length();
        if distance >= settings.fluid_range {
            continue;
        }

        let follow = (1.0 - distance / settings.fluid_range) * settings.drag_force;
        p.vel += delta * follow;

        let repulsion = settings.repulsion_force / (distance + 1.0);
        p.vel += offset.normalize_or_zero() * repulsion;

        p.vel = p.vel.clamp_length_max(settings.max_speed);
        touched += 1;
    }
    touched
}
