//! Backend-independent description of one frame.
//!
//! [`build_frame`] turns the field and its links into a flat [`DrawList`].
//! Any 2D backend can replay it in order; the desktop viewer maps it to
//! egui painter calls. The list is rebuilt in full every frame.

use crate::{
    config::{Rgb, Settings},
    field::PointField,
    links::LinkBuffer,
};
use glam::Vec2;

/// Colour of explicit (creation-time) links.
pub const EXPLICIT_LINK_COLOR: Rgb = Rgb::RED;
/// Stroke width of explicit links, in pixels.
pub const EXPLICIT_LINK_WIDTH: f32 = 2.0;
/// Stroke width of proximity links, in pixels.
pub const PROXIMITY_LINK_WIDTH: f32 = 1.0;

/// Which kind of link a [`Line`] draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    Proximity,
    Explicit,
}

/// A straight stroke between two points.
///
/// ### Fields
/// - `from` - Start of the stroke in canvas pixels.
/// - `to` - End of the stroke in canvas pixels.
/// - `color` - Stroke colour.
/// - `alpha` - Opacity in `[0, 1]`.
/// - `width` - Stroke width in pixels.
/// - `kind` - Whether this is a proximity or an explicit link.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub from: Vec2,
    pub to: Vec2,
    pub color: Rgb,
    pub alpha: f32,
    pub width: f32,
    pub kind: LineKind,
}

/// A filled, opaque disc.
///
/// ### Fields
/// - `center` - Centre in canvas pixels.
/// - `radius` - Radius in pixels.
/// - `color` - Fill colour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
    pub color: Rgb,
}

/// Shapes for one frame, in painting order: lines first, then circles.
///
/// ### Fields
/// - `lines` - Proximity links followed by explicit links.
/// - `circles` - One disc per point, in arena order.
#[derive(Debug, Default)]
pub struct DrawList {
    pub lines: Vec<Line>,
    pub circles: Vec<Circle>,
}

impl DrawList {
    pub fn clear(&mut self) {
        self.lines.clear();
        self.circles.clear();
    }

    pub fn lines_of(&self, kind: LineKind) -> impl Iterator<Item = &Line> {
        self.lines.iter().filter(move |l| l.kind == kind)
    }
}

/// Fills `out` with the shapes for the current state.
///
/// Proximity links come first (connection colour, alpha from the link),
/// then every point's explicit links (red, opaque, twice as wide), then
/// the points themselves. Explicit links whose target id is missing from
/// the field are skipped.
pub fn build_frame(
    field: &PointField,
    links: &LinkBuffer,
    settings: &Settings,
    out: &mut DrawList,
) {
    out.clear();
    let points = &field.points;

    for link in links.links() {
        out.lines.push(Line {
            from: points[link.a].pos,
            to: points[link.b].pos,
            color: settings.connection_color,
            alpha: link.opacity,
            width: PROXIMITY_LINK_WIDTH,
            kind: LineKind::Proximity,
        });
    }

    for p in points {
        for target in p.connections.iter().filter_map(|&id| points.get(id)) {
            out.lines.push(Line {
                from: p.pos,
                to: target.pos,
                color: EXPLICIT_LINK_COLOR,
                alpha: 1.0,
                width: EXPLICIT_LINK_WIDTH,
                kind: LineKind::Explicit,
            });
        }
    }

    out.circles.extend(points.iter().map(|p| Circle {
        center: p.pos,
        radius: p.radius,
        color: settings.point_color,
    }));
}
