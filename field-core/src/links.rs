use crate::{field::PointField, types::PointId};

/// A distance-thresholded link between two points, valid for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProximityLink {
    pub a: PointId,
    pub b: PointId,
    pub distance: f32,
    /// `1 - distance / connection_distance`, in `(0, 1]`.
    pub opacity: f32,
}

/// Line opacity for two points `distance` apart.
///
/// Falls off linearly from `1.0` at distance zero. Returns `None` once
/// `distance` reaches `threshold`, which means no line is drawn.
#[inline]
pub fn link_opacity(distance: f32, threshold: f32) -> Option<f32> {
    (distance < threshold).then(|| 1.0 - distance / threshold)
}

/// A reusable buffer of the proximity links for the current frame.
///
/// The buffer is rebuilt from scratch every frame. Keeping it between
/// frames only saves the allocation.
#[derive(Debug, Default)]
pub struct LinkBuffer {
    links: Vec<ProximityLink>,
}

impl LinkBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            links: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.links.clear();
    }

    /// Recomputes the links for every unordered pair of points.
    ///
    /// Pairs are visited as `(i, j)` with `i < j`, so each pair appears at
    /// most once and always with the lower id in `a`.
    ///
    /// ### Parameters
    /// - `field` - Points to link; only read access is required.
    /// - `threshold` - The connection distance. Pairs at or beyond it are skipped.
    pub fn rebuild(&mut self, field: &PointField, threshold: f32) {
        self.clear();

        let points = &field.points;
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                let distance = points[i].pos.distance(points[j].pos);
                if let Some(opacity) = link_opacity(distance, threshold) {
                    self.links.push(ProximityLink {
                        a: i,
                        b: j,
                        distance,
                        opacity,
                    });
                }
            }
        }
    }

    #[inline]
    pub fn links(&self) -> &[ProximityLink] {
        &self.links
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
