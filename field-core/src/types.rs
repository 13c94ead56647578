/// Identifier for a point in a [`crate::field::PointField`].
///
/// This is an index into `PointField::points`. Points are never removed,
/// so an id stays valid until the whole field is regenerated.
pub type PointId = usize;
