//! Vertex rotation seam
//!
//! The renderer passes every object's local vertices through a
//! [`VertexTransform`] before mapping them to pixels. The default,
//! [`IdentityRotation`], leaves them untouched: rotation data is carried on
//! each object but not yet interpreted.

use std::borrow::Cow;

use gridscene_math::Vec3;

/// Per-object vertex transform applied ahead of the grid-to-pixel mapping
pub trait VertexTransform {
    /// Transform `vertices` according to `rotation`
    fn apply<'a>(&self, vertices: &'a [Vec3], rotation: Vec3) -> Cow<'a, [Vec3]>;
}

/// Returns vertices unchanged regardless of rotation
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityRotation;

impl VertexTransform for IdentityRotation {
    fn apply<'a>(&self, vertices: &'a [Vec3], _rotation: Vec3) -> Cow<'a, [Vec3]> {
        Cow::Borrowed(vertices)
    }
}
