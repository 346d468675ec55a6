//! Grid Mathematics Library
//!
//! This crate provides the small vector types and the grid-to-pixel
//! transform shared by the gridscene renderer and input layers.
//!
//! ## Core Types
//!
//! - [`Vec2`] - 2D vector (grid positions, pixel positions, scales, resolutions)
//! - [`Vec3`] - 3D vector (local-space shape vertices, rotations)
//! - [`Vec4`] - 4D vector, also used as an RGBA color
//!
//! ## Transforms
//!
//! - [`to_pixel`] - Grid units to pixel space
//! - [`vertex_to_pixel`] - Object-local vertex to pixel space

mod vec2;
mod vec3;
mod vec4;
pub mod transform;

pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;
pub use transform::{to_pixel, vertex_to_pixel, Rect};
