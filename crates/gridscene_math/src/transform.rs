//! Grid-to-pixel transforms
//!
//! Logical positions are expressed in grid cells. The renderer converts
//! them to pixels by multiplying with the grid resolution (pixels per cell)
//! on every draw.

use serde::{Serialize, Deserialize};

use crate::{Vec2, Vec3};

/// Map a grid-space vector to pixel space: `grid * resolution`, component-wise
#[inline]
pub fn to_pixel(grid: Vec2, resolution: Vec2) -> Vec2 {
    grid.component_mul(resolution)
}

/// Map an object-local vertex to pixel space
///
/// `position * resolution + vertex.xy * scale * resolution`. The vertex z
/// component is ignored.
#[inline]
pub fn vertex_to_pixel(position: Vec2, vertex: Vec3, scale: Vec2, resolution: Vec2) -> Vec2 {
    to_pixel(position, resolution) + to_pixel(vertex.xy().component_mul(scale), resolution)
}

/// Axis-aligned rectangle in pixel space
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub origin: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Rectangle anchored at the origin
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::ZERO,
            size: Vec2::new(width, height),
        }
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.origin + self.size
    }

    /// Whether `point` lies inside (min edge inclusive, max edge exclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.origin.x && point.x < max.x && point.y >= self.origin.y && point.y < max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pixel() {
        let pixel = to_pixel(Vec2::new(2.0, 3.0), Vec2::new(50.0, 50.0));
        assert_eq!(pixel, Vec2::new(100.0, 150.0));
    }

    #[test]
    fn test_to_pixel_non_square_resolution() {
        let pixel = to_pixel(Vec2::new(4.0, 1.0), Vec2::new(25.0, 40.0));
        assert_eq!(pixel, Vec2::new(100.0, 40.0));
    }

    #[test]
    fn test_to_pixel_is_componentwise_for_many_inputs() {
        for gx in -3..4 {
            for gy in -3..4 {
                let g = Vec2::new(gx as f32, gy as f32);
                let r = Vec2::new(12.5, 40.0);
                let p = to_pixel(g, r);
                assert_eq!(p.x, g.x * r.x);
                assert_eq!(p.y, g.y * r.y);
            }
        }
    }

    #[test]
    fn test_vertex_to_pixel() {
        let p = vertex_to_pixel(
            Vec2::new(2.0, 1.0),
            Vec3::new(1.0, 1.0, 7.0),
            Vec2::new(0.5, 1.0),
            Vec2::new(10.0, 20.0),
        );
        // (2*10 + 1*0.5*10, 1*20 + 1*1*20)
        assert_eq!(p, Vec2::new(25.0, 40.0));
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(Vec2::new(10.0, 10.0), Vec2::new(100.0, 50.0));
        assert!(rect.contains(Vec2::new(10.0, 10.0)));
        assert!(rect.contains(Vec2::new(109.9, 59.9)));
        assert!(!rect.contains(Vec2::new(110.0, 20.0)));
        assert!(!rect.contains(Vec2::new(5.0, 20.0)));
        assert_eq!(rect.max(), Vec2::new(110.0, 60.0));
    }
}
