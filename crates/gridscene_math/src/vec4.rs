//! 4D Vector type

use bytemuck::{Pod, Zeroable};
use serde::{Serialize, Deserialize};

/// 4D Vector with x, y, z, w components
///
/// Doubles as an RGBA color: x, y, z are 0-255 channels and w is alpha in
/// the 0-1 range, mirroring CSS `rgba()` notation.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 0.0 };

    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::rgba(255.0, 255.0, 255.0, 1.0);

    /// Create a new Vec4
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Create a color from 0-255 channels and a 0-1 alpha
    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { x: r, y: g, z: b, w: a }
    }

    #[inline]
    pub fn r(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn g(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn b(&self) -> f32 {
        self.z
    }

    #[inline]
    pub fn a(&self) -> f32 {
        self.w
    }
}

impl From<[f32; 4]> for Vec4 {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Vec4> for [f32; 4] {
    fn from(v: Vec4) -> Self {
        [v.x, v.y, v.z, v.w]
    }
}
