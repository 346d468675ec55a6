//! Grid Rendering Library
//!
//! This crate draws tile-grid scenes onto a software [`canvas::Canvas`] and
//! shows the result in a window through wgpu.
//!
//! ## Key Components
//!
//! - [`renderer::Renderer`] - Cached static layer plus per-frame objects
//! - [`object::DrawableObject`] - Positioned shape with color and optional texture
//! - [`frame_loop::FrameLoop`] - Start/stop controlled render cycle
//! - [`present::Presenter`] - WGPU surface and blit pipeline
//! - [`rotate::VertexTransform`] - Per-object vertex rotation seam

pub mod canvas;
pub mod frame_loop;
pub mod object;
pub mod present;
pub mod renderer;
pub mod rotate;

pub use canvas::{Canvas, Image, ImageData, Texture};
pub use frame_loop::{FrameLoop, LoopError, LoopHandle, LoopState};
pub use object::{unit_square, DrawMode, DrawableObject, ObjectMut, RegistryError};
pub use present::{PresentError, Presenter};
pub use renderer::{draw_object, grid_lines, DrawError, RenderError, Renderer, RendererConfig};
pub use rotate::{IdentityRotation, VertexTransform};

// Re-export math types for convenience
pub use gridscene_math::{Vec2, Vec3, Vec4};
