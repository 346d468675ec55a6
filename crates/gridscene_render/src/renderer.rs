//! Grid renderer with a cached static layer
//!
//! The renderer owns two surfaces. The cache surface is painted once with
//! the grid lines and every static object, then snapshotted. Each frame the
//! visible surface is cleared, the snapshot is copied back in, and the
//! dynamic objects are drawn on top in insertion order.

use std::fmt;

use gridscene_math::{to_pixel, vertex_to_pixel, Vec2, Vec4};

use crate::canvas::{Canvas, ImageData};
use crate::object::{DrawMode, DrawableObject, ObjectMut, ObjectRegistry, RegistryError};
use crate::rotate::{IdentityRotation, VertexTransform};

/// Stroke color of the grid lines
pub const GRID_LINE_COLOR: Vec4 = Vec4::BLACK;
/// Stroke width of the grid lines
pub const GRID_LINE_WIDTH: f32 = 0.1;
/// Stroke width used for outlined objects
pub const OBJECT_LINE_WIDTH: f32 = 1.0;

/// Immutable renderer settings
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RendererConfig {
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
    /// Color shown behind everything
    pub background_color: Vec4,
    /// Pixels per grid cell on each axis
    pub resolution: Vec2,
}

impl RendererConfig {
    /// Size the grid so that `rows x columns` cells fill the surface
    pub fn for_board(width: u32, height: u32, rows: usize, columns: usize, background_color: Vec4) -> Self {
        Self {
            width,
            height,
            background_color,
            resolution: Vec2::new(
                width as f32 / columns.max(1) as f32,
                height as f32 / rows.max(1) as f32,
            ),
        }
    }

    /// Number of grid cells along (x, y)
    pub fn dimension(&self) -> (usize, usize) {
        let columns = (self.width as f32 / self.resolution.x).round().max(0.0) as usize;
        let rows = (self.height as f32 / self.resolution.y).round().max(0.0) as usize;
        (columns, rows)
    }
}

/// Renderer initialization failure
#[derive(Debug)]
pub enum RenderError {
    /// A 2D drawing context could not be obtained for a surface
    ContextUnavailable { width: u32, height: u32 },
    /// Configuration values that cannot describe a grid
    InvalidConfig(String),
    /// Two static objects share an id
    Registry(RegistryError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::ContextUnavailable { width, height } => {
                write!(f, "2D context unavailable for {}x{} surface", width, height)
            }
            RenderError::InvalidConfig(msg) => write!(f, "Invalid renderer config: {}", msg),
            RenderError::Registry(err) => write!(f, "Static object error: {}", err),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Registry(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RegistryError> for RenderError {
    fn from(err: RegistryError) -> Self {
        RenderError::Registry(err)
    }
}

/// Failure drawing a single object; the frame carries on without it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    /// The object has no vertices
    EmptyShape(String),
    /// Position or scale is NaN or infinite
    NonFinite(String),
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawError::EmptyShape(id) => write!(f, "object {} has an empty shape", id),
            DrawError::NonFinite(id) => write!(f, "object {} has non-finite geometry", id),
        }
    }
}

impl std::error::Error for DrawError {}

/// Renderer for grid scenes
pub struct Renderer {
    config: RendererConfig,
    visible: Canvas,
    cache: Canvas,
    /// Snapshot of the cache surface, blitted every frame
    background: ImageData,
    objects: ObjectRegistry,
    static_objects: ObjectRegistry,
    vertex_transform: Box<dyn VertexTransform>,
    frames_rendered: u64,
}

impl Renderer {
    /// Allocate both surfaces and bake the static layer
    pub fn new(config: RendererConfig, static_objects: Vec<DrawableObject>) -> Result<Self, RenderError> {
        let res = config.resolution;
        if !(res.is_finite() && res.x > 0.0 && res.y > 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "resolution must be positive, got ({}, {})",
                res.x, res.y
            )));
        }

        let unavailable = || RenderError::ContextUnavailable {
            width: config.width,
            height: config.height,
        };
        let mut visible = Canvas::new(config.width, config.height).ok_or_else(unavailable)?;
        let mut cache = Canvas::new(config.width, config.height).ok_or_else(unavailable)?;
        visible.set_background(config.background_color);
        cache.set_background(config.background_color);

        let mut registry = ObjectRegistry::new();
        for object in static_objects {
            registry.insert(object).map_err(|e| {
                log::error!("{}", e);
                RenderError::from(e)
            })?;
        }

        let background = cache.get_image_data(0, 0, config.width, config.height);
        let mut renderer = Self {
            config,
            visible,
            cache,
            background,
            objects: ObjectRegistry::new(),
            static_objects: registry,
            vertex_transform: Box::new(IdentityRotation),
            frames_rendered: 0,
        };
        renderer.bake_background();
        renderer.visible.clear();

        log::debug!(
            "Renderer ready: {}x{} px, resolution ({}, {}), {} static objects",
            config.width,
            config.height,
            res.x,
            res.y,
            renderer.static_objects.len()
        );

        Ok(renderer)
    }

    /// Replace the vertex rotation step
    ///
    /// The static layer is re-baked if no frame has been rendered yet.
    pub fn with_vertex_transform(mut self, transform: Box<dyn VertexTransform>) -> Self {
        self.vertex_transform = transform;
        if self.frames_rendered == 0 {
            self.bake_background();
        }
        self
    }

    /// Add an object to the per-frame set
    pub fn add(&mut self, object: DrawableObject) -> Result<(), RegistryError> {
        self.objects.insert(object).map_err(|e| {
            log::error!("{}", e);
            e
        })
    }

    /// Add an object to the static set
    ///
    /// Before the first frame the cached layer is re-baked to include it.
    /// Afterwards the snapshot is frozen and the object is only recorded.
    pub fn add_static(&mut self, object: DrawableObject) -> Result<(), RegistryError> {
        let id = object.id.clone();
        self.static_objects.insert(object).map_err(|e| {
            log::error!("{}", e);
            e
        })?;

        if self.frames_rendered == 0 {
            self.bake_background();
        } else {
            log::warn!(
                "static object {} added after the first frame; cached layer unchanged",
                id
            );
        }
        Ok(())
    }

    /// Remove an object from the per-frame set
    pub fn remove(&mut self, id: &str) -> Result<DrawableObject, RegistryError> {
        self.objects.remove(id).map_err(|e| {
            log::error!("{}", e);
            e
        })
    }

    /// Mutable handle to a per-frame object
    pub fn object_mut(&mut self, id: &str) -> Option<ObjectMut<'_>> {
        self.objects.get_mut(id).map(ObjectMut::new)
    }

    /// Per-frame object by id
    pub fn get(&self, id: &str) -> Option<&DrawableObject> {
        self.objects.get(id)
    }

    /// Per-frame object ids in draw order
    pub fn ids(&self) -> Vec<&str> {
        self.objects.iter().map(|o| o.id.as_str()).collect()
    }

    /// Number of per-frame objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of static objects
    pub fn static_len(&self) -> usize {
        self.static_objects.len()
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// The on-screen surface
    pub fn visible(&self) -> &Canvas {
        &self.visible
    }

    /// The cached static layer
    pub fn background(&self) -> &ImageData {
        &self.background
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Draw one frame onto the visible surface
    pub fn render(&mut self) {
        let (width, height) = (self.config.width as f32, self.config.height as f32);
        self.visible.clear_rect(0.0, 0.0, width, height);
        self.visible.put_image_data(&self.background, 0, 0);

        for object in self.objects.iter() {
            if let Err(e) = draw_object(
                &mut self.visible,
                object,
                self.config.resolution,
                self.vertex_transform.as_ref(),
            ) {
                log::warn!("Skipping draw: {}", e);
            }
        }

        self.frames_rendered += 1;
    }

    /// Repaint the cache surface and take a fresh snapshot
    fn bake_background(&mut self) {
        let (width, height) = (self.config.width, self.config.height);
        self.cache.clear_rect(0.0, 0.0, width as f32, height as f32);

        self.cache.set_stroke_style(GRID_LINE_COLOR);
        self.cache.set_line_width(GRID_LINE_WIDTH);
        self.cache.begin_path();
        for (from, to) in grid_lines(&self.config) {
            self.cache.move_to(from);
            self.cache.line_to(to);
        }
        self.cache.stroke();

        for object in self.static_objects.iter() {
            if let Err(e) = draw_object(
                &mut self.cache,
                object,
                self.config.resolution,
                self.vertex_transform.as_ref(),
            ) {
                log::warn!("Skipping static draw: {}", e);
            }
        }

        self.background = self.cache.get_image_data(0, 0, width, height);
    }
}

/// Interior grid line segments in pixel space
///
/// Horizontal lines come first (one per row boundary), then vertical lines
/// (one per column boundary). Outer edges are not drawn.
pub fn grid_lines(config: &RendererConfig) -> Vec<(Vec2, Vec2)> {
    let (columns, rows) = config.dimension();
    let (width, height) = (config.width as f32, config.height as f32);
    let mut lines = Vec::with_capacity(rows.saturating_sub(1) + columns.saturating_sub(1));

    for row in 1..rows {
        let y = to_pixel(Vec2::new(0.0, row as f32), config.resolution).y;
        lines.push((Vec2::new(0.0, y), Vec2::new(width, y)));
    }
    for column in 1..columns {
        let x = to_pixel(Vec2::new(column as f32, 0.0), config.resolution).x;
        lines.push((Vec2::new(x, 0.0), Vec2::new(x, height)));
    }

    lines
}

/// Draw a single object onto `canvas`
///
/// Vertices go through the rotation seam, then the grid transform. A
/// texture is stretched from the transformed position to the largest
/// transformed vertex coordinate, which assumes an axis-aligned shape with
/// (0, 0) as its minimum corner.
pub fn draw_object(
    canvas: &mut Canvas,
    object: &DrawableObject,
    resolution: Vec2,
    transform: &dyn VertexTransform,
) -> Result<(), DrawError> {
    if object.shape.is_empty() {
        return Err(DrawError::EmptyShape(object.id.clone()));
    }
    if !(object.position.is_finite() && object.scale.is_finite()) {
        return Err(DrawError::NonFinite(object.id.clone()));
    }

    let stroked = object.mode == DrawMode::Stroked;
    if stroked {
        canvas.set_stroke_style(object.color);
        canvas.set_line_width(OBJECT_LINE_WIDTH);
    } else {
        canvas.set_fill_style(object.color);
    }

    let vertices = transform.apply(&object.shape, object.rotation);
    let mut max = Vec2::ZERO;

    canvas.begin_path();
    for (i, vertex) in vertices.iter().enumerate() {
        let point = vertex_to_pixel(object.position, *vertex, object.scale, resolution);
        if i == 0 {
            canvas.move_to(point);
        } else {
            canvas.line_to(point);
        }
        max = max.max_components(point);
    }

    if stroked {
        canvas.stroke();
    } else {
        canvas.fill();
    }

    if let Some(texture) = &object.texture {
        let origin = to_pixel(object.position, resolution);
        let size = max - origin;
        canvas.draw_image(texture, origin.x, origin.y, size.x, size.y);
    }

    Ok(())
}
