//! Drawable objects and the id-keyed registry that owns them
//!
//! The registry preserves insertion order so that draw order (and thus
//! z-ordering) stays stable from frame to frame.

use std::collections::HashMap;
use std::fmt;

use gridscene_math::{Vec2, Vec3, Vec4};

use crate::canvas::Texture;

/// How an object's path is painted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrawMode {
    /// Outline only, using the object color as stroke style
    Stroked,
    /// Solid interior, using the object color as fill style
    #[default]
    Filled,
}

/// A named entity the renderer knows how to draw
#[derive(Clone, Debug)]
pub struct DrawableObject {
    /// Identity, unique within its registry
    pub id: String,
    /// Position in grid units
    pub position: Vec2,
    /// Local-space vertices; z is reserved for rotation
    pub shape: Vec<Vec3>,
    /// `rgba()` color: 0-255 channels, 0-1 alpha
    pub color: Vec4,
    /// Optional image blitted over the shape's bounding box
    pub texture: Option<Texture>,
    pub scale: Vec2,
    pub rotation: Vec3,
    pub mode: DrawMode,
}

impl DrawableObject {
    /// Create a filled object with unit scale and no rotation or texture
    pub fn new(id: impl Into<String>, position: Vec2, shape: Vec<Vec3>, color: Vec4) -> Self {
        Self {
            id: id.into(),
            position,
            shape,
            color,
            texture: None,
            scale: Vec2::ONE,
            rotation: Vec3::ZERO,
            mode: DrawMode::Filled,
        }
    }

    /// Builder: set the draw mode
    pub fn with_mode(mut self, mode: DrawMode) -> Self {
        self.mode = mode;
        self
    }

    /// Builder: attach a texture (or clear it with `None`)
    pub fn with_texture(mut self, texture: Option<Texture>) -> Self {
        self.texture = texture;
        self
    }

    /// Builder: set the scale
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Copy of this object under a different id
    pub fn with_id(&self, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..self.clone()
        }
    }
}

/// Unit square with (0,0) as its minimum corner, in outline order
pub fn unit_square() -> Vec<Vec3> {
    vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
    ]
}

/// Registry add/remove failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// An object with this id is already registered
    Duplicate(String),
    /// No object with this id is registered
    Missing(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Duplicate(id) => write!(f, "object {} already added", id),
            RegistryError::Missing(id) => write!(f, "object {} not added", id),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Insertion-ordered map from id to object
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    objects: Vec<DrawableObject>,
    index: HashMap<String, usize>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the end of the draw order; rejects duplicate ids
    pub fn insert(&mut self, object: DrawableObject) -> Result<(), RegistryError> {
        if self.index.contains_key(&object.id) {
            return Err(RegistryError::Duplicate(object.id));
        }
        self.index.insert(object.id.clone(), self.objects.len());
        self.objects.push(object);
        Ok(())
    }

    /// Remove by id, keeping the order of the remaining objects
    pub fn remove(&mut self, id: &str) -> Result<DrawableObject, RegistryError> {
        let Some(slot) = self.index.remove(id) else {
            return Err(RegistryError::Missing(id.to_string()));
        };
        let object = self.objects.remove(slot);
        for moved in &self.objects[slot..] {
            if let Some(i) = self.index.get_mut(&moved.id) {
                *i -= 1;
            }
        }
        Ok(object)
    }

    pub fn get(&self, id: &str) -> Option<&DrawableObject> {
        self.index.get(id).map(|&i| &self.objects[i])
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut DrawableObject> {
        match self.index.get(id) {
            Some(&i) => Some(&mut self.objects[i]),
            None => None,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Objects in insertion (draw) order
    pub fn iter(&self) -> impl Iterator<Item = &DrawableObject> {
        self.objects.iter()
    }
}

/// In-place access to a registered object's mutable fields
///
/// The id cannot be changed through this handle; re-keying goes through
/// remove + add.
pub struct ObjectMut<'a> {
    object: &'a mut DrawableObject,
}

impl<'a> ObjectMut<'a> {
    pub(crate) fn new(object: &'a mut DrawableObject) -> Self {
        Self { object }
    }

    pub fn id(&self) -> &str {
        &self.object.id
    }

    pub fn position(&self) -> Vec2 {
        self.object.position
    }

    pub fn set_position(&mut self, position: Vec2) -> &mut Self {
        self.object.position = position;
        self
    }

    pub fn set_color(&mut self, color: Vec4) -> &mut Self {
        self.object.color = color;
        self
    }

    pub fn set_texture(&mut self, texture: Option<Texture>) -> &mut Self {
        self.object.texture = texture;
        self
    }

    pub fn set_scale(&mut self, scale: Vec2) -> &mut Self {
        self.object.scale = scale;
        self
    }

    pub fn set_rotation(&mut self, rotation: Vec3) -> &mut Self {
        self.object.rotation = rotation;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(id: &str) -> DrawableObject {
        DrawableObject::new(id, Vec2::ZERO, unit_square(), Vec4::BLACK)
    }

    fn ids(registry: &ObjectRegistry) -> Vec<String> {
        registry.iter().map(|o| o.id.clone()).collect()
    }

    #[test]
    fn test_insert_preserves_order() {
        let mut registry = ObjectRegistry::new();
        for id in ["player", "box-0", "box-line-0"] {
            registry.insert(object(id)).unwrap();
        }
        assert_eq!(ids(&registry), ["player", "box-0", "box-line-0"]);
    }

    #[test]
    fn test_duplicate_insert_leaves_registry_unchanged() {
        let mut registry = ObjectRegistry::new();
        registry.insert(object("player")).unwrap();

        let mut dup = object("player");
        dup.position = Vec2::new(9.0, 9.0);
        let err = registry.insert(dup).unwrap_err();

        assert_eq!(err, RegistryError::Duplicate("player".to_string()));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("player").unwrap().position, Vec2::ZERO);
    }

    #[test]
    fn test_remove_reindexes_tail() {
        let mut registry = ObjectRegistry::new();
        for id in ["a", "b", "c", "d"] {
            registry.insert(object(id)).unwrap();
        }
        let removed = registry.remove("b").unwrap();
        assert_eq!(removed.id, "b");
        assert_eq!(ids(&registry), ["a", "c", "d"]);
        assert_eq!(registry.get("d").unwrap().id, "d");
        assert!(registry.get_mut("c").is_some());

        // re-adding goes to the back
        registry.insert(object("b")).unwrap();
        assert_eq!(ids(&registry), ["a", "c", "d", "b"]);
    }

    #[test]
    fn test_remove_missing() {
        let mut registry = ObjectRegistry::new();
        assert_eq!(
            registry.remove("ghost").unwrap_err(),
            RegistryError::Missing("ghost".to_string())
        );
    }

    #[test]
    fn test_registry_error_display() {
        assert_eq!(
            format!("{}", RegistryError::Duplicate("box-0".into())),
            "object box-0 already added"
        );
        assert_eq!(
            format!("{}", RegistryError::Missing("box-0".into())),
            "object box-0 not added"
        );
    }

    #[test]
    fn test_object_mut_setters() {
        let mut obj = object("player");
        {
            let mut handle = ObjectMut::new(&mut obj);
            handle
                .set_position(Vec2::new(3.0, 4.0))
                .set_color(Vec4::WHITE)
                .set_scale(Vec2::splat(0.5));
            assert_eq!(handle.id(), "player");
            assert_eq!(handle.position(), Vec2::new(3.0, 4.0));
        }
        assert_eq!(obj.position, Vec2::new(3.0, 4.0));
        assert_eq!(obj.color, Vec4::WHITE);
        assert_eq!(obj.scale, Vec2::splat(0.5));
    }

    #[test]
    fn test_with_id_copies_fields() {
        let original = object("box-0")
            .with_mode(DrawMode::Stroked)
            .with_scale(Vec2::splat(2.0));
        let twin = original.with_id("box-line-0");
        assert_eq!(twin.id, "box-line-0");
        assert_eq!(twin.mode, DrawMode::Stroked);
        assert_eq!(twin.scale, Vec2::splat(2.0));
    }
}
