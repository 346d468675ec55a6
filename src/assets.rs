//! Texture loading
//!
//! Resolves `{id, path}` descriptors into shared [`Texture`]s before any
//! drawable object is built. Files that fail to load are reported and
//! skipped, so the objects that wanted them draw with their flat color.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use gridscene_render::{Image, Texture};

/// One texture to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureDescriptor {
    pub id: String,
    pub path: PathBuf,
}

impl TextureDescriptor {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }
}

/// Texture loading failure
#[derive(Debug)]
pub enum AssetError {
    /// No file at the path
    NotFound(PathBuf),
    /// The file could not be decoded as an image
    Decode { path: PathBuf, source: image::ImageError },
    /// Decoded image exceeds the drawing surface limits
    TooLarge { path: PathBuf, width: u32, height: u32 },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::NotFound(path) => write!(f, "Texture not found: {}", path.display()),
            AssetError::Decode { path, source } => {
                write!(f, "Failed to load {}: {}", path.display(), source)
            }
            AssetError::TooLarge { path, width, height } => {
                write!(f, "Texture {} is too large ({}x{})", path.display(), width, height)
            }
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Decode an image file into a texture
pub fn load_texture<P: AsRef<Path>>(path: P) -> Result<Texture, AssetError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AssetError::NotFound(path.to_path_buf()));
    }

    let rgba = image::open(path)
        .map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = rgba.dimensions();

    Image::from_rgba8(width, height, rgba.into_raw())
        .map(Arc::new)
        .ok_or_else(|| AssetError::TooLarge {
            path: path.to_path_buf(),
            width,
            height,
        })
}

/// Loaded textures by id
#[derive(Debug, Clone, Default)]
pub struct TextureSet {
    textures: HashMap<String, Texture>,
}

impl TextureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every descriptor, logging and skipping failures
    pub fn load(descriptors: &[TextureDescriptor]) -> Self {
        let mut set = Self::new();
        for descriptor in descriptors {
            match load_texture(&descriptor.path) {
                Ok(texture) => {
                    log::info!("{} loaded", descriptor.path.display());
                    set.insert(descriptor.id.clone(), texture);
                }
                Err(e) => log::warn!("Texture '{}' unavailable: {}", descriptor.id, e),
            }
        }
        set
    }

    pub fn insert(&mut self, id: impl Into<String>, texture: Texture) {
        self.textures.insert(id.into(), texture);
    }

    /// Shared handle to a texture
    pub fn get(&self, id: &str) -> Option<Texture> {
        self.textures.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gridscene-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_missing_file() {
        let err = load_texture("/nonexistent/box.png").unwrap_err();
        assert!(matches!(err, AssetError::NotFound(_)));
        assert_eq!(format!("{}", err), "Texture not found: /nonexistent/box.png");
    }

    #[test]
    fn test_undecodable_file() {
        let path = temp_path("garbage.png");
        std::fs::write(&path, b"not an image").unwrap();
        let result = load_texture(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(AssetError::Decode { .. })));
    }

    #[test]
    fn test_png_round_trip() {
        let path = temp_path("box.png");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([200, 150, 0, 255]))
            .save(&path)
            .unwrap();
        let texture = load_texture(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!((texture.width(), texture.height()), (3, 2));
        assert_eq!(&texture.data()[..4], &[200, 150, 0, 255]);
    }

    #[test]
    fn test_set_skips_failures() {
        let path = temp_path("player.png");
        image::RgbaImage::from_pixel(1, 1, image::Rgba([100, 100, 255, 255]))
            .save(&path)
            .unwrap();

        let set = TextureSet::load(&[
            TextureDescriptor::new("player", &path),
            TextureDescriptor::new("block", "/nonexistent/block.png"),
        ]);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(set.len(), 1);
        assert!(set.get("player").is_some());
        assert!(set.get("block").is_none());
    }
}
