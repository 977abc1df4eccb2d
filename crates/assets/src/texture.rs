use std::collections::btree_map::{BTreeMap, Entry};
use std::sync::Arc;

use crate::manager::{LoadEvent, LoadId, LoadingManager};

/// How texture coordinates outside [0, 1] are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    #[default]
    ClampToEdge,
    Repeat,
    MirroredRepeat,
}

/// Decoded RGBA8 pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl DecodedImage {
    /// Decode any format the `image` crate was built with (png, jpeg, webp).
    pub fn decode(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        })
    }
}

/// A named texture. The image arrives after the load completes.
#[derive(Debug, Clone)]
pub struct Texture {
    pub name: String,
    pub path: String,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    load: Option<LoadId>,
    image: Option<Arc<DecodedImage>>,
    version: u64,
}

impl Texture {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            wrap_s: WrapMode::default(),
            wrap_t: WrapMode::default(),
            load: None,
            image: None,
            version: 0,
        }
    }

    pub fn set_wrap(&mut self, mode: WrapMode) {
        self.wrap_s = mode;
        self.wrap_t = mode;
    }

    pub fn image(&self) -> Option<&Arc<DecodedImage>> {
        self.image.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }

    /// Bumped every time the pixels change; GPU caches compare against it.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn set_image(&mut self, image: DecodedImage) {
        self.image = Some(Arc::new(image));
        self.version += 1;
    }
}

/// Starts texture loads on a [`LoadingManager`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureLoader;

impl TextureLoader {
    pub fn new() -> Self {
        Self
    }

    /// Return the texture immediately and fetch its pixels in the background.
    pub fn load(&self, manager: &mut LoadingManager, name: &str, path: &str) -> Texture {
        let mut texture = Texture::new(name, path);
        texture.load = Some(manager.request_image(name, path));
        texture
    }
}

/// Textures by logical name.
#[derive(Debug, Clone, Default)]
pub struct TextureRegistry {
    textures: BTreeMap<String, Texture>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture, replacing one with the same name.
    pub fn insert(&mut self, texture: Texture) -> &mut Texture {
        match self.textures.entry(texture.name.clone()) {
            Entry::Occupied(mut slot) => {
                slot.insert(texture);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(texture),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Texture> {
        self.textures.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Texture> {
        self.textures.get_mut(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Texture> {
        self.textures.values()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Store the pixels of a successful load in the matching texture.
    ///
    /// Returns `false` for failures and for loads this registry did not start.
    pub fn apply(&mut self, event: LoadEvent) -> bool {
        let LoadEvent::Loaded { id, name, image, .. } = event else {
            return false;
        };
        match self.textures.get_mut(&name) {
            Some(texture) if texture.load == Some(id) => {
                texture.set_image(image);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use std::time::Duration;

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn texture_exists_before_pixels() {
        let source = MemorySource::new().with("/noise.png", tiny_png());
        let mut manager = LoadingManager::new(Arc::new(source));
        let mut registry = TextureRegistry::new();

        let texture = registry.insert(TextureLoader::new().load(&mut manager, "noise", "/noise.png"));
        texture.set_wrap(WrapMode::Repeat);
        assert!(!texture.is_loaded());

        for event in manager.wait_idle(Duration::from_secs(5)) {
            assert!(registry.apply(event));
        }
        let texture = registry.get("noise").unwrap();
        assert!(texture.is_loaded());
        assert_eq!(texture.version(), 1);
        assert_eq!(texture.wrap_s, WrapMode::Repeat);
        assert_eq!(texture.wrap_t, WrapMode::Repeat);
        assert_eq!(texture.image().unwrap().rgba.len(), 16);
    }

    #[test]
    fn failed_load_leaves_texture_empty() {
        let mut manager = LoadingManager::new(Arc::new(MemorySource::new()));
        let mut registry = TextureRegistry::new();
        registry.insert(TextureLoader::new().load(&mut manager, "noise", "/missing.webp"));

        for event in manager.wait_idle(Duration::from_secs(5)) {
            assert!(event.is_failure());
            assert!(!registry.apply(event));
        }
        assert!(!registry.get("noise").unwrap().is_loaded());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn set_image_bumps_version() {
        let mut t = Texture::new("a", "/a.png");
        assert_eq!(t.version(), 0);
        t.set_image(DecodedImage::decode(&tiny_png()).unwrap());
        t.set_image(DecodedImage::decode(&tiny_png()).unwrap());
        assert_eq!(t.version(), 2);
    }
}
