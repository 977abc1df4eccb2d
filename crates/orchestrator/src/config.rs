use std::path::{Path, PathBuf};

use glam::Vec3;
use meadow_assets::WrapMode;
use meadow_scene::SceneProperties;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("{0}")]
    Invalid(String),
}

/// Texture addressing outside [0, 1], as written in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureWrap {
    #[default]
    ClampToEdge,
    Repeat,
    MirroredRepeat,
}

impl From<TextureWrap> for WrapMode {
    fn from(wrap: TextureWrap) -> Self {
        match wrap {
            TextureWrap::ClampToEdge => WrapMode::ClampToEdge,
            TextureWrap::Repeat => WrapMode::Repeat,
            TextureWrap::MirroredRepeat => WrapMode::MirroredRepeat,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::splat(20.0),
            target: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureConfig {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub wrap: TextureWrap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory that URL-style asset paths resolve under.
    pub root: PathBuf,
    pub textures: Vec<TextureConfig>,
    /// Declared model; only fetched when `load_models` is set.
    pub model: Option<String>,
    pub load_models: bool,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("public"),
            textures: vec![TextureConfig {
                name: "perlinNoise".into(),
                path: "/textures/noise/perlinnoise.webp".into(),
                wrap: TextureWrap::Repeat,
            }],
            model: Some("/models/model.glb".into()),
            load_models: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub antialias: bool,
    pub alpha: bool,
    /// Upper bound on the device pixel ratio used for the drawing buffer.
    pub max_pixel_ratio: f64,
    pub exposure: f32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            antialias: true,
            alpha: true,
            max_pixel_ratio: 2.0,
            exposure: 1.0,
        }
    }
}

/// Everything tunable about the scene. Every field defaults to the values
/// the demo ships with, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub properties: SceneProperties,
    pub assets: AssetsConfig,
    pub renderer: RendererConfig,
}

impl SceneConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text)?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values the camera or renderer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cam = &self.camera;
        if !(cam.fov > 0.0 && cam.fov < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.fov must be in (0, 180), got {}",
                cam.fov
            )));
        }
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return Err(ConfigError::Invalid(format!(
                "camera planes need 0 < near < far, got near={} far={}",
                cam.near, cam.far
            )));
        }
        if !(self.renderer.max_pixel_ratio > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "renderer.max_pixel_ratio must be positive, got {}",
                self.renderer.max_pixel_ratio
            )));
        }
        if !self.properties.fog_density.is_finite() || self.properties.fog_density < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "properties.fogDensity must be a non-negative number, got {}",
                self.properties.fog_density
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meadow_common::Color;

    #[test]
    fn defaults_match_the_demo() {
        let c = SceneConfig::default();
        assert_eq!(c.camera.fov, 75.0);
        assert_eq!(c.camera.position, Vec3::splat(20.0));
        assert_eq!(c.properties.fog_density, 0.0007);
        assert_eq!(c.assets.textures.len(), 1);
        assert_eq!(c.assets.textures[0].wrap, TextureWrap::Repeat);
        assert!(!c.assets.load_models);
        assert_eq!(c.renderer.max_pixel_ratio, 2.0);
    }

    #[test]
    fn empty_and_partial_yaml_fill_defaults() {
        assert_eq!(SceneConfig::from_yaml("").unwrap(), SceneConfig::default());
        let c = SceneConfig::from_yaml("camera:\n  fov: 60\nproperties:\n  fogColor: \"#ff0000\"\n")
            .unwrap();
        assert_eq!(c.camera.fov, 60.0);
        assert_eq!(c.camera.far, 1000.0);
        assert_eq!(c.properties.fog_color, Color::from_hex(0xff0000));
        assert_eq!(c.properties.fog_density, 0.0007);
    }

    #[test]
    fn yaml_round_trip() {
        let c = SceneConfig::default();
        let text = c.to_yaml().unwrap();
        assert!(text.contains("fogDensity"));
        assert_eq!(SceneConfig::from_yaml(&text).unwrap(), c);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            SceneConfig::from_yaml("camera:\n  near: 0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SceneConfig::from_yaml("renderer:\n  max_pixel_ratio: 0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SceneConfig::from_yaml("camera: [1, 2"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.yaml");
        std::fs::write(&path, "renderer:\n  antialias: false\n").unwrap();
        let c = SceneConfig::load(&path).unwrap();
        assert!(!c.renderer.antialias);
        assert!(matches!(
            SceneConfig::load(dir.path().join("missing.yaml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
