use glam::Vec3;
use meadow_common::{Color, Transform};
use serde::{Deserialize, Serialize};

/// Procedural geometry understood by every renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Axis-aligned box centred on the origin.
    Box { width: f32, height: f32, depth: f32 },
}

impl Geometry {
    pub fn unit_box() -> Self {
        Self::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        }
    }

    pub fn triangle_count(&self) -> u32 {
        match self {
            Self::Box { .. } => 12,
        }
    }

    /// Radius of the bounding sphere around the local origin.
    pub fn bounding_radius(&self) -> f32 {
        match self {
            Self::Box {
                width,
                height,
                depth,
            } => Vec3::new(*width, *height, *depth).length() * 0.5,
        }
    }
}

/// Surface description for a mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Material {
    /// Flat colour. Ignores lights.
    Basic { color: Color },
    /// Colour modulated by a view-space normal lookup. Ignores lights.
    ///
    /// `matcap` names a texture in the registry; without one a neutral
    /// grey ramp is used.
    Matcap { color: Color, matcap: Option<String> },
    /// Diffuse shading from the scene's ambient and directional lights.
    Lambert { color: Color },
}

impl Material {
    pub fn color(&self) -> Color {
        match self {
            Self::Basic { color } | Self::Matcap { color, .. } | Self::Lambert { color } => *color,
        }
    }

    pub fn is_lit(&self) -> bool {
        matches!(self, Self::Lambert { .. })
    }

    /// Texture names this material samples.
    pub fn texture_names(&self) -> impl Iterator<Item = &str> {
        match self {
            Self::Matcap {
                matcap: Some(name), ..
            } => Some(name.as_str()),
            _ => None,
        }
        .into_iter()
    }
}

/// A drawable object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Material,
    pub transform: Transform,
    /// Skip drawing when the bounding sphere is outside the view frustum.
    pub frustum_culled: bool,
}

impl Mesh {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            geometry,
            material,
            transform: Transform::default(),
            frustum_culled: true,
        }
    }

    /// World-space bounding sphere (centre, radius).
    pub fn bounding_sphere(&self) -> (Vec3, f32) {
        let scale = self.transform.scale.abs().max_element();
        (
            self.transform.position,
            self.geometry.bounding_radius() * scale,
        )
    }
}

/// Light sources.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Light {
    /// Uniform light from every direction.
    Ambient { color: Color, intensity: f32 },
    /// Parallel rays travelling from `position` towards `target`.
    Directional {
        color: Color,
        intensity: f32,
        position: Vec3,
        target: Vec3,
    },
}

impl Light {
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Self::Ambient { color, intensity }
    }

    pub fn directional(color: Color, intensity: f32, position: Vec3) -> Self {
        Self::Directional {
            color,
            intensity,
            position,
            target: Vec3::ZERO,
        }
    }

    pub fn intensity(&self) -> f32 {
        match self {
            Self::Ambient { intensity, .. } | Self::Directional { intensity, .. } => *intensity,
        }
    }

    /// Direction the light travels, normalised. `None` for ambient lights.
    pub fn direction(&self) -> Option<Vec3> {
        match self {
            Self::Ambient { .. } => None,
            Self::Directional {
                position, target, ..
            } => Some((*target - *position).normalize_or_zero()),
        }
    }
}

/// Anything that can be added to a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneObject {
    Light(Light),
    Mesh(Mesh),
}

impl From<Light> for SceneObject {
    fn from(light: Light) -> Self {
        Self::Light(light)
    }
}

impl From<Mesh> for SceneObject {
    fn from(mesh: Mesh) -> Self {
        Self::Mesh(mesh)
    }
}
