use meadow_common::{Color, ObjectId};

use crate::object::{Light, Mesh, SceneObject};

/// Exponential-squared fog: opacity grows with `1 - exp(-(density * depth)^2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogExp2 {
    pub color: Color,
    pub density: f64,
}

impl FogExp2 {
    pub fn new(color: Color, density: f64) -> Self {
        Self { color, density }
    }

    /// Blend factor towards the fog colour at a view-space depth.
    pub fn factor(&self, depth: f32) -> f32 {
        let d = self.density as f32 * depth;
        1.0 - (-d * d).exp()
    }
}

/// An object together with its id and optional name.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: ObjectId,
    pub name: Option<String>,
    pub object: SceneObject,
}

/// The root container handed to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Clear colour. `None` leaves the drawing buffer transparent.
    pub background: Option<Color>,
    pub fog: Option<FogExp2>,
    /// Master switch for per-mesh frustum culling.
    pub frustum_culled: bool,
    nodes: Vec<SceneNode>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            background: None,
            fog: None,
            frustum_culled: true,
            nodes: Vec::new(),
        }
    }

    /// Add an object and return its id.
    pub fn add(&mut self, object: impl Into<SceneObject>) -> ObjectId {
        self.insert(None, object.into())
    }

    pub fn add_named(&mut self, name: impl Into<String>, object: impl Into<SceneObject>) -> ObjectId {
        self.insert(Some(name.into()), object.into())
    }

    fn insert(&mut self, name: Option<String>, object: SceneObject) -> ObjectId {
        let id = ObjectId::new();
        tracing::debug!(id = %id.short(), name = ?name, "scene object added");
        self.nodes.push(SceneNode { id, name, object });
        id
    }

    /// Remove an object. Returns it if it existed.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let idx = self.nodes.iter().position(|n| n.id == id)?;
        Some(self.nodes.remove(idx).object)
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.nodes.iter().find(|n| n.id == id).map(|n| &n.object)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.nodes
            .iter_mut()
            .find(|n| n.id == id)
            .map(|n| &mut n.object)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.name.as_deref() == Some(name))
    }

    /// Read-only access to all nodes in insertion order.
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn meshes(&self) -> impl Iterator<Item = &Mesh> {
        self.nodes.iter().filter_map(|n| match &n.object {
            SceneObject::Mesh(mesh) => Some(mesh),
            SceneObject::Light(_) => None,
        })
    }

    pub fn lights(&self) -> impl Iterator<Item = &Light> {
        self.nodes.iter().filter_map(|n| match &n.object {
            SceneObject::Light(light) => Some(light),
            SceneObject::Mesh(_) => None,
        })
    }

    pub fn ambient_lights(&self) -> impl Iterator<Item = &Light> {
        self.lights()
            .filter(|l| matches!(l, Light::Ambient { .. }))
    }

    pub fn directional_lights(&self) -> impl Iterator<Item = &Light> {
        self.lights()
            .filter(|l| matches!(l, Light::Directional { .. }))
    }
}
