//! Scene model: everything the renderer reads each frame.
//!
//! # Invariants
//! - Objects are kept in insertion order; render order follows it.
//! - `uTime` never decreases.
//! - Fog colour and scene background are only written together by callers
//!   that bind them (see the orchestrator's panel bindings).

pub mod camera;
pub mod clock;
pub mod object;
pub mod properties;
pub mod scene;
pub mod uniforms;

pub use camera::PerspectiveCamera;
pub use clock::Clock;
pub use object::{Geometry, Light, Material, Mesh, SceneObject};
pub use properties::{PropertyError, PropertyValue, SceneProperties, SceneProperty};
pub use scene::{FogExp2, Scene, SceneNode};
pub use uniforms::{UniformValue, Uniforms};
