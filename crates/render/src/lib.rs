//! Rendering adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - A renderer never mutates the scene, camera or uniforms it is handed.
//! - [`RenderInfo`] counters describe the most recent `render` call only;
//!   `frame` counts every call since creation.
//! - The drawing buffer is `round(size * pixel_ratio)` in each dimension.
//!
//! [`HeadlessRenderer`] implements the trait without a GPU. The wgpu backend
//! lives in `meadow-render-wgpu`; consumers only see [`Renderer`].

mod culling;
mod geometry;
mod headless;
mod renderer;

pub use culling::{Frustum, visible_meshes};
pub use geometry::{Vertex, box_mesh};
pub use headless::{FrameSummary, HeadlessRenderer};
pub use renderer::{
    ColorSpace, Frame, Precision, RenderInfo, Renderer, RendererSettings, ToneMapping,
    drawing_buffer_size,
};

/// Errors raised while drawing a frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("could not create rendering surface: {0}")]
    Surface(String),
    #[error("could not acquire a device: {0}")]
    Device(String),
    #[error("surface frame unavailable: {0}")]
    Frame(String),
}
