//! wgpu render backend.
//!
//! Draws the scene into an HDR target at drawing-buffer size, tone maps it
//! onto the window surface and finishes with an optional egui overlay.
//!
//! # Invariants
//! - The renderer never mutates the scene it draws.
//! - Zero-sized windows leave the surface unconfigured; frames are skipped
//!   until a non-zero size arrives.

mod gpu;
mod overlay;
mod shaders;
mod targets;
mod textures;

pub use gpu::WgpuRenderer;
pub use overlay::GuiFrame;
