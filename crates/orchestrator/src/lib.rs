//! Scene orchestrator: owns every engine object and drives the frame loop.
//!
//! # Invariants
//! - Startup runs in a fixed order: stats, textures, models, listeners,
//!   lights, objects.
//! - Fog colour and scene background are written together and never diverge.
//! - Each frame advances `uTime` by the clock delta and renders exactly once.
//! - Asset completions are applied on the owning thread at the start of a
//!   frame; a failed load never stops the loop.

mod config;
mod host;
mod orchestrator;

pub use config::{
    AssetsConfig, CameraConfig, ConfigError, RendererConfig, SceneConfig, TextureConfig,
    TextureWrap,
};
pub use host::{Host, HostEvent};
pub use orchestrator::{PERLIN_NOISE, SCENE_PROPERTIES_FOLDER, SceneOrchestrator};

/// Errors raised while building the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("renderer could not be created: {0}")]
    Renderer(#[source] Box<dyn std::error::Error + Send + Sync>),
}
