//! Asset loading: sources, a loading coordinator and the texture registry.
//!
//! Loads run on worker threads. Their completions are only observed when the
//! owner calls [`LoadingManager::poll`], so every state change happens on the
//! owning thread.
//!
//! # Invariants
//! - A requested texture is in the registry before its image exists.
//! - Textures are never removed from the registry.
//! - A failed load only produces a [`LoadEvent::Failed`]; nothing retries.

mod manager;
mod source;
mod texture;

pub use manager::{LoadEvent, LoadId, LoadingManager, Progress};
pub use source::{AssetSource, FileSystemSource, MemorySource};
pub use texture::{DecodedImage, Texture, TextureLoader, TextureRegistry, WrapMode};

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("asset path escapes the asset root: {0}")]
    InvalidPath(String),
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not decode image {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("loader thread for {0} could not be started")]
    Spawn(String),
}
