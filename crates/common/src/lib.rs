//! Shared value types used across the meadow crates.
//!
//! # Invariants
//! - `Color` stores linear RGB; hex strings and 8-bit triples are sRGB.
//! - `Viewport` sizes are logical pixels, never multiplied by a pixel ratio.

mod color;
mod types;

pub use color::{Color, ColorParseError};
pub use types::{ObjectId, Transform, Viewport};
