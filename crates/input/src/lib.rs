//! Input: a windowing-independent pointer vocabulary and the orbit camera
//! controls driven by it.
//!
//! # Invariants
//! - Hosts translate their native events into [`PointerEvent`]s; nothing in
//!   here knows about a windowing library.
//! - Input only accumulates between frames. The camera moves in
//!   [`OrbitControls::update`].

pub mod orbit;
pub mod pointer;

pub use orbit::OrbitControls;
pub use pointer::{PointerButton, PointerEvent};
