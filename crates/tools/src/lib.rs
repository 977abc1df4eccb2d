//! Developer tooling: the debug panel and the frame-rate overlay.
//!
//! Both keep their state outside egui and only draw through it, so the
//! bookkeeping is testable without a window.
//!
//! # Invariants
//! - The panel never writes values itself; `show` reports changes and the
//!   owner applies them.
//! - Number changes are clamped to the control's range before they are
//!   reported.

mod panel;
mod stats;

pub use panel::{
    Binding, Control, ControlValue, DebugPanel, Folder, PanelChange, PanelLayout,
};
pub use stats::{FrameStats, StatsAnchor, StatsMode};
