use meadow_common::Viewport;
use meadow_input::PointerEvent;

/// The environment the orchestrator runs in: a window, a canvas, or a test
/// double.
pub trait Host {
    /// Current logical size of the drawable area.
    fn viewport(&self) -> Viewport;

    /// Physical pixels per logical pixel.
    fn device_pixel_ratio(&self) -> f64;

    /// Ask for `frame` to be called again at the next display refresh.
    fn request_animation_frame(&mut self);
}

/// Notifications a host forwards to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// The drawable area changed size; the new size is read from the host.
    Resized,
    /// The frame-rate overlay was clicked.
    StatsClicked,
    Pointer(PointerEvent),
}
