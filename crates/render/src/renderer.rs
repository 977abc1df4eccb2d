use std::fmt;

use meadow_assets::TextureRegistry;
use meadow_common::Viewport;
use meadow_scene::{PerspectiveCamera, Scene, Uniforms};

/// Shader float precision hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    Low,
    Medium,
    #[default]
    High,
}

/// Colour space of the final output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    #[default]
    Srgb,
    Linear,
}

/// Curve used to bring HDR scene colour into display range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToneMapping {
    None,
    #[default]
    AcesFilmic,
}

/// Construction options shared by every renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererSettings {
    pub antialias: bool,
    /// Keep an alpha channel in the drawing buffer.
    pub alpha: bool,
    pub precision: Precision,
    pub output_color_space: ColorSpace,
    pub tone_mapping: ToneMapping,
    pub tone_mapping_exposure: f32,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            antialias: true,
            alpha: true,
            precision: Precision::High,
            output_color_space: ColorSpace::Srgb,
            tone_mapping: ToneMapping::AcesFilmic,
            tone_mapping_exposure: 1.0,
        }
    }
}

/// Counters of the last rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderInfo {
    /// Number of `render` calls so far.
    pub frame: u64,
    pub calls: u32,
    pub triangles: u32,
    pub points: u32,
    pub lines: u32,
}

impl RenderInfo {
    /// Start a new frame: bump `frame`, clear the per-frame counters.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
        self.calls = 0;
        self.triangles = 0;
        self.points = 0;
        self.lines = 0;
    }

    pub fn record_draw(&mut self, triangles: u32) {
        self.calls += 1;
        self.triangles += triangles;
    }
}

impl fmt::Display for RenderInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frame={} calls={} triangles={} points={} lines={}",
            self.frame, self.calls, self.triangles, self.points, self.lines
        )
    }
}

/// Everything a renderer reads to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub scene: &'a Scene,
    pub camera: &'a PerspectiveCamera,
    pub uniforms: &'a Uniforms,
    pub textures: &'a TextureRegistry,
}

/// Drawing buffer size for a logical size and pixel ratio.
pub fn drawing_buffer_size(size: Viewport, pixel_ratio: f64) -> (u32, u32) {
    let scale = |v: u32| (f64::from(v) * pixel_ratio).round().max(0.0) as u32;
    (scale(size.width), scale(size.height))
}

/// Renderer-agnostic interface. Every backend implements this trait.
pub trait Renderer {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Resize the output to a logical size.
    fn set_size(&mut self, size: Viewport);

    fn size(&self) -> Viewport;

    fn set_pixel_ratio(&mut self, ratio: f64);

    fn pixel_ratio(&self) -> f64;

    /// Physical size of the buffer the scene is drawn into.
    fn drawing_buffer_size(&self) -> (u32, u32) {
        drawing_buffer_size(self.size(), self.pixel_ratio())
    }

    /// Draw one frame.
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), Self::Error>;

    fn info(&self) -> &RenderInfo;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let s = RendererSettings::default();
        assert!(s.antialias && s.alpha);
        assert_eq!(s.precision, Precision::High);
        assert_eq!(s.output_color_space, ColorSpace::Srgb);
        assert_eq!(s.tone_mapping, ToneMapping::AcesFilmic);
        assert_eq!(s.tone_mapping_exposure, 1.0);
    }

    #[test]
    fn drawing_buffer_rounds() {
        assert_eq!(drawing_buffer_size(Viewport::new(800, 600), 2.0), (1600, 1200));
        assert_eq!(drawing_buffer_size(Viewport::new(101, 51), 1.5), (152, 77));
        assert_eq!(drawing_buffer_size(Viewport::new(0, 0), 2.0), (0, 0));
    }

    #[test]
    fn info_resets_per_frame() {
        let mut info = RenderInfo::default();
        info.begin_frame();
        info.record_draw(12);
        info.record_draw(12);
        assert_eq!((info.calls, info.triangles), (2, 24));
        info.begin_frame();
        assert_eq!(info.frame, 2);
        assert_eq!((info.calls, info.triangles), (0, 0));
        assert!(info.to_string().contains("frame=2"));
    }
}
