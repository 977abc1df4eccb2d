use std::fmt::Write as _;

use meadow_common::{Color, Viewport};
use meadow_scene::{FogExp2, Light, SceneObject};

use crate::culling::visible_meshes;
use crate::renderer::{Frame, RenderInfo, Renderer, RendererSettings};
use crate::RenderError;

/// What the last headless frame saw.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSummary {
    pub background: Option<Color>,
    pub fog: Option<FogExp2>,
    pub time: f64,
    pub meshes_drawn: u32,
    pub textures_loaded: usize,
}

/// Renderer without a GPU.
///
/// Honours sizes, pixel ratio, culling and frame counters, so it can stand
/// in for a real backend in tests and in the CLI.
#[derive(Debug)]
pub struct HeadlessRenderer {
    settings: RendererSettings,
    size: Viewport,
    pixel_ratio: f64,
    info: RenderInfo,
    last: Option<FrameSummary>,
    fail_next: Option<String>,
}

impl HeadlessRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self {
            settings,
            size: Viewport::new(300, 150),
            pixel_ratio: 1.0,
            info: RenderInfo::default(),
            last: None,
            fail_next: None,
        }
    }

    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    pub fn last_frame(&self) -> Option<&FrameSummary> {
        self.last.as_ref()
    }

    /// Make the next `render` call fail with `reason`.
    pub fn fail_next_frame(&mut self, reason: impl Into<String>) {
        self.fail_next = Some(reason.into());
    }

    /// Human-readable dump of a frame.
    pub fn describe(&self, frame: &Frame<'_>) -> String {
        let mut out = String::new();
        let (bw, bh) = self.drawing_buffer_size();
        let _ = writeln!(
            out,
            "=== Frame {} ({}x{} @{}x -> {}x{}) ===",
            self.info.frame, self.size.width, self.size.height, self.pixel_ratio, bw, bh
        );
        let cam = frame.camera;
        let _ = writeln!(
            out,
            "Camera: pos=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0} aspect={:.3}",
            cam.position.x,
            cam.position.y,
            cam.position.z,
            cam.target.x,
            cam.target.y,
            cam.target.z,
            cam.fov,
            cam.aspect
        );
        match frame.scene.background {
            Some(c) => {
                let _ = writeln!(out, "Background: {c}");
            }
            None => out.push_str("Background: transparent\n"),
        }
        if let Some(fog) = frame.scene.fog {
            let _ = writeln!(out, "Fog: {} density={}", fog.color, fog.density);
        }
        let _ = writeln!(out, "uTime: {:.3}", frame.uniforms.time());

        for node in frame.scene.nodes() {
            let label = node.name.as_deref().unwrap_or("-");
            let _ = match &node.object {
                SceneObject::Light(Light::Ambient { color, intensity }) => writeln!(
                    out,
                    "  [{}] {label} ambient {color} x{intensity}",
                    node.id.short()
                ),
                SceneObject::Light(Light::Directional {
                    color,
                    intensity,
                    position,
                    ..
                }) => writeln!(
                    out,
                    "  [{}] {label} directional {color} x{intensity} from ({:.1}, {:.1}, {:.1})",
                    node.id.short(),
                    position.x,
                    position.y,
                    position.z
                ),
                SceneObject::Mesh(mesh) => {
                    let p = mesh.transform.position;
                    writeln!(
                        out,
                        "  [{}] {label} mesh {:?} {} pos=({:.2}, {:.2}, {:.2})",
                        node.id.short(),
                        mesh.geometry,
                        mesh.material.color(),
                        p.x,
                        p.y,
                        p.z
                    )
                }
            };
        }
        for texture in frame.textures.iter() {
            let state = if texture.is_loaded() { "loaded" } else { "pending" };
            let _ = writeln!(out, "  texture {} <- {} ({state})", texture.name, texture.path);
        }
        let _ = writeln!(out, "Info: {}", self.info);
        out
    }
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new(RendererSettings::default())
    }
}

impl Renderer for HeadlessRenderer {
    type Error = RenderError;

    fn set_size(&mut self, size: Viewport) {
        self.size = size;
    }

    fn size(&self) -> Viewport {
        self.size
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = ratio;
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn render(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
        self.info.begin_frame();
        if let Some(reason) = self.fail_next.take() {
            return Err(RenderError::Frame(reason));
        }
        let mut drawn = 0;
        for mesh in visible_meshes(frame.scene, frame.camera) {
            self.info.record_draw(mesh.geometry.triangle_count());
            drawn += 1;
        }
        self.last = Some(FrameSummary {
            background: frame.scene.background,
            fog: frame.scene.fog,
            time: frame.uniforms.time(),
            meshes_drawn: drawn,
            textures_loaded: frame.textures.iter().filter(|t| t.is_loaded()).count(),
        });
        tracing::trace!(info = %self.info, "headless frame");
        Ok(())
    }

    fn info(&self) -> &RenderInfo {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use meadow_assets::TextureRegistry;
    use meadow_common::Transform;
    use meadow_scene::{Geometry, Material, Mesh, PerspectiveCamera, Scene, Uniforms};

    fn fixture() -> (Scene, PerspectiveCamera, Uniforms, TextureRegistry) {
        let mut scene = Scene::new();
        scene.background = Some(Color::from_hex(0x2d2d2d));
        scene.fog = Some(FogExp2::new(Color::from_hex(0x2d2d2d), 0.0007));
        scene.add(Light::ambient(Color::WHITE, 0.5));
        scene.add_named(
            "cube",
            Mesh::new(
                Geometry::unit_box(),
                Material::Matcap {
                    color: Color::from_hex(0x00ff00),
                    matcap: None,
                },
            ),
        );
        let mut far = Mesh::new(
            Geometry::unit_box(),
            Material::Basic {
                color: Color::WHITE,
            },
        );
        far.transform = Transform::from_position(Vec3::splat(500.0));
        scene.add(far);

        let mut cam = PerspectiveCamera::new(75.0, 4.0 / 3.0, 0.1, 1000.0);
        cam.position = Vec3::splat(20.0);
        cam.look_at(Vec3::ZERO);
        (scene, cam, Uniforms::new(), TextureRegistry::new())
    }

    #[test]
    fn counts_only_visible_meshes() {
        let (scene, camera, uniforms, textures) = fixture();
        let frame = Frame {
            scene: &scene,
            camera: &camera,
            uniforms: &uniforms,
            textures: &textures,
        };
        let mut r = HeadlessRenderer::default();
        r.render(&frame).unwrap();
        assert_eq!(r.info().frame, 1);
        assert_eq!(r.info().calls, 1);
        assert_eq!(r.info().triangles, 12);
        assert_eq!(r.last_frame().unwrap().meshes_drawn, 1);
    }

    #[test]
    fn injected_failure_affects_one_frame() {
        let (scene, camera, uniforms, textures) = fixture();
        let frame = Frame {
            scene: &scene,
            camera: &camera,
            uniforms: &uniforms,
            textures: &textures,
        };
        let mut r = HeadlessRenderer::default();
        r.fail_next_frame("device lost");
        assert!(r.render(&frame).is_err());
        assert!(r.render(&frame).is_ok());
        assert_eq!(r.info().frame, 2);
    }

    #[test]
    fn size_and_ratio() {
        let mut r = HeadlessRenderer::default();
        r.set_size(Viewport::new(800, 600));
        r.set_pixel_ratio(2.0);
        assert_eq!(r.drawing_buffer_size(), (1600, 1200));
    }

    #[test]
    fn describe_lists_scene() {
        let (scene, camera, uniforms, textures) = fixture();
        let frame = Frame {
            scene: &scene,
            camera: &camera,
            uniforms: &uniforms,
            textures: &textures,
        };
        let r = HeadlessRenderer::default();
        let text = r.describe(&frame);
        assert!(text.contains("Background: #2d2d2d"));
        assert!(text.contains("density=0.0007"));
        assert!(text.contains("cube mesh"));
        assert!(text.contains("ambient"));
    }
}
