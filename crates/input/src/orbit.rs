use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use meadow_common::Viewport;
use meadow_scene::PerspectiveCamera;

use crate::pointer::{PointerButton, PointerEvent};

const EPS: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drag {
    Rotate,
    Pan,
    Dolly,
}

/// Orbits a camera around a target point.
///
/// Left drag rotates, right drag pans, middle drag and the wheel dolly.
/// Events only accumulate; [`OrbitControls::update`] moves the camera.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub enabled: bool,
    pub target: Vec3,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    viewport: Viewport,
    drag: Option<Drag>,
    last: Vec2,
    theta_delta: f32,
    phi_delta: f32,
    scale: f32,
    pan_pixels: Vec2,
}

impl OrbitControls {
    /// Controls orbiting `camera` around its current target.
    pub fn new(camera: &PerspectiveCamera, viewport: Viewport) -> Self {
        Self {
            enabled: true,
            target: camera.target,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            viewport,
            drag: None,
            last: Vec2::ZERO,
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
            pan_pixels: Vec2::ZERO,
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn height(&self) -> f32 {
        self.viewport.height.max(1) as f32
    }

    fn zoom_scale(&self) -> f32 {
        0.95_f32.powf(self.zoom_speed)
    }

    fn dolly(&mut self, delta_y: f32) {
        if delta_y < 0.0 {
            self.scale *= self.zoom_scale();
        } else if delta_y > 0.0 {
            self.scale /= self.zoom_scale();
        }
    }

    /// Feed one pointer event.
    pub fn handle(&mut self, event: &PointerEvent) {
        if !self.enabled {
            return;
        }
        match *event {
            PointerEvent::Down { button, position } => {
                let drag = match button {
                    PointerButton::Primary => Drag::Rotate,
                    PointerButton::Secondary => Drag::Pan,
                    PointerButton::Middle => Drag::Dolly,
                };
                tracing::trace!(?drag, "orbit drag started");
                self.drag = Some(drag);
                self.last = position;
            }
            PointerEvent::Moved { position } => {
                let Some(drag) = self.drag else {
                    return;
                };
                let delta = position - self.last;
                self.last = position;
                match drag {
                    Drag::Rotate => {
                        let h = self.height();
                        self.theta_delta -= TAU * delta.x / h * self.rotate_speed;
                        self.phi_delta -= TAU * delta.y / h * self.rotate_speed;
                    }
                    Drag::Pan => self.pan_pixels += delta * self.pan_speed,
                    Drag::Dolly => self.dolly(-delta.y),
                }
            }
            PointerEvent::Wheel { delta_y } => self.dolly(delta_y),
            PointerEvent::Up { .. } | PointerEvent::Left => self.drag = None,
        }
    }

    /// Apply accumulated input to the camera. Returns false when there was none.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let idle = self.theta_delta == 0.0
            && self.phi_delta == 0.0
            && self.scale == 1.0
            && self.pan_pixels == Vec2::ZERO;
        if idle {
            return false;
        }

        let offset = camera.position - self.target;
        let mut radius = offset.length();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };

        // Pan in the camera plane, scaled so the target point tracks the cursor.
        if self.pan_pixels != Vec2::ZERO {
            let forward = camera.forward();
            let right = forward.cross(camera.up).normalize_or_zero();
            let up = right.cross(forward).normalize_or_zero();
            let target_distance = radius * (camera.fov.to_radians() * 0.5).tan();
            let per_pixel = 2.0 * target_distance / self.height();
            self.target += -right * self.pan_pixels.x * per_pixel + up * self.pan_pixels.y * per_pixel;
        }

        theta += self.theta_delta;
        let min_phi = self.min_polar_angle.max(EPS);
        let max_phi = self.max_polar_angle.min(PI - EPS);
        phi = (phi + self.phi_delta).clamp(min_phi, max_phi);
        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        let next = self.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
        camera.position = next;
        camera.look_at(self.target);

        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.scale = 1.0;
        self.pan_pixels = Vec2::ZERO;
        true
    }
}
