use glam::{Mat4, Vec3, Vec4};
use meadow_scene::{Mesh, PerspectiveCamera, Scene};

/// Six clip planes extracted from a view-projection matrix (depth range 0..1).
///
/// Plane normals point inwards and are normalised, so `dot(n, p) + d` is a
/// signed distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    planes: [Vec4; 6],
}

impl Frustum {
    pub fn from_view_projection(m: Mat4) -> Self {
        let (r0, r1, r2, r3) = (m.row(0), m.row(1), m.row(2), m.row(3));
        let planes = [r3 + r0, r3 - r0, r3 + r1, r3 - r1, r2, r3 - r2].map(|p| {
            let len = p.truncate().length();
            if len > 0.0 { p / len } else { p }
        });
        Self { planes }
    }

    pub fn from_camera(camera: &PerspectiveCamera) -> Self {
        Self::from_view_projection(camera.view_projection())
    }

    /// True unless the sphere is entirely outside one of the planes.
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|p| p.truncate().dot(center) + p.w >= -radius)
    }
}

/// Meshes that survive frustum culling, in scene order.
///
/// Culling applies only when both the scene and the mesh enable it.
pub fn visible_meshes<'a>(
    scene: &'a Scene,
    camera: &PerspectiveCamera,
) -> impl Iterator<Item = &'a Mesh> + use<'a> {
    let frustum = Frustum::from_camera(camera);
    let culling = scene.frustum_culled;
    scene.meshes().filter(move |mesh| {
        if !(culling && mesh.frustum_culled) {
            return true;
        }
        let (center, radius) = mesh.bounding_sphere();
        frustum.intersects_sphere(center, radius)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use meadow_common::{Color, Transform};
    use meadow_scene::{Geometry, Material};

    fn camera() -> PerspectiveCamera {
        let mut cam = PerspectiveCamera::new(75.0, 4.0 / 3.0, 0.1, 1000.0);
        cam.position = Vec3::splat(20.0);
        cam.look_at(Vec3::ZERO);
        cam
    }

    fn cube_at(position: Vec3) -> Mesh {
        let mut mesh = Mesh::new(
            Geometry::unit_box(),
            Material::Basic {
                color: Color::WHITE,
            },
        );
        mesh.transform = Transform::from_position(position);
        mesh
    }

    #[test]
    fn origin_is_inside() {
        let f = Frustum::from_camera(&camera());
        assert!(f.intersects_sphere(Vec3::ZERO, 0.5));
    }

    #[test]
    fn behind_and_beyond_far_are_outside() {
        let f = Frustum::from_camera(&camera());
        assert!(!f.intersects_sphere(Vec3::splat(40.0), 0.5));
        assert!(!f.intersects_sphere(Vec3::splat(-1000.0), 0.5));
    }

    #[test]
    fn sphere_straddling_a_plane_is_kept() {
        let f = Frustum::from_camera(&camera());
        // Just behind the camera but large enough to reach in front of it.
        assert!(f.intersects_sphere(Vec3::splat(21.0), 5.0));
    }

    #[test]
    fn culling_respects_flags() {
        let cam = camera();
        let mut scene = Scene::new();
        scene.add(cube_at(Vec3::ZERO));
        scene.add(cube_at(Vec3::splat(40.0)));
        assert_eq!(visible_meshes(&scene, &cam).count(), 1);

        scene.frustum_culled = false;
        assert_eq!(visible_meshes(&scene, &cam).count(), 2);

        scene.frustum_culled = true;
        let mut always = cube_at(Vec3::splat(40.0));
        always.frustum_culled = false;
        scene.add(always);
        assert_eq!(visible_meshes(&scene, &cam).count(), 2);
    }
}
