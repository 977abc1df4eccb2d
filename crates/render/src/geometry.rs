use bytemuck::{Pod, Zeroable};
use meadow_scene::Geometry;

/// Interleaved vertex shared by every backend.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Triangle list for a geometry, four vertices per box face.
pub fn box_mesh(geometry: &Geometry) -> (Vec<Vertex>, Vec<u16>) {
    let Geometry::Box {
        width,
        height,
        depth,
    } = *geometry;
    let (x, y, z) = (width * 0.5, height * 0.5, depth * 0.5);

    // Corners per face in counter-clockwise order seen from outside,
    // starting bottom-left.
    #[rustfmt::skip]
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([ 0.0,  0.0,  1.0], [[-x, -y,  z], [ x, -y,  z], [ x,  y,  z], [-x,  y,  z]]),
        ([ 0.0,  0.0, -1.0], [[ x, -y, -z], [-x, -y, -z], [-x,  y, -z], [ x,  y, -z]]),
        ([ 1.0,  0.0,  0.0], [[ x, -y,  z], [ x, -y, -z], [ x,  y, -z], [ x,  y,  z]]),
        ([-1.0,  0.0,  0.0], [[-x, -y, -z], [-x, -y,  z], [-x,  y,  z], [-x,  y, -z]]),
        ([ 0.0,  1.0,  0.0], [[-x,  y,  z], [ x,  y,  z], [ x,  y, -z], [-x,  y, -z]]),
        ([ 0.0, -1.0,  0.0], [[-x, -y, -z], [ x, -y, -z], [ x, -y,  z], [-x, -y,  z]]),
    ];
    const UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, corners) in faces {
        let base = vertices.len() as u16;
        for (position, uv) in corners.into_iter().zip(UVS) {
            vertices.push(Vertex {
                position,
                normal,
                uv,
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn unit_box_counts() {
        let (v, i) = box_mesh(&Geometry::unit_box());
        assert_eq!(v.len(), 24);
        assert_eq!(i.len() as u32, Geometry::unit_box().triangle_count() * 3);
        assert!(i.iter().all(|&idx| (idx as usize) < v.len()));
    }

    #[test]
    fn triangles_face_outwards() {
        let (v, i) = box_mesh(&Geometry::Box {
            width: 2.0,
            height: 4.0,
            depth: 6.0,
        });
        for tri in i.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|k| Vec3::from(v[k as usize].position));
            let n = Vec3::from(v[tri[0] as usize].normal);
            assert!((b - a).cross(c - a).dot(n) > 0.0);
        }
    }

    #[test]
    fn extents_follow_dimensions() {
        let (v, _) = box_mesh(&Geometry::Box {
            width: 2.0,
            height: 4.0,
            depth: 6.0,
        });
        let max = v
            .iter()
            .fold(Vec3::ZERO, |m, vert| m.max(Vec3::from(vert.position)));
        assert_eq!(max, Vec3::new(1.0, 2.0, 3.0));
    }
}
