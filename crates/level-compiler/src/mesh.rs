use brush_kernel::{Point3d, Vec3};
use serde::{Deserialize, Serialize};

/// A triangle mesh for rendering, one per texture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Vertex positions [x, y, z, x, y, z, ...]
    pub positions: Vec<f32>,
    /// Vertex normals [nx, ny, nz, ...]
    pub normals: Vec<f32>,
    /// Texture coordinates [u, v, ...], normalized by the texture size
    pub uvs: Vec<f32>,
    /// Triangle indices [i0, i1, i2, ...]
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn add_vertex(&mut self, pos: Point3d, normal: Vec3, uv: (f64, f64)) -> u32 {
        let idx = self.vertex_count() as u32;
        self.positions.extend_from_slice(&pos.to_f32_array());
        self.normals.extend_from_slice(&normal.to_f32_array());
        self.uvs.push(uv.0 as f32);
        self.uvs.push(uv.1 as f32);
        idx
    }

    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Add a convex polygon with one UV per corner, fan-triangulated from its first corner.
    pub fn add_polygon(&mut self, corners: &[Point3d], normal: Vec3, uvs: &[(f64, f64)]) {
        if corners.len() < 3 || corners.len() != uvs.len() {
            return;
        }
        let base: Vec<u32> = corners
            .iter()
            .zip(uvs)
            .map(|(p, uv)| self.add_vertex(*p, normal, *uv))
            .collect();
        for i in 1..(base.len() - 1) {
            self.add_triangle(base[0], base[i], base[i + 1]);
        }
    }

    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.vertex_count() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        for &idx in &other.indices {
            self.indices.push(idx + offset);
        }
    }

    /// Axis-aligned bounds, `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<([f32; 3], [f32; 3])> {
        let mut corners = self.positions.chunks_exact(3);
        let first = corners.next()?;
        let mut min = [first[0], first[1], first[2]];
        let mut max = min;
        for p in corners {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> (Vec<Point3d>, Vec<(f64, f64)>) {
        (
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(1.0, 1.0, 0.0),
                Point3d::new(0.0, 1.0, 0.0),
            ],
            vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
        )
    }

    #[test]
    fn test_polygon_fan() {
        let (corners, uvs) = square();
        let mut mesh = TriangleMesh::new();
        mesh.add_polygon(&corners, Vec3::Z, &uvs);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.uvs.len(), 8);
        assert_eq!(&mesh.normals[..3], &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_degenerate_polygon_is_ignored() {
        let (corners, uvs) = square();
        let mut mesh = TriangleMesh::new();
        mesh.add_polygon(&corners[..2], Vec3::Z, &uvs[..2]);
        mesh.add_polygon(&corners, Vec3::Z, &uvs[..3]);
        assert_eq!(mesh, TriangleMesh::new());
    }

    #[test]
    fn test_merge_offsets_indices() {
        let (corners, uvs) = square();
        let mut a = TriangleMesh::new();
        a.add_polygon(&corners, Vec3::Z, &uvs);
        let b = a.clone();
        a.merge(&b);
        assert_eq!(a.vertex_count(), 8);
        assert_eq!(&a.indices[6..], &[4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn test_bounding_box() {
        assert_eq!(TriangleMesh::new().bounding_box(), None);
        let (corners, uvs) = square();
        let mut mesh = TriangleMesh::new();
        mesh.add_polygon(&corners, Vec3::Z, &uvs);
        assert_eq!(mesh.bounding_box(), Some(([0.0, 0.0, 0.0], [1.0, 1.0, 0.0])));
    }
}
