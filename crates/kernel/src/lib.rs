//! Convex brush geometry: planes, solid reconstruction and texture projection.
//!
//! A brush is the intersection of the inner half-spaces of its face planes. This crate
//! turns those planes back into vertices and ordered face polygons, and computes texture
//! coordinates for the polygon corners.

pub mod brush;
pub mod error;
pub mod geometry;
pub mod solid;
pub mod uv;

use serde::{Deserialize, Serialize};

pub use brush::{Brush, FaceDescriptor, TextureProjection};
pub use error::GeometryError;
pub use geometry::{Plane, Point2d, Point3d, Vec3};
pub use solid::{build_solid, build_vertices, extract_face_polygon, BrushSolid, SolidFace};
pub use uv::{project, FaceProjector};

/// Numeric tolerances for brush reconstruction, in map units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    /// A point is inside a half-space when its signed distance is at most this.
    pub containment: f64,
    /// A vertex lies on a face plane when its absolute distance is at most this.
    pub coplanarity: f64,
    /// Vertices closer than this squared distance are the same vertex.
    pub vertex_merge_sq: f64,
    /// Plane triples whose normal determinant is below this are skipped as parallel.
    pub determinant: f64,
    /// Face points whose cross product is shorter than this are collinear.
    pub degenerate: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            containment: 1e-3,
            coplanarity: 1e-3,
            vertex_merge_sq: f32::EPSILON as f64,
            determinant: 1e-6,
            degenerate: 1e-9,
        }
    }
}

impl Tolerance {
    /// Looser thresholds for hand-edited levels with off-grid vertices.
    pub fn lenient() -> Self {
        Self {
            containment: 1e-2,
            coplanarity: 1e-2,
            vertex_merge_sq: 1e-4,
            ..Self::default()
        }
    }

    pub fn is_inside(&self, signed_distance: f64) -> bool {
        signed_distance <= self.containment
    }

    pub fn is_on_plane(&self, signed_distance: f64) -> bool {
        signed_distance.abs() <= self.coplanarity
    }

    pub fn points_coincident(&self, a: &Point3d, b: &Point3d) -> bool {
        a.distance_squared_to(b) < self.vertex_merge_sq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_containment_sign_convention() {
        let tol = Tolerance::default();
        assert!(tol.is_inside(-10.0));
        assert!(tol.is_inside(0.0));
        assert!(tol.is_inside(0.0005));
        assert!(!tol.is_inside(0.01));
    }

    #[test]
    fn test_coincident_points() {
        let tol = Tolerance::default();
        let a = Point3d::new(1.0, 2.0, 3.0);
        assert!(tol.points_coincident(&a, &Point3d::new(1.0, 2.0, 3.0001)));
        assert!(!tol.points_coincident(&a, &Point3d::new(1.0, 2.0, 3.01)));
    }

    #[test]
    fn test_lenient_keeps_solver_thresholds() {
        let lenient = Tolerance::lenient();
        let default = Tolerance::default();
        assert!(lenient.containment > default.containment);
        assert_eq!(lenient.determinant, default.determinant);
        assert_eq!(lenient.degenerate, default.degenerate);
    }
}
