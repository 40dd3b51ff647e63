use serde::{Deserialize, Serialize};

use super::point::{Point2d, Point3d};
use super::vector::Vec3;

/// An oriented plane `normal . p + distance = 0`.
///
/// The normal is unit length and points out of the half-space it bounds, so a point is
/// inside when its signed distance is non-positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f64,
}

impl Plane {
    /// Plane through three points, with normal `(v0 - v1) x (v2 - v1)`.
    ///
    /// Returns `None` when the points are collinear, i.e. when the cross product is
    /// shorter than `min_area`.
    pub fn from_points(v0: Point3d, v1: Point3d, v2: Point3d, min_area: f64) -> Option<Self> {
        let normal = (v0 - v1).cross(&(v2 - v1)).normalized(min_area)?;
        Some(Self {
            normal,
            distance: -normal.dot(&v0.to_vec3()),
        })
    }

    /// Signed distance from the plane; positive on the side the normal points to.
    pub fn signed_distance(&self, p: &Point3d) -> f64 {
        self.normal.dot(&p.to_vec3()) + self.distance
    }

    /// Orthonormal tangent basis `(u, v)` with `u x v == normal`.
    ///
    /// `u` is the world X axis crossed with the normal, unless the normal is within
    /// ~25 degrees of X, in which case world Y is used instead.
    pub fn basis(&self) -> (Vec3, Vec3) {
        let reference = if self.normal.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
        let u = reference.cross(&self.normal);
        let u = u / u.length();
        let v = self.normal.cross(&u);
        (u, v)
    }

    /// Coordinates of `p` in the tangent basis.
    pub fn project_2d(&self, p: &Point3d, basis: &(Vec3, Vec3)) -> Point2d {
        let pv = p.to_vec3();
        Point2d::new(pv.dot(&basis.0), pv.dot(&basis.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN_AREA: f64 = 1e-9;

    #[test]
    fn test_from_points_orients_outward() {
        // Top face of a box as written by level editors.
        let plane = Plane::from_points(
            Point3d::new(64.0, 64.0, 16.0),
            Point3d::new(64.0, 65.0, 16.0),
            Point3d::new(65.0, 64.0, 16.0),
            MIN_AREA,
        )
        .unwrap();
        assert_eq!(plane.normal, Vec3::Z);
        assert_eq!(plane.distance, -16.0);
        assert!(plane.signed_distance(&Point3d::ORIGIN) < 0.0);
        assert!(plane.signed_distance(&Point3d::new(0.0, 0.0, 32.0)) > 0.0);
        assert_eq!(plane.signed_distance(&Point3d::new(-5.0, 9.0, 16.0)), 0.0);
    }

    #[test]
    fn test_swapped_winding_flips_normal() {
        let plane = Plane::from_points(
            Point3d::new(64.0, 64.0, 16.0),
            Point3d::new(65.0, 64.0, 16.0),
            Point3d::new(64.0, 65.0, 16.0),
            MIN_AREA,
        )
        .unwrap();
        assert_eq!(plane.normal, -Vec3::Z);
    }

    #[test]
    fn test_collinear_points_are_rejected() {
        let plane = Plane::from_points(
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(1.0, 1.0, 1.0),
            Point3d::new(2.0, 2.0, 2.0),
            MIN_AREA,
        );
        assert!(plane.is_none());
    }

    #[test]
    fn test_basis_is_right_handed() {
        for normal in [Vec3::X, -Vec3::X, Vec3::Y, Vec3::Z, -Vec3::Z] {
            let plane = Plane { normal, distance: 0.0 };
            let (u, v) = plane.basis();
            let n = u.cross(&v);
            assert!((n - normal).length() < 1e-12, "basis for {normal:?} gave {n:?}");
            assert!(u.dot(&normal).abs() < 1e-12);
            assert!(v.dot(&normal).abs() < 1e-12);
        }
    }

    #[test]
    fn test_basis_switches_reference_axis_near_x() {
        let plane = Plane { normal: Vec3::X, distance: 0.0 };
        let (u, v) = plane.basis();
        // Y x X = -Z, then X x -Z = Y.
        assert_eq!(u, -Vec3::Z);
        assert_eq!(v, Vec3::Y);

        let floor = Plane { normal: Vec3::Z, distance: 0.0 };
        let (u, v) = floor.basis();
        assert_eq!(u, -Vec3::Y);
        assert_eq!(v, Vec3::X);
    }
}
