//! Reconstruction of a convex solid from its bounding planes.
//!
//! Every corner of a convex brush is the meeting point of (at least) three of its planes,
//! so the corners are found by intersecting all plane triples and keeping the points that
//! lie inside every half-space. Each face polygon is then the subset of corners lying on
//! that face's plane, ordered by angle around their centroid.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::GeometryError;
use crate::geometry::{Plane, Point2d, Point3d};
use crate::Tolerance;

/// One polygon of a reconstructed brush.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolidFace {
    /// Index of the plane (and face descriptor) this polygon lies on.
    pub descriptor_index: usize,
    /// Corners wound counter-clockwise around the plane normal.
    pub polygon: Vec<Point3d>,
}

/// Output of [`build_solid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrushSolid {
    pub vertices: Vec<Point3d>,
    pub faces: Vec<SolidFace>,
    /// Planes that did not yield a polygon, by index.
    pub rejected: Vec<(usize, GeometryError)>,
}

/// Point shared by three planes, or `None` when two of them are (nearly) parallel.
pub fn intersect_planes(a: &Plane, b: &Plane, c: &Plane, min_determinant: f64) -> Option<Point3d> {
    let denom = a.normal.triple(&b.normal, &c.normal);
    if denom.abs() < min_determinant {
        return None;
    }
    let bc = b.normal.cross(&c.normal);
    let ca = c.normal.cross(&a.normal);
    let ab = a.normal.cross(&b.normal);
    let p = (bc * -a.distance + ca * -b.distance + ab * -c.distance) / denom;
    Some(Point3d::from_vec3(p))
}

/// Corners of the convex region bounded by `planes`.
#[instrument(skip_all, fields(planes = planes.len()))]
pub fn build_vertices(planes: &[Plane], tol: &Tolerance) -> Result<Vec<Point3d>, GeometryError> {
    let n = planes.len();
    let mut vertices: Vec<Point3d> = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                let Some(p) = intersect_planes(&planes[i], &planes[j], &planes[k], tol.determinant)
                else {
                    continue;
                };
                if !planes.iter().all(|plane| tol.is_inside(plane.signed_distance(&p))) {
                    continue;
                }
                if vertices.iter().any(|v| tol.points_coincident(v, &p)) {
                    continue;
                }
                vertices.push(p);
            }
        }
    }

    if vertices.is_empty() {
        return Err(GeometryError::EmptySolid { planes: n });
    }
    debug!(vertices = vertices.len(), "intersected brush planes");
    Ok(vertices)
}

/// The vertices lying on `plane`, wound counter-clockwise around its normal.
pub fn extract_face_polygon(
    plane: &Plane,
    vertices: &[Point3d],
    tol: &Tolerance,
) -> Result<Vec<Point3d>, GeometryError> {
    let on_plane: Vec<Point3d> = vertices
        .iter()
        .filter(|v| tol.is_on_plane(plane.signed_distance(v)))
        .copied()
        .collect();
    if on_plane.len() < 3 {
        return Err(GeometryError::FaceDegenerate {
            vertices: on_plane.len(),
        });
    }

    let basis = plane.basis();
    let projected: Vec<Point2d> = on_plane.iter().map(|p| plane.project_2d(p, &basis)).collect();
    let center = Point2d::centroid(&projected);

    let mut ordered: Vec<(f64, Point3d)> = projected
        .iter()
        .zip(on_plane)
        .map(|(p2, p3)| (p2.angle_around(&center), p3))
        .collect();
    ordered.sort_by(|a, b| a.0.total_cmp(&b.0));

    Ok(ordered.into_iter().map(|(_, p)| p).collect())
}

/// Vertices and face polygons of the brush bounded by `planes`.
///
/// Fails only when no vertex exists at all; individual planes that do not form a
/// polygon are listed in [`BrushSolid::rejected`].
#[instrument(skip_all, fields(planes = planes.len()))]
pub fn build_solid(planes: &[Plane], tol: &Tolerance) -> Result<BrushSolid, GeometryError> {
    let vertices = build_vertices(planes, tol)?;
    let mut faces = Vec::with_capacity(planes.len());
    let mut rejected = Vec::new();

    for (index, plane) in planes.iter().enumerate() {
        match extract_face_polygon(plane, &vertices, tol) {
            Ok(polygon) => faces.push(SolidFace {
                descriptor_index: index,
                polygon,
            }),
            Err(e) => {
                debug!(face = index, error = %e, "face has no polygon");
                rejected.push((index, e));
            }
        }
    }

    Ok(BrushSolid {
        vertices,
        faces,
        rejected,
    })
}
