//! Property-based tests for brush reconstruction invariants using the `proptest` crate.

use proptest::prelude::*;

use brush_kernel::geometry::{Plane, Point3d, Vec3};
use brush_kernel::{build_solid, build_vertices, FaceDescriptor, FaceProjector, TextureProjection, Tolerance};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Arbitrary corner on the editor grid range.
fn arb_point() -> impl Strategy<Value = (f64, f64, f64)> {
    (-4096.0f64..4096.0, -4096.0f64..4096.0, -4096.0f64..4096.0)
}

/// Arbitrary brush extent (avoids slivers thinner than the merge tolerance).
fn arb_positive_dim() -> impl Strategy<Value = f64> {
    1.0f64..1024.0
}

/// Arbitrary direction, rejected when too short to normalize.
fn arb_direction() -> impl Strategy<Value = Vec3> {
    (-1.0f64..1.0, -1.0f64..1.0, -1.0f64..1.0)
        .prop_map(|(x, y, z)| Vec3::new(x, y, z))
        .prop_filter("direction too short", |v| v.length() > 0.1)
}

fn box_planes(min: Point3d, max: Point3d) -> Vec<Plane> {
    vec![
        Plane { normal: -Vec3::X, distance: min.x },
        Plane { normal: Vec3::X, distance: -max.x },
        Plane { normal: -Vec3::Y, distance: min.y },
        Plane { normal: Vec3::Y, distance: -max.y },
        Plane { normal: -Vec3::Z, distance: min.z },
        Plane { normal: Vec3::Z, distance: -max.z },
    ]
}

// ---------------------------------------------------------------------------
// 1. Axis-aligned boxes: 8 vertices, 6 quads
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn box_has_eight_vertices_and_six_quads(
        (ox, oy, oz) in arb_point(),
        dx in arb_positive_dim(),
        dy in arb_positive_dim(),
        dz in arb_positive_dim(),
    ) {
        let tol = Tolerance::default();
        let planes = box_planes(Point3d::new(ox, oy, oz), Point3d::new(ox + dx, oy + dy, oz + dz));
        let solid = build_solid(&planes, &tol).unwrap();

        prop_assert_eq!(solid.vertices.len(), 8, "expected 8 vertices, got {}", solid.vertices.len());
        prop_assert_eq!(solid.faces.len(), 6, "expected 6 faces, got {}", solid.faces.len());
        for face in &solid.faces {
            prop_assert_eq!(face.polygon.len(), 4);
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Cutting a box through its center: every vertex inside, cut face is a polygon
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn cut_box_vertices_stay_inside(
        (ox, oy, oz) in arb_point(),
        d in 16.0f64..512.0,
        dir in arb_direction(),
    ) {
        let tol = Tolerance::default();
        let min = Point3d::new(ox, oy, oz);
        let max = Point3d::new(ox + d, oy + d, oz + d);
        let center = Point3d::new(ox + d / 2.0, oy + d / 2.0, oz + d / 2.0);

        let mut planes = box_planes(min, max);
        let normal = dir.normalized(1e-9).unwrap();
        planes.push(Plane { normal, distance: -normal.dot(&center.to_vec3()) });

        let vertices = build_vertices(&planes, &tol).unwrap();
        for v in &vertices {
            for (i, plane) in planes.iter().enumerate() {
                let dist = plane.signed_distance(v);
                prop_assert!(dist <= tol.containment,
                    "vertex {:?} is {} outside plane {}", v, dist, i);
            }
        }

        let solid = build_solid(&planes, &tol).unwrap();
        let cut = solid.faces.iter().find(|f| f.descriptor_index == 6);
        prop_assert!(cut.is_some(), "cut plane produced no polygon");
        prop_assert!(cut.unwrap().polygon.len() >= 3);
    }
}

// ---------------------------------------------------------------------------
// 3. No two accepted vertices coincide
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn vertices_are_distinct(
        (ox, oy, oz) in arb_point(),
        d in 16.0f64..512.0,
        dir in arb_direction(),
    ) {
        let tol = Tolerance::default();
        let center = Point3d::new(ox + d / 2.0, oy + d / 2.0, oz + d / 2.0);
        let mut planes = box_planes(Point3d::new(ox, oy, oz), Point3d::new(ox + d, oy + d, oz + d));
        let normal = dir.normalized(1e-9).unwrap();
        planes.push(Plane { normal, distance: -normal.dot(&center.to_vec3()) });

        let vertices = build_vertices(&planes, &tol).unwrap();
        for i in 0..vertices.len() {
            for j in (i + 1)..vertices.len() {
                prop_assert!(!tol.points_coincident(&vertices[i], &vertices[j]),
                    "vertices {} and {} coincide: {:?}", i, j, vertices[i]);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// 4. UV projection is a pure function of vertex and face
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn uv_projection_idempotent(
        (px, py, pz) in arb_point(),
        rotation in -360.0f64..360.0,
        sx in 0.1f64..4.0,
        sy in 0.1f64..4.0,
        dir in arb_direction(),
    ) {
        let normal = dir.normalized(1e-9).unwrap();
        let face = FaceDescriptor {
            points: [Point3d::ORIGIN; 3],
            plane: Plane { normal, distance: 0.0 },
            texture: "rock".to_string(),
            projection: TextureProjection::AxisProjected {
                offset: [4.0, -8.0],
                rotation,
                scale: [sx, sy],
            },
        };
        let p = Point3d::new(px, py, pz);
        let a = FaceProjector::new(&face).project(&p, 128, 64);
        let b = FaceProjector::new(&face).project(&p, 128, 64);
        prop_assert_eq!(a, b);
    }
}
