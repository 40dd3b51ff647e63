//! Helper functions: error type and mesh math.

use std::collections::HashSet;

use level_compiler::TriangleMesh;

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("fixture error: {reason}")]
    Fixture { reason: String },

    #[error(transparent)]
    Archive(#[from] wad_format::ArchiveError),

    #[error(transparent)]
    Compile(#[from] level_compiler::CompileError),
}

// ── Mesh Math Utilities ─────────────────────────────────────────────────────

fn corner(mesh: &TriangleMesh, index: u32) -> Option<[f64; 3]> {
    let i = index as usize * 3;
    let p = mesh.positions.get(i..i + 3)?;
    Some([p[0] as f64, p[1] as f64, p[2] as f64])
}

/// Signed volume enclosed by a closed mesh (divergence theorem).
///
/// Positive when triangles wind counter-clockwise seen from outside.
pub fn mesh_signed_volume<'a>(meshes: impl IntoIterator<Item = &'a TriangleMesh>) -> f64 {
    let mut volume = 0.0f64;
    for mesh in meshes {
        for tri in mesh.indices.chunks_exact(3) {
            let (Some(a), Some(b), Some(c)) = (corner(mesh, tri[0]), corner(mesh, tri[1]), corner(mesh, tri[2])) else {
                continue;
            };
            volume += a[0] * (b[1] * c[2] - c[1] * b[2])
                + b[0] * (c[1] * a[2] - a[1] * c[2])
                + c[0] * (a[1] * b[2] - b[1] * a[2]);
        }
    }
    volume / 6.0
}

/// Total triangle area.
pub fn mesh_surface_area(mesh: &TriangleMesh) -> f64 {
    let mut area = 0.0f64;
    for tri in mesh.indices.chunks_exact(3) {
        let (Some(a), Some(b), Some(c)) = (corner(mesh, tri[0]), corner(mesh, tri[1]), corner(mesh, tri[2])) else {
            continue;
        };
        let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let cx = u[1] * v[2] - u[2] * v[1];
        let cy = u[2] * v[0] - u[0] * v[2];
        let cz = u[0] * v[1] - u[1] * v[0];
        area += (cx * cx + cy * cy + cz * cz).sqrt() / 2.0;
    }
    area
}

/// Count distinct positions across meshes, after rounding to 1/1000 unit.
pub fn distinct_positions<'a>(meshes: impl IntoIterator<Item = &'a TriangleMesh>) -> usize {
    let mut seen: HashSet<[i64; 3]> = HashSet::new();
    for mesh in meshes {
        for p in mesh.positions.chunks_exact(3) {
            let key = [p[0], p[1], p[2]].map(|c| (c as f64 * 1000.0).round() as i64);
            seen.insert(key);
        }
    }
    seen.len()
}

/// Every triangle's winding agrees with its stored vertex normal.
pub fn triangles_face_their_normals(mesh: &TriangleMesh) -> bool {
    mesh.indices.chunks_exact(3).all(|tri| {
        let (Some(a), Some(b), Some(c)) = (corner(mesh, tri[0]), corner(mesh, tri[1]), corner(mesh, tri[2])) else {
            return false;
        };
        let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let cross = [
            u[1] * v[2] - u[2] * v[1],
            u[2] * v[0] - u[0] * v[2],
            u[0] * v[1] - u[1] * v[0],
        ];
        let n = tri[0] as usize * 3;
        let Some(normal) = mesh.normals.get(n..n + 3) else {
            return false;
        };
        cross[0] * normal[0] as f64 + cross[1] * normal[1] as f64 + cross[2] * normal[2] as f64 > 0.0
    })
}
