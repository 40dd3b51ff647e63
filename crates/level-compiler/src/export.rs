//! Wavefront OBJ export of a compiled level.

use crate::compile::CompiledLevel;

/// Export every texture mesh as one OBJ document with a `usemtl` group per texture.
///
/// Face indices are 1-based and global, as OBJ requires; `v`, `vt` and `vn` share
/// one index per mesh vertex.
pub fn mesh_to_obj(level: &CompiledLevel) -> String {
    let vertices: usize = level.meshes.values().map(|m| m.vertex_count()).sum();
    let mut out = String::with_capacity(vertices * 96);
    out.push_str("# brush level export\n");

    let mut base = 1usize;
    for (texture, mesh) in &level.meshes {
        out.push_str(&format!("o {}\n", texture));
        for p in mesh.positions.chunks_exact(3) {
            out.push_str(&format!("v {} {} {}\n", p[0], p[1], p[2]));
        }
        // OBJ puts v = 0 at the bottom of the image.
        for uv in mesh.uvs.chunks_exact(2) {
            out.push_str(&format!("vt {} {}\n", uv[0], 1.0 - uv[1]));
        }
        for n in mesh.normals.chunks_exact(3) {
            out.push_str(&format!("vn {} {} {}\n", n[0], n[1], n[2]));
        }
        out.push_str(&format!("usemtl {}\n", texture));
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| base + i as usize);
            out.push_str(&format!("f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}\n"));
        }
        base += mesh.vertex_count();
    }
    out
}
