//! Texture coordinates for brush faces.

use crate::brush::{FaceDescriptor, TextureProjection};
use crate::geometry::{Point3d, Vec3};

/// Per-face texture mapping, computed once and shared by every corner of the face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceProjector {
    s_axis: Vec3,
    t_axis: Vec3,
    offset: [f64; 2],
    scale: [f64; 2],
    offset_order: OffsetOrder,
}

/// Whether the face offset is in texels or in world units along the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OffsetOrder {
    /// `p . axis / scale + offset`
    AfterScale,
    /// `(p . axis + offset) / scale`
    BeforeScale,
}

impl FaceProjector {
    pub fn new(face: &FaceDescriptor) -> Self {
        match face.projection {
            TextureProjection::AxisProjected {
                offset,
                rotation,
                scale,
            } => {
                let (u, v) = face.plane.basis();
                let (sin, cos) = rotation.to_radians().sin_cos();
                Self {
                    s_axis: u * cos - v * sin,
                    t_axis: u * sin + v * cos,
                    offset,
                    scale: effective_scale(scale),
                    offset_order: OffsetOrder::AfterScale,
                }
            }
            TextureProjection::ExplicitAxis {
                u_axis,
                u_offset,
                v_axis,
                v_offset,
                scale,
            } => Self {
                s_axis: u_axis,
                t_axis: v_axis,
                offset: [u_offset, v_offset],
                scale: effective_scale(scale),
                offset_order: OffsetOrder::BeforeScale,
            },
        }
    }

    /// Texture-space position of `p`, in texels.
    pub fn texel(&self, p: &Point3d) -> (f64, f64) {
        let pv = p.to_vec3();
        let (s, t) = (pv.dot(&self.s_axis), pv.dot(&self.t_axis));
        match self.offset_order {
            OffsetOrder::AfterScale => (s / self.scale[0] + self.offset[0], t / self.scale[1] + self.offset[1]),
            OffsetOrder::BeforeScale => ((s + self.offset[0]) / self.scale[0], (t + self.offset[1]) / self.scale[1]),
        }
    }

    /// Texture coordinates of `p` normalized by the texture size.
    pub fn project(&self, p: &Point3d, width: u32, height: u32) -> (f64, f64) {
        let (s, t) = self.texel(p);
        (s / width.max(1) as f64, t / height.max(1) as f64)
    }
}

/// Texture coordinates of `vertex` on `face` for a `width` x `height` texture.
pub fn project(vertex: &Point3d, face: &FaceDescriptor, width: u32, height: u32) -> (f64, f64) {
    FaceProjector::new(face).project(vertex, width, height)
}

// Editors write a zero scale to mean "unscaled".
fn effective_scale(scale: [f64; 2]) -> [f64; 2] {
    scale.map(|s| if s == 0.0 { 1.0 } else { s })
}
