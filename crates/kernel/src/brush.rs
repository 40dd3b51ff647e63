use serde::{Deserialize, Serialize};

use crate::geometry::{Plane, Point3d, Vec3};

/// How texture coordinates are derived for a face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TextureProjection {
    /// Basis derived from the face normal, then rotated, scaled and offset.
    AxisProjected {
        offset: [f64; 2],
        /// Degrees.
        rotation: f64,
        scale: [f64; 2],
    },
    /// Texture axes stored explicitly with the face ("Valve 220").
    ExplicitAxis {
        u_axis: Vec3,
        u_offset: f64,
        v_axis: Vec3,
        v_offset: f64,
        scale: [f64; 2],
    },
}

/// One bounding plane of a brush with its surface description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceDescriptor {
    pub points: [Point3d; 3],
    pub plane: Plane,
    pub texture: String,
    pub projection: TextureProjection,
}

impl FaceDescriptor {
    /// Build a face from its three defining points; `None` if they are collinear.
    pub fn new(
        points: [Point3d; 3],
        texture: impl Into<String>,
        projection: TextureProjection,
        min_area: f64,
    ) -> Option<Self> {
        let plane = Plane::from_points(points[0], points[1], points[2], min_area)?;
        Some(Self {
            points,
            plane,
            texture: texture.into(),
            projection,
        })
    }
}

/// A convex solid described by its bounding faces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    /// Position of the brush in document order, counting every brush block.
    pub ordinal: usize,
    /// 1-based line of the opening brace.
    pub line: usize,
    pub faces: Vec<FaceDescriptor>,
}

impl Brush {
    /// Fewest faces that can enclose a finite volume.
    pub const MIN_FACES: usize = 4;

    pub fn planes(&self) -> Vec<Plane> {
        self.faces.iter().map(|f| f.plane).collect()
    }
}
