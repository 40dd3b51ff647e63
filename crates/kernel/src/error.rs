use serde::{Deserialize, Serialize};

/// Failures while reconstructing a brush. Both are local to one brush or face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum GeometryError {
    #[error("no vertex survived intersecting {planes} planes")]
    EmptySolid { planes: usize },

    #[error("face plane touches only {vertices} brush vertices")]
    FaceDegenerate { vertices: usize },
}
