//! Parser for brush-based `.map` level text.
//!
//! Handles both the axis-projected dialect and the Valve 220 dialect with explicit
//! texture axes. Face lines become [`FaceDescriptor`](brush_kernel::FaceDescriptor)s
//! grouped into [`Brush`](brush_kernel::Brush)es; entity blocks are kept as key/value
//! lists.

pub mod blocks;
pub mod entity;
pub mod errors;
pub mod grammar;
pub mod parse;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use entity::{parse_origin, split_wad_names, Entity};
pub use errors::{FaceParseError, ParseIssue};
pub use grammar::{parse_face_line, parse_property_line};
pub use parse::{parse_level, parse_level_with, ParsedLevel};

/// Face-line grammar of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapDialect {
    /// `( p ) ( p ) ( p ) tex xoff yoff rot xscale yscale`
    AxisProjected,
    /// `( p ) ( p ) ( p ) tex [ ux uy uz uoff ] [ vx vy vz voff ] rot xscale yscale`
    ExplicitAxis,
}

impl MapDialect {
    /// Any `[` in the document selects explicit axes for every face.
    pub fn detect(text: &str) -> Self {
        if text.contains('[') {
            MapDialect::ExplicitAxis
        } else {
            MapDialect::AxisProjected
        }
    }
}

impl fmt::Display for MapDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapDialect::AxisProjected => write!(f, "axis-projected"),
            MapDialect::ExplicitAxis => write!(f, "explicit-axis"),
        }
    }
}
