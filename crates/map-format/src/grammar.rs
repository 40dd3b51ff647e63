//! The two face-line grammars and the entity property line.

use std::sync::OnceLock;

use brush_kernel::{FaceDescriptor, Point3d, TextureProjection, Tolerance, Vec3};
use regex::{Captures, Regex};

use crate::errors::FaceParseError;
use crate::MapDialect;

const NUM: &str = r"([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)";

static AXIS_PROJECTED: OnceLock<Option<Regex>> = OnceLock::new();
static EXPLICIT_AXIS: OnceLock<Option<Regex>> = OnceLock::new();
static PROPERTY: OnceLock<Option<Regex>> = OnceLock::new();

fn point() -> String {
    format!(r"\(\s*{NUM}\s+{NUM}\s+{NUM}\s*\)")
}

// Quake II appends content flags, surface flags and value.
fn trailer() -> &'static str {
    r"(?:\s+[-+]?\d+){0,3}\s*(?://.*)?$"
}

fn axis_projected_regex() -> Option<&'static Regex> {
    AXIS_PROJECTED
        .get_or_init(|| {
            let p = point();
            let pattern = format!(
                r"^{p}\s*{p}\s*{p}\s*(\S+)\s+{NUM}\s+{NUM}\s+{NUM}\s+{NUM}\s+{NUM}{}",
                trailer()
            );
            Regex::new(&pattern).ok()
        })
        .as_ref()
}

fn explicit_axis_regex() -> Option<&'static Regex> {
    EXPLICIT_AXIS
        .get_or_init(|| {
            let p = point();
            let axis = format!(r"\[\s*{NUM}\s+{NUM}\s+{NUM}\s+{NUM}\s*\]");
            let pattern = format!(
                r"^{p}\s*{p}\s*{p}\s*(\S+)\s*{axis}\s*{axis}\s*{NUM}\s+{NUM}\s+{NUM}{}",
                trailer()
            );
            Regex::new(&pattern).ok()
        })
        .as_ref()
}

fn property_regex() -> Option<&'static Regex> {
    PROPERTY
        .get_or_init(|| Regex::new(r#"^"([^"]*)"\s+"([^"]*)"\s*$"#).ok())
        .as_ref()
}

/// Numeric capture `i`; the grammar guarantees it parses.
fn num(caps: &Captures<'_>, i: usize) -> f64 {
    caps.get(i)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0.0)
}

fn vec3(caps: &Captures<'_>, first: usize) -> Vec3 {
    Vec3::new(num(caps, first), num(caps, first + 1), num(caps, first + 2))
}

fn points(caps: &Captures<'_>) -> [Point3d; 3] {
    [1, 4, 7].map(|i| Point3d::from_vec3(vec3(caps, i)))
}

/// Parse one brush face line of `dialect`.
pub fn parse_face_line(
    line: &str,
    dialect: MapDialect,
    tolerance: &Tolerance,
) -> Result<FaceDescriptor, FaceParseError> {
    let line = line.trim();
    let regex = match dialect {
        MapDialect::AxisProjected => axis_projected_regex(),
        MapDialect::ExplicitAxis => explicit_axis_regex(),
    };
    let caps = regex
        .and_then(|r| r.captures(line))
        .ok_or_else(|| FaceParseError::Grammar {
            dialect,
            text: line.to_string(),
        })?;

    let texture = caps.get(10).map_or("", |m| m.as_str());
    let projection = match dialect {
        MapDialect::AxisProjected => TextureProjection::AxisProjected {
            offset: [num(&caps, 11), num(&caps, 12)],
            rotation: num(&caps, 13),
            scale: [num(&caps, 14), num(&caps, 15)],
        },
        // Capture 19 is the rotation, which explicit axes already include.
        MapDialect::ExplicitAxis => TextureProjection::ExplicitAxis {
            u_axis: vec3(&caps, 11),
            u_offset: num(&caps, 14),
            v_axis: vec3(&caps, 15),
            v_offset: num(&caps, 18),
            scale: [num(&caps, 20), num(&caps, 21)],
        },
    };

    FaceDescriptor::new(points(&caps), texture, projection, tolerance.degenerate)
        .ok_or(FaceParseError::DegeneratePlane)
}

/// Split a `"key" "value"` line.
pub fn parse_property_line(line: &str) -> Option<(String, String)> {
    let caps = property_regex()?.captures(line.trim())?;
    Some((caps[1].to_string(), caps[2].to_string()))
}
