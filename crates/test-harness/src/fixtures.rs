//! Synthetic level texts and texture archives.

use brush_kernel::Point3d;
use wad_format::palette::PALETTE_BYTES;
use wad_format::{Palette, WadArchive, WadDialect, WadWriter};

use crate::helpers::HarnessError;

// ── Level Text ──────────────────────────────────────────────────────────────

fn fmt_point(p: [f64; 3]) -> String {
    format!("( {} {} {} )", p[0], p[1], p[2])
}

/// The six faces of an axis-aligned box, each as three points whose winding gives an
/// outward normal, in the order -X, -Y, -Z, +Z, +Y, +X.
pub fn box_face_points(min: Point3d, max: Point3d) -> [[[f64; 3]; 3]; 6] {
    let (a, b) = (min, max);
    [
        [[a.x, a.y, a.z], [a.x, a.y + 1.0, a.z], [a.x, a.y, a.z + 1.0]],
        [[a.x, a.y, a.z], [a.x, a.y, a.z + 1.0], [a.x + 1.0, a.y, a.z]],
        [[a.x, a.y, a.z], [a.x + 1.0, a.y, a.z], [a.x, a.y + 1.0, a.z]],
        [[b.x, b.y, b.z], [b.x, b.y + 1.0, b.z], [b.x + 1.0, b.y, b.z]],
        [[b.x, b.y, b.z], [b.x + 1.0, b.y, b.z], [b.x, b.y, b.z + 1.0]],
        [[b.x, b.y, b.z], [b.x, b.y, b.z + 1.0], [b.x, b.y + 1.0, b.z]],
    ]
}

/// Face lines of an axis-projected box brush, without braces.
pub fn box_face_lines(min: Point3d, max: Point3d, textures: [&str; 6]) -> Vec<String> {
    box_face_points(min, max)
        .iter()
        .zip(textures)
        .map(|(pts, tex)| {
            format!(
                "{} {} {} {} 0 0 0 1 1",
                fmt_point(pts[0]),
                fmt_point(pts[1]),
                fmt_point(pts[2]),
                tex
            )
        })
        .collect()
}

/// An axis-projected box brush block with one texture on every face.
pub fn box_brush(min: Point3d, max: Point3d, texture: &str) -> String {
    brush_block(&box_face_lines(min, max, [texture; 6]))
}

/// A Valve 220 box brush block with world-aligned texture axes.
pub fn box_brush_valve(min: Point3d, max: Point3d, texture: &str) -> String {
    const AXES: [&str; 6] = [
        "[ 0 -1 0 0 ] [ 0 0 -1 0 ]",
        "[ 1 0 0 0 ] [ 0 0 -1 0 ]",
        "[ -1 0 0 0 ] [ 0 -1 0 0 ]",
        "[ 1 0 0 0 ] [ 0 -1 0 0 ]",
        "[ -1 0 0 0 ] [ 0 0 -1 0 ]",
        "[ 0 1 0 0 ] [ 0 0 -1 0 ]",
    ];
    let lines: Vec<String> = box_face_points(min, max)
        .iter()
        .zip(AXES)
        .map(|(pts, axes)| {
            format!(
                "{} {} {} {} {} 0 1 1",
                fmt_point(pts[0]),
                fmt_point(pts[1]),
                fmt_point(pts[2]),
                texture,
                axes
            )
        })
        .collect();
    brush_block(&lines)
}

/// Wrap face lines in braces.
pub fn brush_block(lines: &[String]) -> String {
    let mut out = String::from("{\n");
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("}\n");
    out
}

/// Builds a complete level document: a worldspawn holding brushes, then point entities.
#[derive(Debug, Clone, Default)]
pub struct LevelBuilder {
    wad: Option<String>,
    brushes: Vec<String>,
    entities: Vec<(String, Option<Point3d>)>,
}

impl LevelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wad(mut self, value: &str) -> Self {
        self.wad = Some(value.to_string());
        self
    }

    pub fn brush(mut self, block: String) -> Self {
        self.brushes.push(block);
        self
    }

    pub fn entity(mut self, classname: &str, origin: Option<Point3d>) -> Self {
        self.entities.push((classname.to_string(), origin));
        self
    }

    pub fn build(&self) -> String {
        let mut out = String::from("// entity 0\n{\n\"classname\" \"worldspawn\"\n");
        if let Some(wad) = &self.wad {
            out.push_str(&format!("\"wad\" \"{}\"\n", wad));
        }
        for (i, brush) in self.brushes.iter().enumerate() {
            out.push_str(&format!("// brush {}\n", i));
            out.push_str(brush);
        }
        out.push_str("}\n");
        for (i, (classname, origin)) in self.entities.iter().enumerate() {
            out.push_str(&format!("// entity {}\n{{\n\"classname\" \"{}\"\n", i + 1, classname));
            if let Some(o) = origin {
                out.push_str(&format!("\"origin\" \"{} {} {}\"\n", o.x, o.y, o.z));
            }
            out.push_str("}\n");
        }
        out
    }
}

// ── Texture Archives ────────────────────────────────────────────────────────

/// Palette whose entry `i` is `(i, 255 - i, i / 2)`.
pub fn ramp_palette() -> Palette {
    let mut bytes = [0u8; PALETTE_BYTES];
    for (i, rgb) in bytes.chunks_exact_mut(3).enumerate() {
        let i = i as u8;
        rgb.copy_from_slice(&[i, 255 - i, i / 2]);
    }
    Palette::from_exact(&bytes)
}

/// `width * height` indices alternating between `a` and `b`.
pub fn checker_indices(width: u32, height: u32, a: u8, b: u8) -> Vec<u8> {
    (0..height)
        .flat_map(|y| (0..width).map(move |x| if (x + y) % 2 == 0 { a } else { b }))
        .collect()
}

/// An archive holding a `size` x `size` checker texture for each name.
///
/// WAD3 textures embed [`ramp_palette`]; WAD2 archives carry it as a palette lump.
pub fn checker_wad(dialect: WadDialect, names: &[&str], size: u32) -> Result<WadArchive, HarnessError> {
    let palette = ramp_palette();
    let mut writer = WadWriter::new(dialect);
    if dialect == WadDialect::Wad2 {
        writer.add_lump("palette", 0x40, &palette.to_bytes());
    }
    for (i, name) in names.iter().enumerate() {
        let indices = checker_indices(size, size, i as u8 + 1, 0xF0);
        writer.add_texture(name, size, size, &indices, Some(&palette));
    }
    let bytes = writer.to_bytes().map_err(|e| HarnessError::Fixture {
        reason: e.to_string(),
    })?;
    Ok(WadArchive::parse(bytes)?)
}
