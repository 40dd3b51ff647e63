use brush_kernel::{Brush, Point3d, Tolerance};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::blocks::{split_blocks, Block, BlockKind};
use crate::entity::{split_wad_names, Entity, SPAWN_CLASSNAMES};
use crate::errors::ParseIssue;
use crate::grammar::parse_face_line;
use crate::MapDialect;

/// Everything read from one level document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedLevel {
    pub dialect: MapDialect,
    /// Brushes with at least four valid faces, in document order.
    pub brushes: Vec<Brush>,
    pub entities: Vec<Entity>,
    pub spawn_origin: Option<Point3d>,
    /// Companion archive file names from the first `"wad"` property.
    pub wad_names: Vec<String>,
    #[serde(skip)]
    pub issues: Vec<ParseIssue>,
}

/// Parse with default tolerances.
pub fn parse_level(text: &str) -> ParsedLevel {
    parse_level_with(text, &Tolerance::default())
}

/// Parse a level document. Never fails; skipped lines and brushes are listed in `issues`.
#[instrument(skip_all, fields(len = text.len()))]
pub fn parse_level_with(text: &str, tolerance: &Tolerance) -> ParsedLevel {
    let dialect = MapDialect::detect(text);
    let mut level = ParsedLevel {
        dialect,
        brushes: Vec::new(),
        entities: Vec::new(),
        spawn_origin: None,
        wad_names: Vec::new(),
        issues: Vec::new(),
    };

    let mut ordinal = 0;
    let mut wad_seen = false;
    for block in split_blocks(text) {
        match block.kind() {
            BlockKind::Entity => {
                let entity = Entity::from_block(&block);
                if level.spawn_origin.is_none() && SPAWN_CLASSNAMES.iter().any(|c| block.contains(c)) {
                    level.spawn_origin = entity.origin();
                }
                if !wad_seen {
                    if let Some(value) = entity.get("wad") {
                        level.wad_names = split_wad_names(value);
                        wad_seen = true;
                    }
                }
                level.entities.push(entity);
            }
            BlockKind::Brush => {
                if let Some(brush) = parse_brush(&block, ordinal, dialect, tolerance, &mut level.issues) {
                    level.brushes.push(brush);
                }
                ordinal += 1;
            }
            BlockKind::Other => debug!(line = block.line, "skipping unrecognized block"),
        }
    }

    info!(
        ?dialect,
        brushes = level.brushes.len(),
        entities = level.entities.len(),
        issues = level.issues.len(),
        "parsed level"
    );
    level
}

fn parse_brush(
    block: &Block<'_>,
    ordinal: usize,
    dialect: MapDialect,
    tolerance: &Tolerance,
    issues: &mut Vec<ParseIssue>,
) -> Option<Brush> {
    let mut faces = Vec::new();
    for &(line, text) in block.lines.iter().filter(|(_, t)| t.starts_with('(')) {
        match parse_face_line(text, dialect, tolerance) {
            Ok(face) => faces.push(face),
            Err(error) => {
                debug!(brush = ordinal, line, %error, "dropping face line");
                issues.push(ParseIssue::Face {
                    brush: ordinal,
                    line,
                    error,
                });
            }
        }
    }

    if faces.len() < Brush::MIN_FACES {
        debug!(brush = ordinal, faces = faces.len(), "dropping degenerate brush");
        issues.push(ParseIssue::DegenerateBrush {
            brush: ordinal,
            line: block.line,
            faces: faces.len(),
        });
        return None;
    }
    Some(Brush {
        ordinal,
        line: block.line,
        faces,
    })
}
