use crate::MapDialect;

/// Why a single face line was dropped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FaceParseError {
    #[error("line does not match the {dialect} face grammar: `{text}`")]
    Grammar { dialect: MapDialect, text: String },

    #[error("face points are collinear")]
    DegeneratePlane,
}

/// A recoverable problem found while parsing; the affected unit is skipped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseIssue {
    #[error("brush {brush}, line {line}: {error}")]
    Face {
        brush: usize,
        line: usize,
        error: FaceParseError,
    },

    #[error("brush {brush}, line {line}: only {faces} valid faces, a solid needs at least 4")]
    DegenerateBrush { brush: usize, line: usize, faces: usize },
}

impl ParseIssue {
    pub fn brush(&self) -> usize {
        match self {
            ParseIssue::Face { brush, .. } | ParseIssue::DegenerateBrush { brush, .. } => *brush,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            ParseIssue::Face { line, .. } | ParseIssue::DegenerateBrush { line, .. } => *line,
        }
    }
}
