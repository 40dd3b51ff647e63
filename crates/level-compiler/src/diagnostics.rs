//! Structured record of everything skipped during a compilation.

use std::fmt;

use brush_kernel::GeometryError;
use map_format::{FaceParseError, ParseIssue};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::TextureError;

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// A whole brush was lost.
    Error,
    /// A single face was lost.
    Warning,
}

/// Classification of a skipped unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// A face line did not match the document's grammar.
    FaceParse,
    /// A face line's points are collinear.
    DegeneratePlane,
    /// Fewer than four valid faces in a brush.
    DegenerateBrush,
    /// No plane triple of a brush met inside all of its half-spaces.
    EmptySolid,
    /// A face plane touches the solid in fewer than three vertices.
    FaceDegenerate,
    TextureNotFound,
    /// A directory entry matched by name is not a miptexture.
    WrongEntryType,
    /// No palette was available for a shared-palette texture.
    MissingPalette,
}

impl DiagnosticCode {
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticCode::DegenerateBrush | DiagnosticCode::EmptySolid => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One skipped unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    /// Ordinal of the brush in document order.
    pub brush: Option<usize>,
    /// Index of the face within its brush.
    pub face: Option<usize>,
    /// 1-based source line.
    pub line: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.severity(),
            brush: None,
            face: None,
            line: None,
            message: message.into(),
        }
    }

    pub fn at_brush(mut self, brush: usize, line: usize) -> Self {
        self.brush = Some(brush);
        self.line = Some(line);
        self
    }

    pub fn at_face(mut self, face: usize) -> Self {
        self.face = Some(face);
        self
    }

    pub fn from_parse_issue(issue: &ParseIssue) -> Self {
        let code = match issue {
            ParseIssue::Face {
                error: FaceParseError::Grammar { .. },
                ..
            } => DiagnosticCode::FaceParse,
            ParseIssue::Face {
                error: FaceParseError::DegeneratePlane,
                ..
            } => DiagnosticCode::DegeneratePlane,
            ParseIssue::DegenerateBrush { .. } => DiagnosticCode::DegenerateBrush,
        };
        let message = match issue {
            ParseIssue::Face { error, .. } => error.to_string(),
            ParseIssue::DegenerateBrush { faces, .. } => {
                format!("only {faces} valid faces, a solid needs at least 4")
            }
        };
        Self::new(code, message).at_brush(issue.brush(), issue.line())
    }

    pub fn from_geometry(error: &GeometryError) -> Self {
        let code = match error {
            GeometryError::EmptySolid { .. } => DiagnosticCode::EmptySolid,
            GeometryError::FaceDegenerate { .. } => DiagnosticCode::FaceDegenerate,
        };
        Self::new(code, error.to_string())
    }

    /// Diagnostic for a recoverable texture failure.
    pub fn from_texture(texture: &str, error: &TextureError) -> Self {
        use wad_format::{ArchiveError, PaletteError};
        let code = match error {
            TextureError::Archive(ArchiveError::WrongEntryType { .. }) => DiagnosticCode::WrongEntryType,
            TextureError::Palette(PaletteError::MissingPalette { .. }) => DiagnosticCode::MissingPalette,
            _ => DiagnosticCode::TextureNotFound,
        };
        Self::new(code, format!("texture `{texture}`: {error}"))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sev = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN",
        };
        write!(f, "[{sev}]")?;
        if let Some(brush) = self.brush {
            write!(f, " brush {brush}")?;
        }
        if let Some(face) = self.face {
            write!(f, " face {face}")?;
        }
        if let Some(line) = self.line {
            write!(f, " (line {line})")?;
        }
        write!(f, ": {} (code: {})", self.message, self.code)
    }
}

/// All diagnostics of a compilation, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and emit it as a warning event.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        warn!(
            code = %diagnostic.code,
            brush = diagnostic.brush,
            face = diagnostic.face,
            line = diagnostic.line,
            "{}",
            diagnostic.message
        );
        self.items.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Filter by code.
    pub fn errors_of(&self, code: DiagnosticCode) -> Vec<&Diagnostic> {
        self.items.iter().filter(|d| d.code == code).collect()
    }

    pub fn no_errors_of(&self, code: DiagnosticCode) -> bool {
        !self.items.iter().any(|d| d.code == code)
    }

    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|d| d.severity == Severity::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.items.iter().filter(|d| d.severity == Severity::Warning).count()
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        for d in iter {
            self.push(d);
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Diagnostics: errors={}, warnings={}",
            self.error_count(),
            self.warning_count()
        )?;
        for d in &self.items {
            writeln!(f, "  {d}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use map_format::MapDialect;

    #[test]
    fn test_parse_issue_conversion() {
        let issue = ParseIssue::Face {
            brush: 3,
            line: 40,
            error: FaceParseError::Grammar {
                dialect: MapDialect::ExplicitAxis,
                text: "( 1".into(),
            },
        };
        let d = Diagnostic::from_parse_issue(&issue);
        assert_eq!(d.code, DiagnosticCode::FaceParse);
        assert_eq!(d.severity, Severity::Warning);
        assert_eq!((d.brush, d.line, d.face), (Some(3), Some(40), None));

        let brush = ParseIssue::DegenerateBrush {
            brush: 1,
            line: 9,
            faces: 3,
        };
        let d = Diagnostic::from_parse_issue(&brush);
        assert_eq!(d.code, DiagnosticCode::DegenerateBrush);
        assert_eq!(d.severity, Severity::Error);
    }

    #[test]
    fn test_texture_codes() {
        use wad_format::{ArchiveError, PaletteError};
        let missing = TextureError::Archive(ArchiveError::TextureNotFound("x".into()));
        assert_eq!(Diagnostic::from_texture("x", &missing).code, DiagnosticCode::TextureNotFound);
        let wrong = TextureError::Archive(ArchiveError::WrongEntryType {
            name: "x".into(),
            found: 0x42,
            expected: 0x43,
        });
        assert_eq!(Diagnostic::from_texture("x", &wrong).code, DiagnosticCode::WrongEntryType);
        let palette = TextureError::Palette(PaletteError::MissingPalette { texture: "x".into() });
        assert_eq!(Diagnostic::from_texture("x", &palette).code, DiagnosticCode::MissingPalette);
    }

    #[test]
    fn test_counts_and_display() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::new(DiagnosticCode::EmptySolid, "no vertices").at_brush(0, 5));
        diags.push(
            Diagnostic::new(DiagnosticCode::FaceDegenerate, "2 vertices")
                .at_brush(1, 12)
                .at_face(4),
        );
        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.warning_count(), 1);
        assert_eq!(diags.errors_of(DiagnosticCode::FaceDegenerate).len(), 1);
        assert!(diags.no_errors_of(DiagnosticCode::TextureNotFound));

        let text = diags.to_string();
        assert!(text.starts_with("Diagnostics: errors=1, warnings=1"));
        assert!(text.contains("[WARN] brush 1 face 4 (line 12): 2 vertices (code: FaceDegenerate)"));
    }
}
