use wad_format::{ArchiveError, PaletteError};

/// Errors that abort a compilation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("texture archive is unusable: {0}")]
    Archive(#[from] ArchiveError),
}

/// Errors while loading a [`CompileConfig`](crate::CompileConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Why a texture could not be produced. Cached alongside successful decodes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TextureError {
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Palette(#[from] PaletteError),
}

