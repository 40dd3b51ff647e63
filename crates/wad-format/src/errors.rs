/// Errors while reading a texture archive.
///
/// `BadMagic`, `Format` and `OutOfBounds` mean the archive itself is unusable.
/// `TextureNotFound` and `WrongEntryType` concern a single lookup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArchiveError {
    #[error("not a texture archive: magic {magic:?}")]
    BadMagic { magic: [u8; 4] },

    #[error("malformed archive: {0}")]
    Format(String),

    #[error("read of {len} bytes at offset {offset} runs past the end of a {size}-byte archive")]
    OutOfBounds { offset: u64, len: usize, size: usize },

    #[error("texture `{0}` not found in archive")]
    TextureNotFound(String),

    #[error("entry `{name}` has type {found:#04x}, expected miptexture {expected:#04x}")]
    WrongEntryType { name: String, found: u8, expected: u8 },
}

impl ArchiveError {
    /// Whether the error invalidates the whole archive rather than one lookup.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ArchiveError::BadMagic { .. } | ArchiveError::Format(_) | ArchiveError::OutOfBounds { .. }
        )
    }
}

/// Errors while expanding indexed pixels to RGBA.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PaletteError {
    #[error("palette needs 768 bytes, got {len}")]
    TooShort { len: usize },

    #[error("texture `{texture}` has no embedded palette and no shared palette was supplied")]
    MissingPalette { texture: String },
}
