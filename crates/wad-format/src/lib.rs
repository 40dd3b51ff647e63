//! Reader and writer for WAD2/WAD3 texture archives.
//!
//! [`WadArchive`] parses the directory of an in-memory archive and extracts the
//! full-resolution mip level of miptexture entries as an [`IndexedBitmap`].
//! [`decode`] turns a bitmap into RGBA following the per-dialect alpha rules.

pub mod archive;
pub mod errors;
pub mod palette;
mod reader;
pub mod writer;

pub use archive::{embedded_palette_offset, DirectoryEntry, IndexedBitmap, WadArchive, WadDialect, WadHeader};
pub use errors::{ArchiveError, PaletteError};
pub use palette::{decode, AlphaMode, DecodedTexture, Palette};
pub use reader::NAME_LEN;
pub use writer::WadWriter;
