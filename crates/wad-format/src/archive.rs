//! Texture archive directory and miptexture records.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::errors::ArchiveError;
use crate::palette::{Palette, PALETTE_BYTES};
use crate::reader::ByteReader;

/// Size of a directory record.
pub const DIRECTORY_ENTRY_LEN: usize = 32;
/// Size of the miptexture header: name, width, height and four mip offsets.
pub const MIPTEX_HEADER_LEN: u64 = 40;
/// Number of mip levels stored per texture.
pub const MIP_LEVELS: u32 = 4;
/// Entry type of a raw 768-byte palette lump.
pub const PALETTE_LUMP_KIND: u8 = 0x40;

/// Archive flavour, selected by the magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WadDialect {
    /// Shared engine palette, tag `'D'`.
    Wad2,
    /// Per-texture embedded palette, tag `'C'`.
    Wad3,
}

impl WadDialect {
    pub fn from_magic(magic: [u8; 4]) -> Result<Self, ArchiveError> {
        match &magic {
            b"WAD2" => Ok(WadDialect::Wad2),
            b"WAD3" => Ok(WadDialect::Wad3),
            _ => Err(ArchiveError::BadMagic { magic }),
        }
    }

    pub fn magic(self) -> [u8; 4] {
        match self {
            WadDialect::Wad2 => *b"WAD2",
            WadDialect::Wad3 => *b"WAD3",
        }
    }

    /// Directory type tag of a miptexture in this dialect.
    pub fn miptex_kind(self) -> u8 {
        match self {
            WadDialect::Wad2 => 0x44,
            WadDialect::Wad3 => 0x43,
        }
    }

    pub fn has_embedded_palette(self) -> bool {
        matches!(self, WadDialect::Wad3)
    }
}

/// The 12-byte archive header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WadHeader {
    pub magic: [u8; 4],
    pub dialect: WadDialect,
    pub entry_count: u32,
    pub directory_offset: u32,
}

/// One 32-byte directory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub offset: u32,
    pub disk_size: i32,
    pub size: i32,
    pub kind: u8,
    pub compression: u8,
    pub padding: u16,
    pub name: String,
}

/// Full-resolution palette indices of one texture.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedBitmap {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// `width * height` bytes, row-major.
    pub indices: Vec<u8>,
    /// Present only in archives with embedded palettes.
    pub palette: Option<Palette>,
}

/// Offset of the palette that follows the mip chain of a texture at `base`.
///
/// Layout after the header: four mip levels, each a quarter of the previous, then
/// a 16-bit color count, then the palette.
pub fn embedded_palette_offset(base: u64, width: u32, height: u32) -> u64 {
    let mips: u64 = (0..MIP_LEVELS)
        .map(|k| u64::from(width >> k) * u64::from(height >> k))
        .sum();
    base + MIPTEX_HEADER_LEN + mips + 2
}

/// An opened archive. Owns its bytes; lookups borrow from it.
#[derive(Debug, Clone)]
pub struct WadArchive {
    data: Vec<u8>,
    header: WadHeader,
    entries: Vec<DirectoryEntry>,
}

impl WadArchive {
    /// Validate the header and read the whole directory.
    #[instrument(skip_all, fields(len = data.len()))]
    pub fn parse(data: Vec<u8>) -> Result<Self, ArchiveError> {
        let mut reader = ByteReader::at(&data, 0);
        let magic = reader.read_array::<4>()?;
        let dialect = WadDialect::from_magic(magic)?;
        let entry_count = non_negative(reader.read_i32()?, "directory entry count")?;
        let directory_offset = non_negative(reader.read_i32()?, "directory offset")?;

        reader.seek(u64::from(directory_offset));
        let mut entries = Vec::with_capacity((entry_count as usize).min(data.len() / DIRECTORY_ENTRY_LEN));
        for _ in 0..entry_count {
            entries.push(read_entry(&mut reader)?);
        }

        let header = WadHeader {
            magic,
            dialect,
            entry_count,
            directory_offset,
        };
        info!(?dialect, entries = entries.len(), "opened texture archive");
        Ok(Self {
            data,
            header,
            entries,
        })
    }

    pub fn from_slice(data: &[u8]) -> Result<Self, ArchiveError> {
        Self::parse(data.to_vec())
    }

    pub fn header(&self) -> &WadHeader {
        &self.header
    }

    pub fn dialect(&self) -> WadDialect {
        self.header.dialect
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    /// Names of all miptexture entries, in directory order.
    pub fn texture_names(&self) -> impl Iterator<Item = &str> + '_ {
        let kind = self.dialect().miptex_kind();
        self.entries
            .iter()
            .filter(move |e| e.kind == kind)
            .map(|e| e.name.as_str())
    }

    /// Last miptexture entry named `name`, compared ASCII case-insensitively.
    pub fn find_texture_by_name(&self, name: &str) -> Result<&DirectoryEntry, ArchiveError> {
        let kind = self.dialect().miptex_kind();
        let mut wrong_kind = None;
        for entry in self.entries.iter().rev() {
            if !entry.name.eq_ignore_ascii_case(name) {
                continue;
            }
            if entry.kind == kind {
                return Ok(entry);
            }
            wrong_kind.get_or_insert(entry.kind);
        }
        match wrong_kind {
            Some(found) => Err(ArchiveError::WrongEntryType {
                name: name.to_string(),
                found,
                expected: kind,
            }),
            None => Err(ArchiveError::TextureNotFound(name.to_string())),
        }
    }

    /// Read the full-resolution mip level (and embedded palette) of `entry`.
    #[instrument(skip_all, fields(texture = %entry.name))]
    pub fn extract_bitmap(&self, entry: &DirectoryEntry) -> Result<IndexedBitmap, ArchiveError> {
        let base = u64::from(entry.offset);
        let mut reader = ByteReader::at(&self.data, base);
        let name = reader.read_name()?;
        let width = positive(reader.read_i32()?, &name, "width")?;
        let height = positive(reader.read_i32()?, &name, "height")?;
        let mip0 = reader.read_i32()?;
        if mip0 < 0 {
            return Err(ArchiveError::Format(format!(
                "texture `{name}` has negative mip offset {mip0}"
            )));
        }

        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| ArchiveError::Format(format!("texture `{name}` is {width}x{height}")))?;
        reader.seek(base + mip0 as u64);
        let indices = reader.read_bytes(len)?.to_vec();

        let palette = if self.dialect().has_embedded_palette() {
            reader.seek(embedded_palette_offset(base, width, height));
            Some(Palette::from_exact(&reader.read_array::<PALETTE_BYTES>()?))
        } else {
            None
        };

        debug!(width, height, embedded_palette = palette.is_some(), "extracted bitmap");
        Ok(IndexedBitmap {
            name,
            width,
            height,
            indices,
            palette,
        })
    }

    /// Look up `name` and extract it in one step.
    pub fn bitmap(&self, name: &str) -> Result<IndexedBitmap, ArchiveError> {
        let entry = self.find_texture_by_name(name)?;
        self.extract_bitmap(entry)
    }

    /// The last raw palette lump, as carried by shared-palette archives.
    pub fn palette_lump(&self) -> Result<Option<Palette>, ArchiveError> {
        let Some(entry) = self.entries.iter().rev().find(|e| e.kind == PALETTE_LUMP_KIND) else {
            return Ok(None);
        };
        let mut reader = ByteReader::at(&self.data, u64::from(entry.offset));
        let bytes = reader.read_array::<PALETTE_BYTES>()?;
        Ok(Some(Palette::from_exact(&bytes)))
    }
}

fn read_entry(reader: &mut ByteReader<'_>) -> Result<DirectoryEntry, ArchiveError> {
    let offset = reader.read_i32()?;
    let disk_size = reader.read_i32()?;
    let size = reader.read_i32()?;
    let kind = reader.read_u8()?;
    let compression = reader.read_u8()?;
    let padding = reader.read_u16()?;
    let name = reader.read_name()?;
    let offset = u32::try_from(offset)
        .map_err(|_| ArchiveError::Format(format!("entry `{name}` has negative offset {offset}")))?;
    Ok(DirectoryEntry {
        offset,
        disk_size,
        size,
        kind,
        compression,
        padding,
        name,
    })
}

fn non_negative(value: i32, what: &str) -> Result<u32, ArchiveError> {
    u32::try_from(value).map_err(|_| ArchiveError::Format(format!("negative {what}: {value}")))
}

fn positive(value: i32, texture: &str, what: &str) -> Result<u32, ArchiveError> {
    match u32::try_from(value) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(ArchiveError::Format(format!(
            "texture `{texture}` has non-positive {what} {value}"
        ))),
    }
}
