//! Serialization of texture archives.
//!
//! Produces the layout [`WadArchive`](crate::WadArchive) reads: header, lump data in
//! insertion order, then the directory.

use std::io::{self, Write};

use byteorder::{WriteBytesExt, LE};

use crate::archive::{embedded_palette_offset, WadDialect, DIRECTORY_ENTRY_LEN, MIPTEX_HEADER_LEN, MIP_LEVELS};
use crate::palette::{Palette, PALETTE_BYTES};
use crate::reader::NAME_LEN;

const HEADER_LEN: u64 = 12;

#[derive(Debug, Clone)]
enum Lump {
    Texture {
        name: String,
        width: u32,
        height: u32,
        indices: Vec<u8>,
        palette: Option<Palette>,
    },
    Raw {
        name: String,
        kind: u8,
        data: Vec<u8>,
    },
}

impl Lump {
    fn name(&self) -> &str {
        match self {
            Lump::Texture { name, .. } | Lump::Raw { name, .. } => name,
        }
    }
}

/// Builder for an archive of one dialect.
#[derive(Debug, Clone)]
pub struct WadWriter {
    dialect: WadDialect,
    lumps: Vec<Lump>,
}

impl WadWriter {
    pub fn new(dialect: WadDialect) -> Self {
        Self {
            dialect,
            lumps: Vec::new(),
        }
    }

    /// Add a miptexture. Smaller mip levels are generated by nearest sampling.
    ///
    /// `palette` is written only for dialects with embedded palettes; a missing one is
    /// written as all black.
    pub fn add_texture(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
        indices: &[u8],
        palette: Option<&Palette>,
    ) -> &mut Self {
        debug_assert_eq!(indices.len(), width as usize * height as usize);
        self.lumps.push(Lump::Texture {
            name: name.to_string(),
            width,
            height,
            indices: indices.to_vec(),
            palette: palette.cloned(),
        });
        self
    }

    /// Add an arbitrary lump, e.g. a palette (`0x40`) or a status bar picture.
    pub fn add_lump(&mut self, name: &str, kind: u8, data: &[u8]) -> &mut Self {
        self.lumps.push(Lump::Raw {
            name: name.to_string(),
            kind,
            data: data.to_vec(),
        });
        self
    }

    fn lump_len(&self, lump: &Lump) -> u64 {
        match lump {
            Lump::Texture { width, height, .. } => {
                let end = embedded_palette_offset(0, *width, *height) - 2;
                if self.dialect.has_embedded_palette() {
                    end + 2 + PALETTE_BYTES as u64
                } else {
                    end
                }
            }
            Lump::Raw { data, .. } => data.len() as u64,
        }
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let mut offsets = Vec::with_capacity(self.lumps.len());
        let mut cursor = HEADER_LEN;
        for lump in &self.lumps {
            offsets.push(cursor);
            cursor += self.lump_len(lump);
        }

        out.write_all(&self.dialect.magic())?;
        out.write_i32::<LE>(to_i32(self.lumps.len() as u64)?)?;
        out.write_i32::<LE>(to_i32(cursor)?)?;

        for lump in &self.lumps {
            match lump {
                Lump::Texture {
                    name,
                    width,
                    height,
                    indices,
                    palette,
                } => self.write_miptex(out, name, *width, *height, indices, palette.as_ref())?,
                Lump::Raw { data, .. } => out.write_all(data)?,
            }
        }

        for (lump, offset) in self.lumps.iter().zip(&offsets) {
            let len = to_i32(self.lump_len(lump))?;
            let kind = match lump {
                Lump::Texture { .. } => self.dialect.miptex_kind(),
                Lump::Raw { kind, .. } => *kind,
            };
            out.write_i32::<LE>(to_i32(*offset)?)?;
            out.write_i32::<LE>(len)?;
            out.write_i32::<LE>(len)?;
            out.write_u8(kind)?;
            out.write_u8(0)?;
            out.write_u16::<LE>(0)?;
            write_name(out, lump.name())?;
        }
        debug_assert_eq!(DIRECTORY_ENTRY_LEN, 12 + NAME_LEN + 4);
        Ok(())
    }

    fn write_miptex<W: Write>(
        &self,
        out: &mut W,
        name: &str,
        width: u32,
        height: u32,
        indices: &[u8],
        palette: Option<&Palette>,
    ) -> io::Result<()> {
        write_name(out, name)?;
        out.write_u32::<LE>(width)?;
        out.write_u32::<LE>(height)?;
        let mut offset = MIPTEX_HEADER_LEN;
        for k in 0..MIP_LEVELS {
            out.write_i32::<LE>(to_i32(offset)?)?;
            offset += u64::from(width >> k) * u64::from(height >> k);
        }
        for k in 0..MIP_LEVELS {
            for y in 0..(height >> k) {
                for x in 0..(width >> k) {
                    let src = (y << k) as usize * width as usize + (x << k) as usize;
                    out.write_u8(indices.get(src).copied().unwrap_or(0))?;
                }
            }
        }
        if self.dialect.has_embedded_palette() {
            out.write_u16::<LE>(256)?;
            match palette {
                Some(palette) => out.write_all(&palette.to_bytes())?,
                None => out.write_all(&[0u8; PALETTE_BYTES])?,
            }
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }
}

// Names keep at least one NUL terminator.
fn write_name<W: Write>(out: &mut W, name: &str) -> io::Result<()> {
    let mut field = [0u8; NAME_LEN];
    let bytes = name.as_bytes();
    let len = bytes.len().min(NAME_LEN - 1);
    field[..len].copy_from_slice(&bytes[..len]);
    out.write_all(&field)
}

fn to_i32(value: u64) -> io::Result<i32> {
    i32::try_from(value).map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "archive exceeds 2 GiB"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WadArchive;

    #[test]
    fn test_written_archive_reads_back() {
        let indices: Vec<u8> = (0..64).collect();
        let palette = Palette::from_bytes(&[5u8; PALETTE_BYTES]).unwrap();
        let bytes = WadWriter::new(WadDialect::Wad3)
            .add_texture("crate1", 8, 8, &indices, Some(&palette))
            .add_lump("notes", 0x42, b"hello")
            .to_bytes()
            .unwrap();

        let wad = WadArchive::parse(bytes).unwrap();
        assert_eq!(wad.entries().len(), 2);
        assert_eq!(wad.texture_names().collect::<Vec<_>>(), vec!["crate1"]);
        let bitmap = wad.bitmap("crate1").unwrap();
        assert_eq!(bitmap.indices, indices);
        assert_eq!(bitmap.palette, Some(palette));
    }

    #[test]
    fn test_mips_are_nearest_sampled() {
        let indices: Vec<u8> = (0..16).collect();
        let bytes = WadWriter::new(WadDialect::Wad2)
            .add_texture("tiny", 4, 4, &indices, None)
            .to_bytes()
            .unwrap();
        // mip1 of a 4x4 texture follows the 40-byte header and 16 mip0 bytes.
        let mip1 = 12 + 40 + 16;
        assert_eq!(&bytes[mip1..mip1 + 4], &[0, 2, 8, 10]);
    }

    #[test]
    fn test_long_names_are_truncated() {
        let bytes = WadWriter::new(WadDialect::Wad2)
            .add_lump("a_very_long_lump_name", 0x40, &[0u8; PALETTE_BYTES])
            .to_bytes()
            .unwrap();
        let wad = WadArchive::parse(bytes).unwrap();
        assert_eq!(wad.entries()[0].name, "a_very_long_lum");
    }
}
