//! Expansion of palette-indexed bitmaps to RGBA.
//!
//! The alpha channel follows the archive format, not a rendering preference:
//! - textures carrying their own palette are opaque, except names starting with
//!   `glass`, which are uniformly half transparent;
//! - textures using the shared engine palette mark the top 32 (fullbright) indices
//!   with alpha 0 so they are neither lit nor blended.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::archive::IndexedBitmap;
use crate::errors::PaletteError;

/// Size of a serialized palette: 256 RGB triples.
pub const PALETTE_BYTES: usize = 256 * 3;
/// First fullbright index of the shared engine palette.
pub const FULLBRIGHT_START: u8 = 0xE0;
/// Case-sensitive name prefix of blended textures.
pub const GLASS_PREFIX: &str = "glass";
pub const GLASS_ALPHA: u8 = 128;

/// 256 RGB colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [[u8; 3]; 256],
}

impl Palette {
    /// Palette from the first 768 bytes of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PaletteError> {
        let exact: &[u8; PALETTE_BYTES] = bytes
            .get(..PALETTE_BYTES)
            .and_then(|b| b.try_into().ok())
            .ok_or(PaletteError::TooShort { len: bytes.len() })?;
        Ok(Self::from_exact(exact))
    }

    /// Palette from exactly 768 bytes.
    pub fn from_exact(bytes: &[u8; PALETTE_BYTES]) -> Self {
        let mut colors = [[0u8; 3]; 256];
        for (color, rgb) in colors.iter_mut().zip(bytes.chunks_exact(3)) {
            color.copy_from_slice(rgb);
        }
        Self { colors }
    }

    pub fn color(&self, index: u8) -> [u8; 3] {
        self.colors[index as usize]
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.colors.iter().flatten().copied().collect()
    }
}

/// How a decoded texture must be composited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlphaMode {
    Opaque,
    /// Uniform partial transparency; needs blended drawing.
    Blended,
    /// Some texels have alpha 0 and must be discarded, not blended.
    Cutout,
}

/// RGBA8 pixels of a texture, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedTexture {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub alpha_mode: AlphaMode,
}

/// Expand `bitmap` to RGBA.
///
/// The bitmap's embedded palette wins over `shared`; `shared` is only consulted for
/// archives without per-texture palettes.
pub fn decode(bitmap: &IndexedBitmap, shared: Option<&Palette>) -> Result<DecodedTexture, PaletteError> {
    let (rgba, alpha_mode) = match (&bitmap.palette, shared) {
        (Some(embedded), _) => decode_embedded(bitmap, embedded),
        (None, Some(shared)) => decode_shared(bitmap, shared),
        (None, None) => {
            return Err(PaletteError::MissingPalette {
                texture: bitmap.name.clone(),
            })
        }
    };
    debug!(texture = %bitmap.name, width = bitmap.width, height = bitmap.height, ?alpha_mode, "decoded texture");
    Ok(DecodedTexture {
        name: bitmap.name.clone(),
        width: bitmap.width,
        height: bitmap.height,
        rgba,
        alpha_mode,
    })
}

fn decode_embedded(bitmap: &IndexedBitmap, palette: &Palette) -> (Vec<u8>, AlphaMode) {
    let (alpha, mode) = if bitmap.name.starts_with(GLASS_PREFIX) {
        (GLASS_ALPHA, AlphaMode::Blended)
    } else {
        (255, AlphaMode::Opaque)
    };
    let mut rgba = Vec::with_capacity(bitmap.indices.len() * 4);
    for &index in &bitmap.indices {
        let [r, g, b] = palette.color(index);
        rgba.extend_from_slice(&[r, g, b, alpha]);
    }
    (rgba, mode)
}

fn decode_shared(bitmap: &IndexedBitmap, palette: &Palette) -> (Vec<u8>, AlphaMode) {
    let mut rgba = Vec::with_capacity(bitmap.indices.len() * 4);
    let mut cutout = false;
    for &index in &bitmap.indices {
        let [r, g, b] = palette.color(index);
        let alpha = if index >= FULLBRIGHT_START {
            cutout = true;
            0
        } else {
            255
        };
        rgba.extend_from_slice(&[r, g, b, alpha]);
    }
    let mode = if cutout { AlphaMode::Cutout } else { AlphaMode::Opaque };
    (rgba, mode)
}
