//! Memoizing texture lookup shared by all brushes of a compilation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tracing::debug;
use wad_format::{decode, ArchiveError, DecodedTexture, Palette, WadArchive};

use crate::error::TextureError;

pub type TextureResult = Result<Arc<DecodedTexture>, TextureError>;

/// Receives one event per distinct texture name, from whichever thread decoded it.
pub trait TextureObserver: Send + Sync {
    fn texture_decoded(&self, texture: &DecodedTexture);

    fn texture_failed(&self, _name: &str, _error: &TextureError) {}
}

/// Decodes each texture name at most once.
///
/// Names are compared ASCII case-insensitively, matching archive lookup. Failures are
/// cached too, so a missing texture is searched for only once.
pub struct TextureCache<'a> {
    archives: &'a [WadArchive],
    shared_palette: Option<&'a Palette>,
    observers: &'a [Arc<dyn TextureObserver>],
    slots: Mutex<HashMap<String, Arc<OnceLock<TextureResult>>>>,
    decodes: AtomicUsize,
}

impl<'a> TextureCache<'a> {
    pub fn new(
        archives: &'a [WadArchive],
        shared_palette: Option<&'a Palette>,
        observers: &'a [Arc<dyn TextureObserver>],
    ) -> Self {
        Self {
            archives,
            shared_palette,
            observers,
            slots: Mutex::new(HashMap::new()),
            decodes: AtomicUsize::new(0),
        }
    }

    /// The decoded texture for `name`, decoding it on first request.
    pub fn get(&self, name: &str) -> TextureResult {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(name.to_ascii_lowercase()).or_default())
        };
        slot.get_or_init(|| self.load(name)).clone()
    }

    /// How many lookups actually ran.
    pub fn decode_count(&self) -> usize {
        self.decodes.load(Ordering::Relaxed)
    }

    fn load(&self, name: &str) -> TextureResult {
        self.decodes.fetch_add(1, Ordering::Relaxed);
        let result = self.search(name);
        match &result {
            Ok(texture) => {
                debug!(texture = name, width = texture.width, height = texture.height, "texture decoded");
                for observer in self.observers {
                    observer.texture_decoded(texture);
                }
            }
            Err(error) => {
                debug!(texture = name, %error, "texture unavailable");
                for observer in self.observers {
                    observer.texture_failed(name, error);
                }
            }
        }
        result
    }

    // First archive holding a miptexture of this name wins.
    fn search(&self, name: &str) -> TextureResult {
        let mut wrong_type = None;
        for archive in self.archives {
            match archive.find_texture_by_name(name) {
                Ok(entry) => {
                    let bitmap = archive.extract_bitmap(entry)?;
                    return Ok(Arc::new(decode(&bitmap, self.shared_palette)?));
                }
                Err(e @ ArchiveError::WrongEntryType { .. }) => {
                    wrong_type.get_or_insert(e);
                }
                Err(ArchiveError::TextureNotFound(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Err(wrong_type
            .unwrap_or_else(|| ArchiveError::TextureNotFound(name.to_string()))
            .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wad_format::{WadDialect, WadWriter};

    fn archive() -> WadArchive {
        let palette = Palette::from_bytes(&[10u8; 768]).unwrap();
        let bytes = WadWriter::new(WadDialect::Wad3)
            .add_texture("brick", 2, 2, &[1, 2, 3, 4], Some(&palette))
            .add_lump("notes", 0x42, b"x")
            .to_bytes()
            .unwrap();
        WadArchive::parse(bytes).unwrap()
    }

    #[test]
    fn test_decodes_once_per_name() {
        let archives = [archive()];
        let cache = TextureCache::new(&archives, None, &[]);
        let a = cache.get("brick").unwrap();
        let b = cache.get("BRICK").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.decode_count(), 1);
    }

    #[test]
    fn test_failures_are_cached() {
        let archives = [archive()];
        let cache = TextureCache::new(&archives, None, &[]);
        for _ in 0..3 {
            assert_eq!(
                cache.get("missing").unwrap_err(),
                TextureError::Archive(ArchiveError::TextureNotFound("missing".into()))
            );
        }
        assert!(matches!(
            cache.get("notes"),
            Err(TextureError::Archive(ArchiveError::WrongEntryType { .. }))
        ));
        assert_eq!(cache.decode_count(), 2);
    }

    #[test]
    fn test_no_archives() {
        let cache = TextureCache::new(&[], None, &[]);
        assert!(matches!(
            cache.get("brick"),
            Err(TextureError::Archive(ArchiveError::TextureNotFound(_)))
        ));
    }
}
