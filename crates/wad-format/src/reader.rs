use std::io::Cursor;

use byteorder::{ReadBytesExt, LE};

use crate::errors::ArchiveError;

/// Length of every fixed-width name field.
pub const NAME_LEN: usize = 16;

/// Bounds-checked little-endian reads over an in-memory archive.
pub(crate) struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ByteReader<'a> {
    pub fn at(data: &'a [u8], offset: u64) -> Self {
        let mut cursor = Cursor::new(data);
        cursor.set_position(offset);
        Self { cursor }
    }

    pub fn seek(&mut self, offset: u64) {
        self.cursor.set_position(offset);
    }

    fn out_of_bounds(&self, offset: u64, len: usize) -> ArchiveError {
        ArchiveError::OutOfBounds {
            offset,
            len,
            size: self.cursor.get_ref().len(),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8, ArchiveError> {
        let start = self.cursor.position();
        self.cursor.read_u8().map_err(|_| self.out_of_bounds(start, 1))
    }

    pub fn read_u16(&mut self) -> Result<u16, ArchiveError> {
        let start = self.cursor.position();
        self.cursor.read_u16::<LE>().map_err(|_| self.out_of_bounds(start, 2))
    }

    pub fn read_i32(&mut self) -> Result<i32, ArchiveError> {
        let start = self.cursor.position();
        self.cursor.read_i32::<LE>().map_err(|_| self.out_of_bounds(start, 4))
    }

    /// Borrow the next `len` bytes without copying.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ArchiveError> {
        let data: &'a [u8] = *self.cursor.get_ref();
        let start = self.cursor.position();
        let end = usize::try_from(start)
            .ok()
            .and_then(|s| s.checked_add(len).map(|e| (s, e)))
            .filter(|&(_, e)| e <= data.len());
        match end {
            Some((s, e)) => {
                self.cursor.set_position(e as u64);
                Ok(&data[s..e])
            }
            None => Err(self.out_of_bounds(start, len)),
        }
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ArchiveError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Fixed 16-byte field, truncated at the first NUL.
    pub fn read_name(&mut self) -> Result<String, ArchiveError> {
        let raw = self.read_bytes(NAME_LEN)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
        Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_little_endian() {
        let data = [0x78, 0x56, 0x34, 0x12, 0xff, 0xff, 0xff, 0xff, 0x34, 0x12];
        let mut r = ByteReader::at(&data, 0);
        assert_eq!(r.read_i32().unwrap(), 0x1234_5678);
        assert_eq!(r.read_i32().unwrap(), -1);
        assert_eq!(r.read_u16().unwrap(), 0x1234);
    }

    #[test]
    fn test_short_read_reports_offset() {
        let data = [1u8, 2, 3];
        let mut r = ByteReader::at(&data, 1);
        let err = r.read_i32().unwrap_err();
        assert_eq!(err, ArchiveError::OutOfBounds { offset: 1, len: 4, size: 3 });

        let mut r = ByteReader::at(&data, 10);
        assert!(matches!(r.read_bytes(1), Err(ArchiveError::OutOfBounds { offset: 10, .. })));
    }

    #[test]
    fn test_name_stops_at_nul() {
        let mut data = [0u8; 16];
        data[..6].copy_from_slice(b"+0door");
        data[7] = b'x';
        let mut r = ByteReader::at(&data, 0);
        assert_eq!(r.read_name().unwrap(), "+0door");
    }
}
