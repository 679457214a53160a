//! Bounds-checked access to an in-memory file

use std::io::Cursor;

use crate::tiff::errors::{TiffError, TiffResult};

/// Borrowed view over the complete bytes of an uploaded file
///
/// Every offset found inside a TIFF is untrusted, so all access goes
/// through `slice`/`cursor_at`, which fail instead of panicking when an
/// offset or length runs past the end of the buffer.
#[derive(Debug, Clone, Copy)]
pub struct ByteSource<'a> {
    data: &'a [u8],
}

impl<'a> ByteSource<'a> {
    /// Wrap a byte buffer
    pub fn new(data: &'a [u8]) -> Self {
        ByteSource { data }
    }

    /// Total length of the buffer in bytes
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow `len` bytes starting at `offset`
    pub fn slice(&self, offset: u64, len: u64) -> TiffResult<&'a [u8]> {
        let end = offset.checked_add(len).ok_or(TiffError::OutOfBounds { offset, len })?;
        if end > self.len() {
            return Err(TiffError::OutOfBounds { offset, len });
        }
        Ok(&self.data[offset as usize..end as usize])
    }

    /// A cursor positioned at `offset`, spanning to the end of the buffer
    pub fn cursor_at(&self, offset: u64) -> TiffResult<Cursor<&'a [u8]>> {
        if offset > self.len() {
            return Err(TiffError::OutOfBounds { offset, len: 0 });
        }
        let mut cursor = Cursor::new(self.data);
        cursor.set_position(offset);
        Ok(cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_within_bounds() {
        let data = [1u8, 2, 3, 4, 5];
        let source = ByteSource::new(&data);
        assert_eq!(source.slice(1, 3).unwrap(), &[2, 3, 4]);
        assert_eq!(source.slice(5, 0).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn slice_past_end_fails() {
        let data = [0u8; 4];
        let source = ByteSource::new(&data);
        assert!(matches!(source.slice(2, 3), Err(TiffError::OutOfBounds { offset: 2, len: 3 })));
        assert!(source.slice(u64::MAX, 2).is_err());
        assert!(source.cursor_at(5).is_err());
    }
}
