//! Compression handler trait definition

use crate::tiff::errors::TiffResult;

/// Strategy trait for handling different compression methods
pub trait CompressionHandler: Send + Sync {
    /// Decompress one strip or tile
    ///
    /// `expected_len` is the size of the chunk once decoded. Decoders stop
    /// after `expected_len` bytes and drop whatever the stream holds beyond
    /// that; callers check for short output themselves.
    fn decompress(&self, data: &[u8], expected_len: usize) -> TiffResult<Vec<u8>>;

    /// Get the name of this compression method
    fn name(&self) -> &'static str;

    /// Get the compression code
    fn code(&self) -> u64;
}
