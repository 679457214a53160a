//! Handler for Adobe Deflate compressed data

use std::io::Read;
use flate2::read::ZlibDecoder;
use log::{debug, warn};

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

/// Upper bound on the preallocation made from a chunk's declared size
const MAX_PREALLOCATION: usize = 64 * 1024 * 1024;

/// Adobe Deflate (Zlib) compression handler
///
/// Serves both the standard code 8 and the older 32946, which store the
/// same zlib stream.
pub struct AdobeDeflateHandler {
    code: u16,
}

impl AdobeDeflateHandler {
    /// Create a handler registered under `code`
    pub fn new(code: u16) -> Self {
        AdobeDeflateHandler { code }
    }
}

impl Default for AdobeDeflateHandler {
    fn default() -> Self {
        Self::new(compression::DEFLATE)
    }
}

impl CompressionHandler for AdobeDeflateHandler {
    fn decompress(&self, data: &[u8], expected_len: usize) -> TiffResult<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(data).take((expected_len as u64).saturating_add(1));
        let mut decompressed_data = Vec::with_capacity(expected_len.min(MAX_PREALLOCATION));
        match decoder.read_to_end(&mut decompressed_data) {
            Ok(_) => {
                if decompressed_data.len() > expected_len {
                    debug!("Deflate stream runs past {} bytes, ignoring the rest", expected_len);
                    decompressed_data.truncate(expected_len);
                }
                Ok(decompressed_data)
            }
            Err(e) => {
                warn!("Deflate decompression error: {}", e);
                Err(TiffError::IoError(e))
            }
        }
    }

    fn name(&self) -> &'static str {
        "Adobe Deflate"
    }

    fn code(&self) -> u64 {
        self.code as u64
    }
}
