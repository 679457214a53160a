//! Handler for ZSTD compressed data

use std::io::Read;

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;
use log::{debug, warn};

/// ZSTD compression handler (compression code 14)
#[derive(Default)]
pub struct ZstdHandler;

impl CompressionHandler for ZstdHandler {
    fn decompress(&self, data: &[u8], expected_len: usize) -> TiffResult<Vec<u8>> {
        debug!("ZSTD decompressing {} bytes", data.len());
        if data.is_empty() {
            return Ok(Vec::new());
        }

        match bounded_decode(data, expected_len) {
            Ok(mut decompressed_data) => {
                debug!("ZSTD decompressed to {} bytes", decompressed_data.len());
                decompressed_data.truncate(expected_len);
                Ok(decompressed_data)
            },
            Err(e) => {
                warn!("ZSTD decompression error: {}", e);
                Err(TiffError::GenericError(format!("ZSTD decompression error: {}", e)))
            }
        }
    }

    fn name(&self) -> &'static str {
        "ZSTD"
    }

    fn code(&self) -> u64 {
        compression::ZSTD as u64
    }
}

/// Decodes at most one byte past `expected_len`
fn bounded_decode(data: &[u8], expected_len: usize) -> std::io::Result<Vec<u8>> {
    let mut decoder = zstd::stream::Decoder::new(data)?.take((expected_len as u64).saturating_add(1));
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
