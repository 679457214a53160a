//! Factory for creating compression handlers

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;
use super::uncompressed::UncompressedHandler;
use super::deflate::AdobeDeflateHandler;
use super::zstd::ZstdHandler;

/// Factory for creating compression handlers
pub struct CompressionFactory;

impl CompressionFactory {
    /// Create a compression handler for the given compression code
    ///
    /// # Returns
    /// The handler, or `UnsupportedCompression` for codes the decoder cannot
    /// read (LZW, JPEG, PackBits and anything unknown)
    pub fn create_handler(code: u64) -> TiffResult<Box<dyn CompressionHandler>> {
        let code16 = u16::try_from(code).map_err(|_| TiffError::UnsupportedCompression(code))?;
        match code16 {
            compression::NONE => Ok(Box::new(UncompressedHandler)),
            compression::DEFLATE | compression::DEFLATE_LEGACY => Ok(Box::new(AdobeDeflateHandler::new(code16))),
            compression::ZSTD => Ok(Box::new(ZstdHandler)),
            _ => Err(TiffError::UnsupportedCompression(code)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_have_handlers() {
        assert_eq!(CompressionFactory::create_handler(1).unwrap().name(), "Uncompressed");
        assert_eq!(CompressionFactory::create_handler(8).unwrap().code(), 8);
        assert_eq!(CompressionFactory::create_handler(32946).unwrap().name(), "Adobe Deflate");
        assert_eq!(CompressionFactory::create_handler(14).unwrap().name(), "ZSTD");
    }

    #[test]
    fn lzw_is_unsupported() {
        assert!(matches!(
            CompressionFactory::create_handler(5),
            Err(TiffError::UnsupportedCompression(5))
        ));
        assert!(CompressionFactory::create_handler(70_000).is_err());
    }
}
