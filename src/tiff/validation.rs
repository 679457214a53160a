//! TIFF validation utilities
//!
//! Checks applied to header fields and offsets before they are trusted,
//! so malformed uploads fail with an error instead of a panic or an
//! unbounded allocation.

use log::{debug, error};
use std::io::Cursor;

use crate::io::byte_order::ByteOrderHandler;
use crate::tiff::constants::header;
use crate::tiff::errors::{TiffError, TiffResult};

/// Validates an IFD offset to ensure it's within the file
pub fn validate_ifd_offset(offset: u64, file_size: u64) -> TiffResult<()> {
    if offset >= file_size || offset < header::TIFF_HEADER_SIZE {
        return Err(TiffError::GenericError(format!(
            "Invalid IFD offset: {} (file size: {})",
            offset, file_size
        )));
    }

    Ok(())
}

/// Validates the BigTIFF header
///
/// In BigTIFF, after the version number (43) comes the offset size (must
/// be 8) and a reserved value (must be 0).
pub fn validate_bigtiff_header(
    reader: &mut Cursor<&[u8]>,
    byte_order_handler: &dyn ByteOrderHandler,
) -> TiffResult<()> {
    let offset_size = byte_order_handler.read_u16(reader)?;
    let zeros = byte_order_handler.read_u16(reader)?;

    debug!("BigTIFF offset size: {}, reserved: {}", offset_size, zeros);

    if offset_size != header::BIGTIFF_OFFSET_SIZE || zeros != 0 {
        error!("Invalid BigTIFF header: offset_size={}, zeros={}", offset_size, zeros);
        return Err(TiffError::InvalidBigTIFFHeader);
    }

    Ok(())
}

/// Validates a numeric range to ensure it's within bounds
pub fn validate_range<T>(value: T, min: T, max: T, name: &str) -> TiffResult<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(TiffError::GenericError(format!(
            "Invalid {}: {} (must be between {} and {})",
            name, value, min, max
        )));
    }

    Ok(())
}

/// Validates that an IFD entry count cannot overrun the file
///
/// Each classic entry is 12 bytes and each BigTIFF entry 20 bytes.
pub fn validate_entry_count(count: u64, ifd_offset: u64, file_size: u64, is_big_tiff: bool) -> TiffResult<()> {
    let entry_size = if is_big_tiff { 20 } else { 12 };
    let needed = count.saturating_mul(entry_size);
    if ifd_offset.saturating_add(needed) > file_size {
        return Err(TiffError::GenericError(format!(
            "IFD at {} declares {} entries, which exceeds the file size {}",
            ifd_offset, count, file_size
        )));
    }
    Ok(())
}
