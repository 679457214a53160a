//! TIFF file reader implementation
//!
//! This module implements the TIFF/BigTIFF reader over an in-memory
//! buffer. It uses the byte order strategy chosen from the header for
//! every structural read and for resolving tag values.

use byteorder::ReadBytesExt;
use log::{debug, info, warn};
use std::io::Cursor;

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::source::ByteSource;
use crate::tiff::constants::{field_types, header};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::types::TIFF;
use crate::tiff::validation;
use crate::utils::string_utils;

/// Upper bound on directories followed in one chain
const MAX_IFDS: usize = 100;

/// Reader for TIFF and BigTIFF files held in memory
pub struct TiffReader<'a> {
    /// The complete file
    source: ByteSource<'a>,
    /// Byte order handler chosen from the header
    byte_order_handler: Box<dyn ByteOrderHandler>,
    /// Whether the file is BigTIFF
    is_big_tiff: bool,
    /// Offset of the first IFD, from the header
    first_ifd_offset: u64,
}

impl<'a> TiffReader<'a> {
    /// Parses the header of `data` and prepares a reader for it
    ///
    /// This detects the byte order (II/MM), the TIFF or BigTIFF variant and
    /// the first IFD offset. Directories are read by [`TiffReader::read`].
    pub fn new(data: &'a [u8]) -> TiffResult<Self> {
        let source = ByteSource::new(data);
        let byte_order = ByteOrder::detect(source.slice(0, 2).map_err(|_| TiffError::InvalidHeader)?)?;
        debug!("Detected byte order: {}", byte_order.name());
        let handler = byte_order.create_handler();

        let mut cursor = source.cursor_at(2)?;
        let version = handler.read_u16(&mut cursor).map_err(|_| TiffError::InvalidHeader)?;
        let is_big_tiff = match version {
            header::BIG_TIFF_VERSION => {
                debug!("Detected BigTIFF format");
                validation::validate_bigtiff_header(&mut cursor, handler.as_ref())?;
                true
            }
            header::TIFF_VERSION => {
                debug!("Detected standard TIFF format");
                false
            }
            _ => return Err(TiffError::UnsupportedVersion(version)),
        };

        let first_ifd_offset = if is_big_tiff {
            handler.read_u64(&mut cursor)?
        } else {
            handler.read_u32(&mut cursor)? as u64
        };
        debug!("First IFD offset: {}", first_ifd_offset);

        Ok(TiffReader {
            source,
            byte_order_handler: handler,
            is_big_tiff,
            first_ifd_offset,
        })
    }

    /// Reads the chain of IFDs
    ///
    /// A broken link after the first directory ends the chain with a
    /// warning; only a missing first directory is an error.
    pub fn read(&self) -> TiffResult<TIFF> {
        validation::validate_ifd_offset(self.first_ifd_offset, self.source.len())?;

        let mut tiff = TIFF::new(self.is_big_tiff);
        let mut ifd_offset = self.first_ifd_offset;

        while ifd_offset != 0 && tiff.ifds.len() < MAX_IFDS {
            let number = tiff.ifds.len();
            match self.read_ifd(ifd_offset, number) {
                Ok((ifd, next_offset)) => {
                    debug!("Read IFD #{} with {} entries, next at {}", number, ifd.entry_count(), next_offset);
                    tiff.ifds.push(ifd);

                    if next_offset != 0 && validation::validate_ifd_offset(next_offset, self.source.len()).is_err() {
                        warn!("Invalid next IFD offset: {}, stopping IFD chain", next_offset);
                        break;
                    }
                    if tiff.ifds.iter().any(|seen| seen.offset == next_offset) {
                        warn!("IFD chain loops back to offset {}, stopping", next_offset);
                        break;
                    }
                    ifd_offset = next_offset;
                }
                Err(e) if number == 0 => return Err(e),
                Err(e) => {
                    warn!("Error reading IFD {}: {}", number, e);
                    break;
                }
            }
        }

        if tiff.ifds.is_empty() {
            return Err(TiffError::NoImageDirectory);
        }

        info!("Read {} IFDs from {} file", tiff.ifd_count(), if self.is_big_tiff { "BigTIFF" } else { "TIFF" });
        Ok(tiff)
    }

    /// Reads one IFD at `offset`, returning it with the next IFD offset
    pub fn read_ifd(&self, offset: u64, number: usize) -> TiffResult<(IFD, u64)> {
        let handler = self.handler();
        let mut cursor = self.source.cursor_at(offset)?;

        let entry_count = if self.is_big_tiff {
            handler.read_u64(&mut cursor)?
        } else {
            handler.read_u16(&mut cursor)? as u64
        };
        validation::validate_entry_count(entry_count, offset, self.source.len(), self.is_big_tiff)?;

        let mut ifd = IFD::new(number, offset);
        for _ in 0..entry_count {
            ifd.add_entry(self.read_ifd_entry(&mut cursor)?);
        }

        let next_offset = if self.is_big_tiff {
            handler.read_u64(&mut cursor)?
        } else {
            handler.read_u32(&mut cursor)? as u64
        };

        Ok((ifd, next_offset))
    }

    /// Reads a single IFD entry, keeping the raw value field
    fn read_ifd_entry(&self, cursor: &mut Cursor<&[u8]>) -> TiffResult<IFDEntry> {
        let handler = self.handler();

        let tag = handler.read_u16(cursor)?;
        let field_type = handler.read_u16(cursor)?;
        let count = if self.is_big_tiff {
            handler.read_u64(cursor)?
        } else {
            handler.read_u32(cursor)? as u64
        };

        let value_width = if self.is_big_tiff { 8 } else { 4 };
        let position = cursor.position();
        let raw = self.source.slice(position, value_width)?;
        let mut raw_value = [0u8; 8];
        raw_value[..value_width as usize].copy_from_slice(raw);

        let value_offset = if self.is_big_tiff {
            handler.read_u64(cursor)?
        } else {
            handler.read_u32(cursor)? as u64
        };

        Ok(IFDEntry::new(tag, field_type, count, value_offset, raw_value))
    }

    /// Borrows the bytes holding an entry's values
    ///
    /// Inline values come from the entry's raw value field, everything else
    /// from the file at `value_offset`.
    pub fn entry_bytes<'s>(&'s self, entry: &'s IFDEntry) -> TiffResult<&'s [u8]> {
        let len = entry.byte_len();
        if entry.is_value_inline(self.is_big_tiff) {
            Ok(&entry.raw_value[..len as usize])
        } else {
            self.source.slice(entry.value_offset, len)
        }
    }

    /// Reads an integer-valued tag as a vector of u64
    pub fn read_u64_values(&self, ifd: &IFD, tag: u16) -> TiffResult<Vec<u64>> {
        let entry = ifd.get_entry(tag).ok_or(TiffError::TagNotFound(tag))?;
        let bytes = self.entry_bytes(entry)?;
        let handler = self.handler();
        let mut cursor = Cursor::new(bytes);
        let mut values = Vec::with_capacity(entry.count.min(bytes.len() as u64) as usize);

        for _ in 0..entry.count {
            let value = match entry.field_type {
                field_types::BYTE | field_types::SBYTE | field_types::UNDEFINED => cursor.read_u8()? as u64,
                field_types::SHORT | field_types::SSHORT => handler.read_u16(&mut cursor)? as u64,
                field_types::LONG | field_types::SLONG => handler.read_u32(&mut cursor)? as u64,
                field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => handler.read_u64(&mut cursor)?,
                other => return Err(TiffError::UnsupportedFieldType(other)),
            };
            values.push(value);
        }

        Ok(values)
    }

    /// Reads the first value of an integer tag, `None` if the tag is absent
    pub fn first_value(&self, ifd: &IFD, tag: u16) -> TiffResult<Option<u64>> {
        if !ifd.has_tag(tag) {
            return Ok(None);
        }
        Ok(self.read_u64_values(ifd, tag)?.first().copied())
    }

    /// Reads a numeric tag as doubles, whatever its stored field type
    pub fn read_f64_values(&self, ifd: &IFD, tag: u16) -> TiffResult<Vec<f64>> {
        let entry = ifd.get_entry(tag).ok_or(TiffError::TagNotFound(tag))?;
        match entry.field_type {
            field_types::DOUBLE | field_types::FLOAT | field_types::RATIONAL | field_types::SRATIONAL => {}
            _ => return Ok(self.read_u64_values(ifd, tag)?.into_iter().map(|v| v as f64).collect()),
        }

        let bytes = self.entry_bytes(entry)?;
        let handler = self.handler();
        let mut cursor = Cursor::new(bytes);
        let mut values = Vec::with_capacity(entry.count as usize);

        for _ in 0..entry.count {
            let value = match entry.field_type {
                field_types::DOUBLE => handler.read_f64(&mut cursor)?,
                field_types::FLOAT => handler.read_f32(&mut cursor)? as f64,
                field_types::RATIONAL => {
                    let num = handler.read_u32(&mut cursor)? as f64;
                    let den = handler.read_u32(&mut cursor)? as f64;
                    if den == 0.0 { 0.0 } else { num / den }
                }
                _ => {
                    let num = handler.read_u32(&mut cursor)? as i32 as f64;
                    let den = handler.read_u32(&mut cursor)? as i32 as f64;
                    if den == 0.0 { 0.0 } else { num / den }
                }
            };
            values.push(value);
        }

        Ok(values)
    }

    /// Reads an ASCII tag, with trailing null characters removed
    pub fn read_ascii(&self, ifd: &IFD, tag: u16) -> TiffResult<String> {
        let entry = ifd.get_entry(tag).ok_or(TiffError::TagNotFound(tag))?;
        if entry.field_type != field_types::ASCII && entry.field_type != field_types::UNDEFINED {
            return Err(TiffError::UnsupportedFieldType(entry.field_type));
        }

        let mut buffer = self.entry_bytes(entry)?.to_vec();
        string_utils::trim_trailing_nulls(&mut buffer);

        String::from_utf8(buffer)
            .map_err(|e| TiffError::GenericError(format!("Invalid UTF-8 string in tag {}: {}", tag, e)))
    }

    /// Borrows `len` bytes of the file at `offset`
    pub fn data_at(&self, offset: u64, len: u64) -> TiffResult<&'a [u8]> {
        self.source.slice(offset, len)
    }

    /// The byte order handler for this file
    pub fn handler(&self) -> &dyn ByteOrderHandler {
        self.byte_order_handler.as_ref()
    }

    /// Returns whether the current file is a BigTIFF
    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }
}
