//! Byte order handling for TIFF files
//!
//! This module implements the Strategy pattern for handling different
//! byte orders (little-endian vs big-endian) when reading TIFF structures
//! and raster samples out of an in-memory buffer.

use byteorder::{BigEndian, ByteOrder as RawByteOrder, LittleEndian, ReadBytesExt};
use std::io::{Cursor, Result};

use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::types::SampleKind;

/// Represents the byte order of a TIFF file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian byte order (II)
    LittleEndian,
    /// Big-endian byte order (MM)
    BigEndian,
}

impl ByteOrder {
    /// Detects the byte order from the first two bytes of a TIFF header
    pub fn detect(header: &[u8]) -> TiffResult<Self> {
        if header.len() < 2 {
            return Err(TiffError::InvalidHeader);
        }

        match [header[0], header[1]] {
            [0x49, 0x49] => Ok(ByteOrder::LittleEndian), // "II" (Intel)
            [0x4D, 0x4D] => Ok(ByteOrder::BigEndian),    // "MM" (Motorola)
            _ => Err(TiffError::InvalidByteOrder(u16::from_le_bytes([header[0], header[1]]))),
        }
    }

    /// Returns a string representation of this byte order
    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little Endian (II)",
            ByteOrder::BigEndian => "Big Endian (MM)",
        }
    }

    /// Creates the appropriate handler for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }
}

/// Trait for byte order handling strategies
///
/// Structural reads go through a cursor so IFD parsing can walk the buffer
/// sequentially; sample decoding works on whole decompressed chunks.
pub trait ByteOrderHandler: Send + Sync {
    /// Read a u16 value
    fn read_u16(&self, reader: &mut Cursor<&[u8]>) -> Result<u16>;

    /// Read a u32 value
    fn read_u32(&self, reader: &mut Cursor<&[u8]>) -> Result<u32>;

    /// Read a u64 value
    fn read_u64(&self, reader: &mut Cursor<&[u8]>) -> Result<u64>;

    /// Read an f32 value
    fn read_f32(&self, reader: &mut Cursor<&[u8]>) -> Result<f32>;

    /// Read an f64 value
    fn read_f64(&self, reader: &mut Cursor<&[u8]>) -> Result<f64>;

    /// Decode every complete sample of `kind` in `bytes`, appending to `out`
    fn decode_samples(&self, bytes: &[u8], kind: SampleKind, out: &mut Vec<f64>);

    /// Read the raw integer bits of sample `index` in `bytes`
    ///
    /// Used by the horizontal predictor, which works on raw integer samples.
    fn sample_as_u64(&self, bytes: &[u8], kind: SampleKind, index: usize) -> u64;

    /// Store an integer sample of `kind` into `bytes` at sample `index`
    fn write_sample_u64(&self, bytes: &mut [u8], kind: SampleKind, index: usize, value: u64);

    /// The byte order this handler implements
    fn byte_order(&self) -> ByteOrder;
}

fn decode_with<B: RawByteOrder>(bytes: &[u8], kind: SampleKind, out: &mut Vec<f64>) {
    let width = kind.byte_width();
    out.reserve(bytes.len() / width);

    for chunk in bytes.chunks_exact(width) {
        let value = match kind {
            SampleKind::U8 => chunk[0] as f64,
            SampleKind::I8 => chunk[0] as i8 as f64,
            SampleKind::U16 => B::read_u16(chunk) as f64,
            SampleKind::I16 => B::read_i16(chunk) as f64,
            SampleKind::U32 => B::read_u32(chunk) as f64,
            SampleKind::I32 => B::read_i32(chunk) as f64,
            SampleKind::F32 => B::read_f32(chunk) as f64,
        };
        out.push(value);
    }
}

fn read_raw_with<B: RawByteOrder>(bytes: &[u8], kind: SampleKind, index: usize) -> u64 {
    let width = kind.byte_width();
    let start = index * width;
    let chunk = &bytes[start..start + width];

    match width {
        1 => chunk[0] as u64,
        2 => B::read_u16(chunk) as u64,
        _ => B::read_u32(chunk) as u64,
    }
}

fn write_raw_with<B: RawByteOrder>(bytes: &mut [u8], kind: SampleKind, index: usize, value: u64) {
    let width = kind.byte_width();
    let start = index * width;
    let chunk = &mut bytes[start..start + width];

    match width {
        1 => chunk[0] = value as u8,
        2 => B::write_u16(chunk, value as u16),
        _ => B::write_u32(chunk, value as u32),
    }
}

/// Little-endian byte order handler
pub struct LittleEndianHandler;

impl ByteOrderHandler for LittleEndianHandler {
    fn read_u16(&self, reader: &mut Cursor<&[u8]>) -> Result<u16> {
        reader.read_u16::<LittleEndian>()
    }

    fn read_u32(&self, reader: &mut Cursor<&[u8]>) -> Result<u32> {
        reader.read_u32::<LittleEndian>()
    }

    fn read_u64(&self, reader: &mut Cursor<&[u8]>) -> Result<u64> {
        reader.read_u64::<LittleEndian>()
    }

    fn read_f32(&self, reader: &mut Cursor<&[u8]>) -> Result<f32> {
        reader.read_f32::<LittleEndian>()
    }

    fn read_f64(&self, reader: &mut Cursor<&[u8]>) -> Result<f64> {
        reader.read_f64::<LittleEndian>()
    }

    fn decode_samples(&self, bytes: &[u8], kind: SampleKind, out: &mut Vec<f64>) {
        decode_with::<LittleEndian>(bytes, kind, out)
    }

    fn sample_as_u64(&self, bytes: &[u8], kind: SampleKind, index: usize) -> u64 {
        read_raw_with::<LittleEndian>(bytes, kind, index)
    }

    fn write_sample_u64(&self, bytes: &mut [u8], kind: SampleKind, index: usize, value: u64) {
        write_raw_with::<LittleEndian>(bytes, kind, index, value)
    }

    fn byte_order(&self) -> ByteOrder {
        ByteOrder::LittleEndian
    }
}

/// Big-endian byte order handler
pub struct BigEndianHandler;

impl ByteOrderHandler for BigEndianHandler {
    fn read_u16(&self, reader: &mut Cursor<&[u8]>) -> Result<u16> {
        reader.read_u16::<BigEndian>()
    }

    fn read_u32(&self, reader: &mut Cursor<&[u8]>) -> Result<u32> {
        reader.read_u32::<BigEndian>()
    }

    fn read_u64(&self, reader: &mut Cursor<&[u8]>) -> Result<u64> {
        reader.read_u64::<BigEndian>()
    }

    fn read_f32(&self, reader: &mut Cursor<&[u8]>) -> Result<f32> {
        reader.read_f32::<BigEndian>()
    }

    fn read_f64(&self, reader: &mut Cursor<&[u8]>) -> Result<f64> {
        reader.read_f64::<BigEndian>()
    }

    fn decode_samples(&self, bytes: &[u8], kind: SampleKind, out: &mut Vec<f64>) {
        decode_with::<BigEndian>(bytes, kind, out)
    }

    fn sample_as_u64(&self, bytes: &[u8], kind: SampleKind, index: usize) -> u64 {
        read_raw_with::<BigEndian>(bytes, kind, index)
    }

    fn write_sample_u64(&self, bytes: &mut [u8], kind: SampleKind, index: usize, value: u64) {
        write_raw_with::<BigEndian>(bytes, kind, index, value)
    }

    fn byte_order(&self) -> ByteOrder {
        ByteOrder::BigEndian
    }
}
