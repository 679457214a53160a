//! Shared fixtures for the integration tests
//!
//! `TiffBuilder` writes small TIFF/BigTIFF files in either byte order with
//! strip or tile data and arbitrary extra tags.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::Write;

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use flate2::write::ZlibEncoder;
use flate2::Compression;

pub const IMAGE_WIDTH: u16 = 256;
pub const IMAGE_LENGTH: u16 = 257;
pub const BITS_PER_SAMPLE: u16 = 258;
pub const COMPRESSION: u16 = 259;
pub const IMAGE_DESCRIPTION: u16 = 270;
pub const STRIP_OFFSETS: u16 = 273;
pub const SAMPLES_PER_PIXEL: u16 = 277;
pub const ROWS_PER_STRIP: u16 = 278;
pub const STRIP_BYTE_COUNTS: u16 = 279;
pub const PLANAR_CONFIGURATION: u16 = 284;
pub const SOFTWARE: u16 = 305;
pub const DATE_TIME: u16 = 306;
pub const PREDICTOR: u16 = 317;
pub const TILE_WIDTH: u16 = 322;
pub const TILE_LENGTH: u16 = 323;
pub const TILE_OFFSETS: u16 = 324;
pub const TILE_BYTE_COUNTS: u16 = 325;
pub const SAMPLE_FORMAT: u16 = 339;
pub const MODEL_PIXEL_SCALE: u16 = 33550;
pub const MODEL_TIEPOINT: u16 = 33922;
pub const GEO_KEY_DIRECTORY: u16 = 34735;
pub const GEO_DOUBLE_PARAMS: u16 = 34736;
pub const GEO_ASCII_PARAMS: u16 = 34737;
pub const GDAL_METADATA: u16 = 42112;
pub const GDAL_NODATA: u16 = 42113;

/// A tag value, encoded with the builder's byte order
#[derive(Debug, Clone)]
pub enum Value {
    Ascii(String),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Long8(Vec<u64>),
    Double(Vec<f64>),
    /// Any field type with pre-encoded bytes and an explicit count
    Raw { field_type: u16, count: u64, bytes: Vec<u8> },
}

#[derive(Debug, Clone)]
enum Chunks {
    None,
    Strips(Vec<Vec<u8>>),
    Tiles(Vec<Vec<u8>>),
}

/// Builder for in-memory TIFF fixtures
#[derive(Debug, Clone)]
pub struct TiffBuilder {
    big_endian: bool,
    big_tiff: bool,
    entries: BTreeMap<u16, Value>,
    chunks: Chunks,
}

impl TiffBuilder {
    /// A little-endian classic TIFF of `width` x `height` pixels
    pub fn new(width: u32, height: u32) -> Self {
        let mut builder = TiffBuilder {
            big_endian: false,
            big_tiff: false,
            entries: BTreeMap::new(),
            chunks: Chunks::None,
        };
        builder.entries.insert(IMAGE_WIDTH, Value::Long(vec![width]));
        builder.entries.insert(IMAGE_LENGTH, Value::Long(vec![height]));
        builder
    }

    pub fn big_endian(mut self) -> Self {
        self.big_endian = true;
        self
    }

    pub fn big_tiff(mut self) -> Self {
        self.big_tiff = true;
        self
    }

    /// Band count, bit depth and SampleFormat, repeated per band
    pub fn samples(self, samples_per_pixel: u16, bits: u16, format: u16) -> Self {
        let spp = samples_per_pixel as usize;
        self.tag(SAMPLES_PER_PIXEL, Value::Short(vec![samples_per_pixel]))
            .tag(BITS_PER_SAMPLE, Value::Short(vec![bits; spp]))
            .tag(SAMPLE_FORMAT, Value::Short(vec![format; spp]))
    }

    pub fn tag(mut self, tag: u16, value: Value) -> Self {
        self.entries.insert(tag, value);
        self
    }

    pub fn without_tag(mut self, tag: u16) -> Self {
        self.entries.remove(&tag);
        self
    }

    pub fn strips(mut self, rows_per_strip: u32, strips: Vec<Vec<u8>>) -> Self {
        self.entries.insert(ROWS_PER_STRIP, Value::Long(vec![rows_per_strip]));
        self.chunks = Chunks::Strips(strips);
        self
    }

    pub fn tiles(mut self, tile_width: u32, tile_length: u32, tiles: Vec<Vec<u8>>) -> Self {
        self.entries.insert(TILE_WIDTH, Value::Long(vec![tile_width]));
        self.entries.insert(TILE_LENGTH, Value::Long(vec![tile_length]));
        self.chunks = Chunks::Tiles(tiles);
        self
    }

    /// Encode 16-bit samples in this builder's byte order
    pub fn u16_samples(&self, values: &[u16]) -> Vec<u8> {
        let mut out = Vec::with_capacity(values.len() * 2);
        for &value in values {
            self.put_u16(&mut out, value);
        }
        out
    }

    /// Encode 32-bit float samples in this builder's byte order
    pub fn f32_samples(&self, values: &[f32]) -> Vec<u8> {
        let mut out = Vec::with_capacity(values.len() * 4);
        for &value in values {
            if self.big_endian {
                out.write_f32::<BigEndian>(value).unwrap();
            } else {
                out.write_f32::<LittleEndian>(value).unwrap();
            }
        }
        out
    }

    pub fn build(&self) -> Vec<u8> {
        let header_len: u64 = if self.big_tiff { 16 } else { 8 };
        let mut body = Vec::new();
        let mut entries = self.entries.clone();

        let (chunks, offsets_tag, counts_tag) = match &self.chunks {
            Chunks::None => (Vec::new(), None, None),
            Chunks::Strips(strips) => (strips.clone(), Some(STRIP_OFFSETS), Some(STRIP_BYTE_COUNTS)),
            Chunks::Tiles(tiles) => (tiles.clone(), Some(TILE_OFFSETS), Some(TILE_BYTE_COUNTS)),
        };
        let mut offsets = Vec::new();
        let mut counts = Vec::new();
        for chunk in &chunks {
            offsets.push(header_len + body.len() as u64);
            counts.push(chunk.len() as u64);
            body.extend_from_slice(chunk);
        }
        if let (Some(offsets_tag), Some(counts_tag)) = (offsets_tag, counts_tag) {
            entries.insert(offsets_tag, self.offsets_value(&offsets));
            entries.insert(counts_tag, self.offsets_value(&counts));
        }

        // Values that do not fit in the entry go after the chunk data
        let inline_len = if self.big_tiff { 8 } else { 4 };
        let mut encoded = Vec::new();
        for (tag, value) in &entries {
            let (field_type, count, bytes) = self.encode(value);
            if bytes.len() > inline_len {
                if body.len() % 2 == 1 {
                    body.push(0);
                }
                let offset = header_len + body.len() as u64;
                body.extend_from_slice(&bytes);
                let mut field = Vec::new();
                self.put_offset(&mut field, offset);
                encoded.push((*tag, field_type, count, field));
            } else {
                let mut field = bytes;
                field.resize(inline_len, 0);
                encoded.push((*tag, field_type, count, field));
            }
        }

        if body.len() % 2 == 1 {
            body.push(0);
        }
        let ifd_offset = header_len + body.len() as u64;

        let mut file = Vec::new();
        file.extend_from_slice(if self.big_endian { b"MM" } else { b"II" });
        if self.big_tiff {
            self.put_u16(&mut file, 43);
            self.put_u16(&mut file, 8);
            self.put_u16(&mut file, 0);
            self.put_u64(&mut file, ifd_offset);
        } else {
            self.put_u16(&mut file, 42);
            self.put_u32(&mut file, ifd_offset as u32);
        }
        file.extend_from_slice(&body);

        if self.big_tiff {
            self.put_u64(&mut file, encoded.len() as u64);
        } else {
            self.put_u16(&mut file, encoded.len() as u16);
        }
        for (tag, field_type, count, field) in encoded {
            self.put_u16(&mut file, tag);
            self.put_u16(&mut file, field_type);
            if self.big_tiff {
                self.put_u64(&mut file, count);
            } else {
                self.put_u32(&mut file, count as u32);
            }
            file.extend_from_slice(&field);
        }
        self.put_offset(&mut file, 0);

        file
    }

    fn offsets_value(&self, values: &[u64]) -> Value {
        if self.big_tiff {
            Value::Long8(values.to_vec())
        } else {
            Value::Long(values.iter().map(|&v| v as u32).collect())
        }
    }

    fn encode(&self, value: &Value) -> (u16, u64, Vec<u8>) {
        let mut bytes = Vec::new();
        match value {
            Value::Ascii(text) => {
                bytes.extend_from_slice(text.as_bytes());
                bytes.push(0);
                (2, bytes.len() as u64, bytes)
            }
            Value::Short(values) => {
                values.iter().for_each(|&v| self.put_u16(&mut bytes, v));
                (3, values.len() as u64, bytes)
            }
            Value::Long(values) => {
                values.iter().for_each(|&v| self.put_u32(&mut bytes, v));
                (4, values.len() as u64, bytes)
            }
            Value::Long8(values) => {
                values.iter().for_each(|&v| self.put_u64(&mut bytes, v));
                (16, values.len() as u64, bytes)
            }
            Value::Double(values) => {
                for &v in values {
                    if self.big_endian {
                        bytes.write_f64::<BigEndian>(v).unwrap();
                    } else {
                        bytes.write_f64::<LittleEndian>(v).unwrap();
                    }
                }
                (12, values.len() as u64, bytes)
            }
            Value::Raw { field_type, count, bytes } => (*field_type, *count, bytes.clone()),
        }
    }

    fn put_offset(&self, out: &mut Vec<u8>, value: u64) {
        if self.big_tiff {
            self.put_u64(out, value);
        } else {
            self.put_u32(out, value as u32);
        }
    }

    fn put_u16(&self, out: &mut Vec<u8>, value: u16) {
        if self.big_endian {
            out.write_u16::<BigEndian>(value).unwrap();
        } else {
            out.write_u16::<LittleEndian>(value).unwrap();
        }
    }

    fn put_u32(&self, out: &mut Vec<u8>, value: u32) {
        if self.big_endian {
            out.write_u32::<BigEndian>(value).unwrap();
        } else {
            out.write_u32::<LittleEndian>(value).unwrap();
        }
    }

    fn put_u64(&self, out: &mut Vec<u8>, value: u64) {
        if self.big_endian {
            out.write_u64::<BigEndian>(value).unwrap();
        } else {
            out.write_u64::<LittleEndian>(value).unwrap();
        }
    }
}

/// zlib-compress `data` as TIFF Deflate stores it
pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Horizontal differencing of 8-bit chunky rows, as Predictor 2 stores them
pub fn difference_rows_u8(data: &[u8], row_pixels: usize, samples_per_pixel: usize) -> Vec<u8> {
    let row_len = row_pixels * samples_per_pixel;
    let mut out = data.to_vec();
    for row in out.chunks_mut(row_len) {
        for i in (samples_per_pixel..row.len()).rev() {
            row[i] = row[i].wrapping_sub(row[i - samples_per_pixel]);
        }
    }
    out
}

/// A 4x2 RGB test pattern, chunky 8-bit
pub const RGB_PATTERN: [u8; 24] = [
    255, 0, 0, 0, 255, 0, 0, 0, 255, 10, 20, 30, //
    128, 128, 128, 0, 0, 0, 255, 255, 255, 200, 100, 50,
];

/// `RGB_PATTERN` as the RGBA buffer it must decode to
pub fn rgb_pattern_rgba() -> Vec<u8> {
    RGB_PATTERN
        .chunks(3)
        .flat_map(|px| [px[0], px[1], px[2], 255])
        .collect()
}

/// An 8-bit, 3-band, single-strip GeoTIFF of `RGB_PATTERN`
pub fn rgb_tiff() -> TiffBuilder {
    TiffBuilder::new(4, 2)
        .samples(3, 8, 1)
        .tag(COMPRESSION, Value::Short(vec![1]))
        .strips(2, vec![RGB_PATTERN.to_vec()])
}
