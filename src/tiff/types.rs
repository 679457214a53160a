//! Core TIFF data structures

use crate::tiff::constants::sample_format;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use std::fmt;

/// Represents a parsed TIFF file with its Image File Directories (IFDs)
#[derive(Debug)]
pub struct TIFF {
    /// Image File Directories in the TIFF file
    pub ifds: Vec<IFD>,
    /// Whether this is a BigTIFF format
    pub is_big_tiff: bool,
}

impl TIFF {
    /// Creates a new empty TIFF structure
    pub fn new(is_big_tiff: bool) -> Self {
        TIFF {
            ifds: Vec::new(),
            is_big_tiff,
        }
    }

    /// Returns the main (first) IFD if available
    pub fn main_ifd(&self) -> Option<&IFD> {
        self.ifds.first()
    }

    /// Returns the number of IFDs in the TIFF file
    pub fn ifd_count(&self) -> usize {
        self.ifds.len()
    }
}

impl fmt::Display for TIFF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TIFF File:")?;
        writeln!(f, "  Format: {}", if self.is_big_tiff { "BigTIFF" } else { "TIFF" })?;
        writeln!(f, "  Number of IFDs: {}", self.ifds.len())?;

        if let Some(ifd) = self.main_ifd() {
            write!(f, "{}", ifd)?;
        }

        Ok(())
    }
}

/// In-file representation of one raster sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    F32,
}

impl SampleKind {
    /// Resolve the sample kind from BitsPerSample and SampleFormat
    pub fn from_tags(bits_per_sample: u64, format: u64) -> TiffResult<Self> {
        let kind = match (bits_per_sample, format as u16) {
            (8, sample_format::UNSIGNED) => SampleKind::U8,
            (8, sample_format::SIGNED) => SampleKind::I8,
            (16, sample_format::UNSIGNED) => SampleKind::U16,
            (16, sample_format::SIGNED) => SampleKind::I16,
            (32, sample_format::UNSIGNED) => SampleKind::U32,
            (32, sample_format::SIGNED) => SampleKind::I32,
            (32, sample_format::IEEEFP) => SampleKind::F32,
            _ => {
                return Err(TiffError::UnsupportedSampleLayout(format!(
                    "{} bits per sample with SampleFormat {}",
                    bits_per_sample, format
                )))
            }
        };
        Ok(kind)
    }

    /// Size of one sample in bytes
    pub fn byte_width(&self) -> usize {
        match self {
            SampleKind::U8 | SampleKind::I8 => 1,
            SampleKind::U16 | SampleKind::I16 => 2,
            SampleKind::U32 | SampleKind::I32 | SampleKind::F32 => 4,
        }
    }

    /// Bits per sample
    pub fn bits(&self) -> u16 {
        (self.byte_width() * 8) as u16
    }

    /// Whether the kind is an integer type the horizontal predictor applies to
    pub fn is_integer(&self) -> bool {
        !matches!(self, SampleKind::F32)
    }
}
