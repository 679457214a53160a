//! Horizontal differencing predictor
//!
//! With predictor 2 each sample is stored as the difference from the
//! sample of the same band one pixel to the left. Undoing it works on the
//! raw integers in the file's byte order, wrapping at the sample width.

use crate::io::byte_order::ByteOrderHandler;
use crate::tiff::types::SampleKind;

/// Undo horizontal differencing in a decompressed chunk, in place
///
/// # Arguments
/// * `data` - Decompressed chunk bytes
/// * `handler` - Byte order of the file
/// * `kind` - Integer sample kind
/// * `row_pixels` - Pixels per chunk row (strip width or tile width)
/// * `samples_per_pixel` - Interleaved samples per pixel in the chunk
pub fn undo_horizontal_differencing(
    data: &mut [u8],
    handler: &dyn ByteOrderHandler,
    kind: SampleKind,
    row_pixels: usize,
    samples_per_pixel: usize,
) {
    let row_samples = row_pixels * samples_per_pixel;
    if row_samples == 0 {
        return;
    }
    let mask = if kind.bits() >= 64 { u64::MAX } else { (1u64 << kind.bits()) - 1 };
    let total_samples = data.len() / kind.byte_width();

    for row_start in (0..total_samples).step_by(row_samples) {
        let row_end = (row_start + row_samples).min(total_samples);
        for index in (row_start + samples_per_pixel)..row_end {
            let left = handler.sample_as_u64(data, kind, index - samples_per_pixel);
            let delta = handler.sample_as_u64(data, kind, index);
            handler.write_sample_u64(data, kind, index, left.wrapping_add(delta) & mask);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::byte_order::{BigEndianHandler, LittleEndianHandler};

    #[test]
    fn restores_bytes_per_row() {
        // Two rows of three single-sample pixels
        let mut data = vec![10u8, 1, 1, 200, 100, 0];
        undo_horizontal_differencing(&mut data, &LittleEndianHandler, SampleKind::U8, 3, 1);
        assert_eq!(data, vec![10, 11, 12, 200, 44, 44]);
    }

    #[test]
    fn keeps_bands_apart_when_interleaved() {
        let mut data = vec![1u8, 100, 1, 1];
        undo_horizontal_differencing(&mut data, &LittleEndianHandler, SampleKind::U8, 2, 2);
        assert_eq!(data, vec![1, 100, 2, 101]);
    }

    #[test]
    fn sixteen_bit_big_endian() {
        let mut data = vec![0x01, 0x00, 0x00, 0x10];
        undo_horizontal_differencing(&mut data, &BigEndianHandler, SampleKind::U16, 2, 1);
        assert_eq!(data, vec![0x01, 0x00, 0x01, 0x10]);
    }
}
