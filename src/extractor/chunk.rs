//! Decoding of a single strip or tile

use log::trace;

use crate::compression::CompressionHandler;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;

use super::layout::RasterLayout;
use super::predictor;

/// Where one chunk sits in the file and what it holds
#[derive(Debug, Clone, Copy)]
pub struct ChunkSpec {
    /// Index for log and error messages
    pub index: usize,
    /// File offset of the stored bytes
    pub offset: u64,
    /// Stored (compressed) size
    pub byte_count: u64,
    /// Pixels per row inside the chunk
    pub row_pixels: usize,
    /// Rows inside the chunk
    pub rows: usize,
}

/// Reads, decompresses and decodes one chunk into samples
///
/// # Returns
/// `rows * row_pixels * samples_per_chunk_pixel` samples, interleaved as
/// stored
pub fn read_chunk(
    reader: &TiffReader,
    compression: &dyn CompressionHandler,
    layout: &RasterLayout,
    chunk: ChunkSpec,
) -> TiffResult<Vec<f64>> {
    let (samples, expected_len) = chunk_size(&chunk, layout).ok_or_else(|| {
        TiffError::GenericError(format!(
            "Chunk {} of {}x{} pixels is too large", chunk.index, chunk.row_pixels, chunk.rows
        ))
    })?;

    trace!("Reading chunk {} at offset {} ({} bytes stored, {} expected)",
           chunk.index, chunk.offset, chunk.byte_count, expected_len);

    let stored = reader.data_at(chunk.offset, chunk.byte_count)?;
    let mut data = compression.decompress(stored, expected_len)?;

    if data.len() < expected_len {
        return Err(TiffError::GenericError(format!(
            "Chunk {} holds {} bytes, expected {}", chunk.index, data.len(), expected_len
        )));
    }
    data.truncate(expected_len);

    if layout.horizontal_predictor {
        predictor::undo_horizontal_differencing(
            &mut data,
            reader.handler(),
            layout.kind,
            chunk.row_pixels,
            layout.samples_per_chunk_pixel(),
        );
    }

    let mut values = Vec::with_capacity(samples);
    reader.handler().decode_samples(&data, layout.kind, &mut values);
    Ok(values)
}

/// Decoded sample count and byte length of `chunk`, or `None` on overflow
fn chunk_size(chunk: &ChunkSpec, layout: &RasterLayout) -> Option<(usize, usize)> {
    let samples = chunk.rows
        .checked_mul(chunk.row_pixels)?
        .checked_mul(layout.samples_per_chunk_pixel())?;
    let expected_len = samples.checked_mul(layout.kind.byte_width())?;
    Some((samples, expected_len))
}

/// Reads the offset and byte count arrays of a chunked raster
pub fn chunk_tables(
    reader: &TiffReader,
    ifd: &IFD,
    offsets_tag: u16,
    counts_tag: u16,
    needed: usize,
) -> TiffResult<(Vec<u64>, Vec<u64>)> {
    let offsets = reader.read_u64_values(ifd, offsets_tag)?;
    let counts = reader.read_u64_values(ifd, counts_tag)?;

    if offsets.len() < needed || counts.len() < needed {
        return Err(TiffError::GenericError(format!(
            "Raster needs {} chunks but lists {} offsets and {} byte counts",
            needed, offsets.len(), counts.len()
        )));
    }

    Ok((offsets, counts))
}
