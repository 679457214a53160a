//! Tests for TIFF container parsing over hand-built buffers

mod test_utils;
