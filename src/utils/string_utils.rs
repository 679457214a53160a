//! String utility functions
//!
//! Utilities for working with strings and text data.

/// Trims trailing null characters from a byte buffer
pub fn trim_trailing_nulls(buffer: &mut Vec<u8>) {
    while buffer.last() == Some(&0) {
        buffer.pop();
    }
}

/// Collapses a possibly multi-line tag value into a single trimmed line
pub fn single_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
