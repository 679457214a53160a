//! Utility modules for common functionality
//!
//! Logging, progress display and small TIFF helpers used throughout the
//! crate.

pub mod logger;
pub mod progress;
pub(crate) mod string_utils;
pub(crate) mod tag_utils;
