//! Segmentation marker parsing
//!
//! A description marks each segmented phrase as `<p>PHRASE</p> [SEG]`.
//! The Nth marker belongs to the Nth mask.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extraction::types::{ExtractionResult, Mask};

lazy_static! {
    static ref SEGMENT_MARKER: Regex = Regex::new(r"<p>(.*?)</p>\s*\[SEG\]").expect("valid segment marker pattern");
}

/// Phrases of every marker in `description`, in order
pub fn segment_phrases(description: &str) -> Vec<&str> {
    SEGMENT_MARKER
        .captures_iter(description)
        .filter_map(|captures| captures.get(1).map(|m| m.as_str()))
        .collect()
}

/// Number of markers in `description`
pub fn marker_count(description: &str) -> usize {
    SEGMENT_MARKER.find_iter(description).count()
}

/// `description` with every marker replaced by its bare phrase
pub fn plain_description(description: &str) -> String {
    SEGMENT_MARKER.replace_all(description, "$1").into_owned()
}

/// Pair each marked phrase with the mask at the same position
///
/// Extra phrases or masks without a partner are left out.
pub fn ground_phrases(result: &ExtractionResult) -> Vec<(&str, &Mask)> {
    segment_phrases(&result.description)
        .into_iter()
        .zip(result.masks.iter())
        .collect()
}
