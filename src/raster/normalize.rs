//! Sample to byte normalization

/// Map one raw sample to a display byte
///
/// Values that already fit a byte are clamped to `0..=255`; wider values
/// are divided by 256 (floored) and clamped. This is a fixed linear
/// rescale, not a contrast stretch. NaN maps to 0 and an in-range
/// fraction rounds to the nearest byte, ties to even.
pub fn normalize(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    let value = if raw <= 255.0 {
        raw.round_ties_even()
    } else {
        (raw / 256.0).floor()
    };
    value.clamp(0.0, 255.0) as u8
}
