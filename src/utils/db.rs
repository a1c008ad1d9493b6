//! Decibel / linear gain conversion

/// Convert a decibel value to linear gain.
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10.0f32.powf(0.05 * db)
}

/// Convert a linear gain to decibels.
#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    20.0 * gain.log10()
}
