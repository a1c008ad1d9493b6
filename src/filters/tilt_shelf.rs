use crate::utils::db::db_to_gain;
use std::f32::consts::PI;

/// Pivot frequency of the tilt control in Hz
pub const PIVOT_HZ: f32 = 800.0;

/// Gain in dB applied to each end of the spectrum at full tilt
pub const TILT_RANGE_DB: f32 = 6.0;

/// Tilt changes smaller than this skip the coefficient recompute
const TILT_EPSILON: f32 = 1e-4;

/// First-order tilt shelf pivoting at [`PIVOT_HZ`]
///
/// A single knob that leans the spectrum: positive tilt brightens (cuts
/// below the pivot, boosts above), negative darkens. Coefficients come
/// from the bilinear transform of the analog shelf `H(s) = (s + ω·g)/(s + ω/g)`,
/// tan-prewarped so the pivot lands where it should, and scaled by `1/g`
/// so the boost and cut are symmetric around the pivot.
///
/// At tilt 0 the coefficients collapse to the exact identity
/// (`b0 = 1, b1 = 0, a1 = 0`); this is relied upon, not approximate.
pub struct TiltShelf {
    sample_rate: f32,

    b0: f32,
    b1: f32,
    a1: f32,

    x1: f32,
    y1: f32,

    last_tilt: f32,
}

impl TiltShelf {
    /// Create a neutral (identity) tilt shelf.
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            sample_rate,
            b0: 1.0,
            b1: 0.0,
            a1: 0.0,
            x1: 0.0,
            y1: 0.0,
            last_tilt: 0.0,
        };
        filter.calculate_coefficients(0.0);
        filter
    }

    /// Clear the delay elements.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.y1 = 0.0;
    }

    /// Update the tilt (-1 dark .. +1 bright), recomputing coefficients
    /// only when it moved by more than an epsilon.
    #[inline]
    pub fn set_tilt(&mut self, tilt: f32) {
        if (tilt - self.last_tilt).abs() < TILT_EPSILON {
            return;
        }
        self.last_tilt = tilt;
        self.calculate_coefficients(tilt);
    }

    fn calculate_coefficients(&mut self, tilt: f32) {
        if tilt.abs() < TILT_EPSILON {
            self.b0 = 1.0;
            self.b1 = 0.0;
            self.a1 = 0.0;
            return;
        }

        // Positive tilt brightens: low end lands at g = -range·tilt dB,
        // high end at +range·tilt dB.
        let g = db_to_gain(-TILT_RANGE_DB * tilt);
        let w = (PI * PIVOT_HZ / self.sample_rate).tan();

        let den = 1.0 + w / g;
        self.b0 = (1.0 + w * g) / (g * den);
        self.b1 = (w * g - 1.0) / (g * den);
        self.a1 = (w / g - 1.0) / den;
    }

    /// `y[n] = b0·x[n] + b1·x[n-1] - a1·y[n-1]`
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 - self.a1 * self.y1;

        self.x1 = input;
        self.y1 = if output.abs() < 1e-15 { 0.0 } else { output };

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_neutral_tilt_is_exact_identity() {
        let mut filter = TiltShelf::new(44100.0);
        filter.set_tilt(0.0);
        assert_eq!(filter.b0, 1.0);
        assert_eq!(filter.b1, 0.0);
        assert_eq!(filter.a1, 0.0);
        for n in 0..256 {
            let x = ((n * 37) % 17) as f32 / 17.0 - 0.5;
            assert_eq!(filter.process(x), x);
        }
    }

    #[test]
    fn test_tiny_tilt_snaps_to_identity() {
        let mut filter = TiltShelf::new(48000.0);
        filter.set_tilt(0.3);
        filter.set_tilt(0.0);
        assert_eq!(filter.b0, 1.0);
        assert_eq!(filter.b1, 0.0);
        assert_eq!(filter.a1, 0.0);
    }

    #[test]
    fn test_dark_tilt_boosts_dc() {
        let mut filter = TiltShelf::new(44100.0);
        filter.set_tilt(-1.0);
        let mut last = 0.0;
        for _ in 0..44100 {
            last = filter.process(1.0);
        }
        // DC gain should approach +6 dB
        assert_relative_eq!(last, db_to_gain(TILT_RANGE_DB), epsilon = 1e-2);
    }

    #[test]
    fn test_bright_tilt_boosts_nyquist() {
        let mut filter = TiltShelf::new(44100.0);
        filter.set_tilt(1.0);
        // Alternating signal sits at Nyquist; measure steady-state amplitude
        let mut peak = 0.0f32;
        for n in 0..4096 {
            let x = if n % 2 == 0 { 1.0 } else { -1.0 };
            let y = filter.process(x);
            if n > 2048 {
                peak = peak.max(y.abs());
            }
        }
        assert_relative_eq!(peak, db_to_gain(TILT_RANGE_DB), epsilon = 1e-2);
    }

    #[test]
    fn test_tilt_is_stable() {
        for tilt in [-1.0f32, -0.5, 0.25, 1.0] {
            let mut filter = TiltShelf::new(44100.0);
            filter.set_tilt(tilt);
            assert!(filter.a1.abs() < 1.0, "pole outside unit circle at {}", tilt);
        }
    }
}
