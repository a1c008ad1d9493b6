//! Pink noise via the Voss-McCartney algorithm
//!
//! White noise has equal energy per Hz and sounds harsh; pink noise (1/f)
//! has equal energy per octave, which is what the hiss of real analog
//! circuitry sounds like. Voss-McCartney layers several random rows that
//! update at power-of-two intervals. Tracking which counter bits flipped
//! means each call redraws only the rows whose interval elapsed, so the
//! cost per sample is O(bits flipped), not O(rows), and no pinking filter
//! is needed.

use crate::gen::rng::Rng;

/// Number of octave rows. 12 rows cover the audible range at typical
/// sample rates.
pub const NUM_ROWS: usize = 12;

const ROW_MASK: u32 = (1 << NUM_ROWS as u32) - 1;

/// Pink noise generator with an owned, seedable RNG.
#[derive(Clone, Debug)]
pub struct PinkNoise {
    rows: [f32; NUM_ROWS],
    running_sum: f32,
    counter: u32,
    rng: Rng,
    seed: u64,
}

impl PinkNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            rows: [0.0; NUM_ROWS],
            running_sum: 0.0,
            counter: 0,
            rng: Rng::from_seed(seed),
            seed,
        }
    }

    /// Return to the exact post-construction state.
    ///
    /// Rows and counter are cleared together: a cleared counter with stale
    /// rows would re-trigger redraws on bits that are already fresh and
    /// cause a brief transient. The RNG is reseeded so a reset stream is
    /// bit-reproducible.
    pub fn reset(&mut self) {
        self.rows = [0.0; NUM_ROWS];
        self.running_sum = 0.0;
        self.counter = 0;
        self.rng = Rng::from_seed(self.seed);
    }

    /// Next pink noise sample, approximately in `[-1.0, 1.0]`.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let last = self.counter;
        self.counter = self.counter.wrapping_add(1);

        // Each set bit in the XOR is a row whose update interval elapsed
        let mut flipped = (last ^ self.counter) & ROW_MASK;
        while flipped != 0 {
            let row = flipped.trailing_zeros() as usize;
            flipped &= flipped - 1;

            self.running_sum -= self.rows[row];
            self.rows[row] = self.rng.next_bipolar();
            self.running_sum += self.rows[row];
        }

        // Fresh white component covers the top octave
        let white = self.rng.next_bipolar();

        (self.running_sum + white) / (NUM_ROWS as f32 + 1.0)
    }
}
