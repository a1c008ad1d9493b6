use std::f32::consts::TAU;

/// First-order highpass, RC analog model
///
/// Used to strip sub-audio rumble from the generated noise before it is
/// summed into the signal; the dry/wet path never runs through it. The
/// difference equation is `y[n] = α·(y[n-1] + x[n] - x[n-1])` with
/// `α = RC/(RC + dt)` and `RC = 1/(2π·fc)`.
pub struct FirstOrderHighpass {
    sample_rate: f32,
    alpha: f32,
    x1: f32,
    y1: f32,
    last_cutoff: f32,
}

impl FirstOrderHighpass {
    pub fn new(sample_rate: f32, cutoff_hz: f32) -> Self {
        let mut filter = Self {
            sample_rate,
            alpha: 0.0,
            x1: 0.0,
            y1: 0.0,
            last_cutoff: -1.0,
        };
        filter.set_cutoff(cutoff_hz);
        filter
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.y1 = 0.0;
    }

    /// Update the cutoff, recomputing α only on a real change.
    #[inline]
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        if (cutoff_hz - self.last_cutoff).abs() < 0.01 {
            return;
        }
        self.last_cutoff = cutoff_hz;

        let rc = 1.0 / (TAU * cutoff_hz.max(1.0));
        let dt = 1.0 / self.sample_rate;
        self.alpha = rc / (rc + dt);
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.alpha * (self.y1 + input - self.x1);

        self.x1 = input;
        self.y1 = if output.abs() < 1e-15 { 0.0 } else { output };

        output
    }
}
