//! Filters for tone shaping and noise conditioning

pub mod biquad_lowpass;
pub mod first_order_highpass;
pub mod tilt_shelf;
pub mod tone;

pub use self::biquad_lowpass::BiquadLowpass;
pub use self::first_order_highpass::FirstOrderHighpass;
pub use self::tilt_shelf::TiltShelf;
pub use self::tone::{ToneMode, ToneShaper};
