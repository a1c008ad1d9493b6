//! Signal generators for the noise path

pub mod pink_noise;
pub mod rng;

pub use self::pink_noise::PinkNoise;
pub use self::rng::Rng;
