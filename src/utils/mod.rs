//! Utility modules for audio processing

pub mod db;
pub mod logging;
pub mod smoother;

pub use db::{db_to_gain, gain_to_db};
pub use logging::init_logger;
pub use smoother::{SmoothedParam, DEFAULT_RAMP_MS};
