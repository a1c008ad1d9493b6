//! Logging setup for binaries and tests

/// Initialize the logger for terminal applications.
///
/// Defaults to INFO level; `RUST_LOG` overrides it. The processing core never
/// logs from the audio callback, so all records come from setup and lifecycle
/// code.
pub fn init_logger() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_millis()
        .init();
}
