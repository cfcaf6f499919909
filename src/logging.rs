//! Logger setup
//!
//! Browser console on WASM, `env_logger` natively (`RUST_LOG` still wins).

/// Install the platform logger; safe to call more than once
#[cfg(target_arch = "wasm32")]
pub fn init(level: log::Level) {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(level).is_err() {
        log::debug!("Logger already initialized");
    }
}

/// Install the platform logger; safe to call more than once
#[cfg(not(target_arch = "wasm32"))]
pub fn init(level: log::Level) {
    let filter = level.as_str().to_lowercase();
    let result = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .try_init();
    if result.is_err() {
        log::debug!("Logger already initialized");
    }
}
