//! Logger initialization for native and browser hosts.
//!
//! Natively the `log` facade is backed by `env_logger` and honors `RUST_LOG`. In the
//! browser it is backed by `console_log`, which writes to the developer console.

use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "tetra_demo=debug,wgpu=warn"). It is ignored in the browser, where only `level`
/// applies.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub level: log::LevelFilter,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            level: log::LevelFilter::Info,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut builder = env_logger::Builder::new();

            if let Some(filter) = config.env_filter {
                builder.parse_filters(&filter);
            } else if let Ok(filter) = std::env::var("RUST_LOG") {
                builder.parse_filters(&filter);
            } else {
                builder
                    .filter_level(config.level)
                    .filter_module("wgpu_core", log::LevelFilter::Warn)
                    .filter_module("wgpu_hal", log::LevelFilter::Warn)
                    .filter_module("naga", log::LevelFilter::Warn);
            }

            // Tests may have installed a logger already.
            if builder.try_init().is_err() {
                return;
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            let level = config.level.to_level().unwrap_or(log::Level::Error);
            if console_log::init_with_level(level).is_err() {
                return;
            }
        }

        log::debug!("logging initialized");
    });
}
