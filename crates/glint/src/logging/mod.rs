//! Logger initialization.
//!
//! The wrapper reports every GPU object create/delete at debug level and every
//! failure at error level through the `log` facade. This module wires up the
//! `env_logger` backend; callers that already own a logger can skip it.

use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` uses `env_logger` filter syntax (e.g. "info",
/// "glint=debug,glint_demos=info"). When `None`, `RUST_LOG` wins, then a
/// warn-level default.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
///
/// Intended usage is the first line of `main`, before [`crate::Glint::init`],
/// so that context setup failures are visible.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            // Object-lifecycle chatter is debug level; keep the default quiet.
            builder.filter_level(log::LevelFilter::Warn);
        }

        builder.init();

        log::debug!("logging initialized");
    });
}
