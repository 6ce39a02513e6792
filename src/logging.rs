//! Structured logging setup.
//!
//! Thin `tracing` subscriber initialization for embedding applications. The
//! filter comes from the `TREESEAL_LOG` environment variable when set,
//! otherwise from the configured level; format is text or JSON with RFC 3339
//! UTC timestamps.

use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Enable colored output (text format only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            color: default_true(),
        }
    }
}

/// Initialize the logging system.
///
/// `TREESEAL_LOG` overrides the configured level; `TREESEAL_LOG_FORMAT`
/// overrides the configured format. Safe to call more than once: a second
/// initialization is a no-op.
pub fn init_logging(config: Option<&LoggingConfig>) {
    let filter = EnvFilter::try_from_env("TREESEAL_LOG").unwrap_or_else(|_| {
        EnvFilter::new(config.map(|c| c.level.as_str()).unwrap_or("info"))
    });

    let format = std::env::var("TREESEAL_LOG_FORMAT")
        .ok()
        .filter(|f| f == "json" || f == "text")
        .unwrap_or_else(|| config.map(|c| c.format.clone()).unwrap_or_else(default_format));

    let use_color = config.map(|c| c.color).unwrap_or(true);
    let base_subscriber = Registry::default().with(filter);

    if format == "json" {
        let _ = base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stdout),
            )
            .try_init();
    } else {
        let _ = base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(use_color)
                    .with_writer(std::io::stdout),
            )
            .try_init();
    }
}
