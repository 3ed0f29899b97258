//! Provides utilities to initialize logging.
use std::env;

use tracing::*;
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// Environment variable name for the service label, which is appended to the
/// whoami string.
pub const SVC_LABEL_ENVVAR: &str = "WEIGHTLOCK_SVC_LABEL";

/// Configuration for the logger.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// The whoami string, which is used to identify the service in logs.
    whoami: String,

    /// Level used when `RUST_LOG` is not set.
    default_level: LevelFilter,
}

impl LoggerConfig {
    /// Creates a new instance with whoami set, logging at `INFO` unless `RUST_LOG` says otherwise.
    pub const fn new(whoami: String) -> Self {
        Self {
            whoami,
            default_level: LevelFilter::INFO,
        }
    }

    /// Creates a new instance with the whoami string set to the provided
    /// string.
    pub fn with_base_name(s: &str) -> Self {
        Self::new(get_whoami_string(s))
    }

    /// The whoami string.
    pub fn whoami(&self) -> &str {
        &self.whoami
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::with_base_name("(weightlock)")
    }
}

/// Initializes the logging subsystem with the provided config.
///
/// Logs go to stderr so that binaries can keep stdout for their output.
pub fn init(config: LoggerConfig) {
    let filt = EnvFilter::builder()
        .with_default_directive(config.default_level.into())
        .from_env_lossy();

    let log_file = env::var("LOG_FILE").is_ok_and(|v| v == "1");
    let log_line_num = env::var("LOG_LINE_NUM").is_ok_and(|v| v == "1");

    let stderr_sub = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .event_format(
            tracing_subscriber::fmt::format()
                .with_file(log_file)
                .with_line_number(log_line_num),
        )
        .with_filter(filt);

    tracing_subscriber::registry().with(stderr_sub).init();

    info!(whoami = %config.whoami, "logging started");
}

/// Gets the service label from the standard envvar, which should be included
/// in the whoami string.
pub fn get_service_label_from_env() -> Option<String> {
    env::var(SVC_LABEL_ENVVAR).ok()
}

/// Computes a standard whoami string.
pub fn get_whoami_string(base: &str) -> String {
    match get_service_label_from_env() {
        Some(label) => format!("{base}%{label}"),
        None => base.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whoami_starts_with_base_name() {
        let config = LoggerConfig::with_base_name("(weightlock-sim)");
        assert!(config.whoami().starts_with("(weightlock-sim)"));
    }
}
