//! Tracing subscriber setup for the binary.

use linkguard_bot::BotConfig;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging settings resolved from the configuration and the command line.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit JSON lines instead of human-readable text
    pub json_logs: bool,
}

impl LoggingConfig {
    /// Settings from a loaded configuration; `verbose` forces debug level.
    pub fn from_config(config: Option<&BotConfig>, verbose: bool) -> Self {
        let log_level = if verbose {
            "debug".to_string()
        } else {
            config
                .map(|c| c.log_filter().clone())
                .unwrap_or_else(|| "info".to_string())
        };
        Self {
            log_level,
            json_logs: config.is_some_and(|c| *c.json_logs()),
        }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured filter.
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_level(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_level(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
