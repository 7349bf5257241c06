//! Tracing subscriber setup for the binary.
//!
//! Output goes to stderr so digests on stdout stay pipeable. `RUST_LOG`, when
//! set, takes precedence over the configured level.

use std::io;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{LogFormat, LogSettings};

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Installs the global subscriber. A second call is a no-op.
pub fn init(settings: &LogSettings) -> Result<(), String> {
    let filter = env_filter(&settings.level);
    let layer = match settings.format {
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(io::stderr)
            .with_target(false)
            .with_filter(filter)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .or_else(|e| {
            // tests and embedding callers may have installed one already
            if e.to_string().contains("already") {
                Ok(())
            } else {
                Err(format!("Failed to initialize tracing: {e}"))
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_is_tolerated() {
        let settings = LogSettings::default();
        assert!(init(&settings).is_ok());
        assert!(init(&LogSettings {
            level: "debug".to_owned(),
            format: LogFormat::Pretty,
        })
        .is_ok());
    }
}
