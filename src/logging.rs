//! Structured logging setup (MODULE M — ambient stack). Grounded on the
//! teacher's `tracing` + `tracing-subscriber` dependency pair (see
//! Cargo.toml), generalized from a single fixed format to the `log_format`
//! switch named in `original_source/.../config/logging_config.py`.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogFormat;

/// Initializes the global `tracing` subscriber. Safe to call once per
/// process; a second call is a no-op (the underlying `try_init` just
/// returns an error we discard, matching the original's idempotent
/// `configure_logging`).
pub fn configure_logging(level: &str, format: &LogFormat) {
    let filter = EnvFilter::try_new(level.to_lowercase())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt().with_env_filter(filter).with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Json => subscriber.json().try_init(),
        LogFormat::Console => subscriber.pretty().try_init(),
    };

    if result.is_err() {
        tracing::debug!("logging already initialized, skipping reinit");
    }
}
