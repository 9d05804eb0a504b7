//! Telemetry initialization (tracing + fmt subscriber).
//!
//! Sets up `tracing-subscriber` with console output. The log level is
//! controlled via the standard `RUST_LOG` environment variable and defaults
//! to `info` when unset:
//!
//! ```bash
//! RUST_LOG=userd=debug,sqlx=warn userd -f config.yaml
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize tracing with a fmt layer and env-filter.
///
/// Returns an error if a global subscriber has already been installed.
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}
