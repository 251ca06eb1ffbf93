//! Logging initialization.
//!
//! Diagnostics go to stderr through `tracing`; stdout is reserved for the
//! report table. `RUST_LOG` adds directives on top of the default level.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize console logging at `level` (plus any `RUST_LOG` directives).
pub fn init_telemetry(level: Level) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Map a `-q`/`-d` style verbosity onto a level.
pub fn level_for(quiet: bool, debug: bool) -> Level {
    match (quiet, debug) {
        (_, true) => Level::DEBUG,
        (true, false) => Level::WARN,
        (false, false) => Level::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(false, false), Level::INFO);
        assert_eq!(level_for(true, false), Level::WARN);
        assert_eq!(level_for(false, true), Level::DEBUG);
        assert_eq!(level_for(true, true), Level::DEBUG);
    }
}
