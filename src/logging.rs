//! Log subscriber setup.
//!
//! The library only emits `tracing` events; hosts that want them on stdout
//! call [`init_logging`] once at startup. Analytics events are logged under
//! the `boostly::analytics` target, so `RUST_LOG=boostly::analytics=info`
//! shows just the event stream.

use crate::{Error, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Output shape for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single line.
    #[default]
    Compact,
    /// Multi-line with source locations.
    Pretty,
}

/// Parse a level name such as `info` or `DEBUG`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for unknown names.
pub fn parse_level(level: &str) -> Result<Level> {
    level
        .parse::<Level>()
        .map_err(|_| Error::InvalidInput(format!("unknown log level '{level}'")))
}

/// Install a global fmt subscriber.
///
/// `RUST_LOG` overrides `default_level`. Calling this twice is harmless;
/// the second call leaves the first subscriber in place.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for an unknown level name.
pub fn init_logging(default_level: &str, format: LogFormat) -> Result<()> {
    let level = parse_level(default_level)?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    let installed = match format {
        LogFormat::Compact => builder.compact().with_target(true).try_init(),
        LogFormat::Pretty => builder
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .try_init(),
    };
    if let Err(e) = installed {
        tracing::debug!(error = %e, "log subscriber already installed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("info").unwrap(), Level::INFO);
        assert_eq!(parse_level("DEBUG").unwrap(), Level::DEBUG);
        assert!(matches!(parse_level("loud"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging("warn", LogFormat::Compact).unwrap();
        init_logging("debug", LogFormat::Pretty).unwrap();
    }

    #[test]
    fn test_init_logging_rejects_bad_level() {
        assert!(init_logging("chatty", LogFormat::Compact).is_err());
    }
}
