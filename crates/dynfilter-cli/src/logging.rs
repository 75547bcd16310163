//! Tracing subscriber setup for the command line.
//!
//! `DYNFILTER_LOG` takes an `EnvFilter` directive (`dynfilter=trace`,
//! `debug`, ...). Without it, the level follows the `-v` count.

use tracing_subscriber::EnvFilter;

/// Environment variable read for filter directives.
pub const LOG_ENV: &str = "DYNFILTER_LOG";

/// Default directive for a `-v` count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber, writing to stderr so stdout stays clean
/// for piped output. Does nothing if a subscriber is already set.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(default_directive(0), "warn");
        assert_eq!(default_directive(1), "debug");
        assert_eq!(default_directive(2), "trace");
        assert_eq!(default_directive(9), "trace");
    }

    #[test]
    fn init_twice_is_harmless() {
        init(0);
        init(3);
    }
}
