//! Diagnostic logging set-up.
//!
//! Logs go to stderr so they never mix with decoded output. The filter
//! is read from `JWTDEBUG_LOG` (`EnvFilter` syntax); without it only
//! warnings are shown, or debug output with `--verbose`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "JWTDEBUG_LOG";

/// Filter used when `JWTDEBUG_LOG` is unset or invalid.
fn default_directive(verbose: bool) -> &'static str {
    if verbose { "jwtdebug=debug" } else { "warn" }
}

/// Install the global subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "warn");
        assert_eq!(default_directive(true), "jwtdebug=debug");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init(false);
        init(true);
    }
}
