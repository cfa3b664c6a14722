//! Tracing subscriber setup
//!
//! Events go to stderr so that CSV and JSON on stdout stay machine-readable.
//! The filter is taken from `NOVA_LOG`, then `RUST_LOG`, then the config file,
//! and defaults to `warn`.

use tracing_subscriber::EnvFilter;

/// Environment variable with the log filter directive
pub const LOG_ENV: &str = "NOVA_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Pick the filter directive; `verbose` raises the `nova` target to debug
pub fn filter_directive(verbose: bool, configured: Option<&str>) -> String {
    let base = std::env::var(LOG_ENV)
        .ok()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .filter(|v| !v.trim().is_empty())
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string());

    if verbose {
        format!("{},nova=debug", base)
    } else {
        base
    }
}

/// Install the global subscriber; later calls are no-ops
pub fn init(verbose: bool, configured: Option<&str>) {
    let directive = filter_directive(verbose, configured);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_adds_debug_for_nova() {
        let directive = filter_directive(true, Some("info"));
        assert!(directive.ends_with(",nova=debug"));
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false, None);
        init(true, None);
    }
}
