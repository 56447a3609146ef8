//! Logging setup for the binary.
//!
//! Everything goes to stderr; stdout carries the generated rules.

use std::io::{self, IsTerminal};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Warnings, plus the source discovery mode chosen by the pipeline.
const DEFAULT_FILTER: &str = "warn,unit_graph::run=info";
const VERBOSE_FILTER: &str = "debug,unit_graph=debug";

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// `RUST_LOG` wins; otherwise the default or verbose filter.
fn env_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: bool) {
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_timer(ChronoRfc3339Utc)
        .with_target(verbose)
        .with_ansi(io::stderr().is_terminal())
        .compact();

    let _ = tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    /// (run info, run debug, scan info, scan debug) under `filter`.
    fn enabled_under(filter: &str) -> (bool, bool, bool, bool) {
        let subscriber = tracing_subscriber::registry().with(EnvFilter::new(filter));
        tracing::subscriber::with_default(subscriber, || {
            (
                tracing::enabled!(target: "unit_graph::run", Level::INFO),
                tracing::enabled!(target: "unit_graph::run", Level::DEBUG),
                tracing::enabled!(target: "unit_graph::core::fs_scan", Level::INFO),
                tracing::enabled!(target: "unit_graph::core::fs_scan", Level::DEBUG),
            )
        })
    }

    #[test]
    fn only_discovery_mode_is_shown_by_default() {
        assert_eq!(enabled_under(DEFAULT_FILTER), (true, false, false, false));
        assert_eq!(enabled_under(VERBOSE_FILTER), (true, true, true, true));
    }
}
