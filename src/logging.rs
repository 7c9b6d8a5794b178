//! Tracing subscriber setup for the command-line tool.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `--verbose` nor `RUST_LOG` says otherwise.
pub const DEFAULT_FILTER: &str = "comprehender=info,warn";

/// Filter used with `--verbose` when `RUST_LOG` is unset.
pub const VERBOSE_FILTER: &str = "comprehender=debug,info";

/// `RUST_LOG` wins when set and valid, in both modes.
pub fn filter_for(verbose: bool) -> EnvFilter {
    filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(), verbose)
}

fn filter_from(directives: Option<&str>, verbose: bool) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| {
            EnvFilter::new(if verbose {
                VERBOSE_FILTER
            } else {
                DEFAULT_FILTER
            })
        })
}

/// Install the global subscriber. Call once, before any logging.
///
/// Output goes to stderr so generated documents can be piped from stdout.
pub fn init_logging(verbose: bool) {
    let fmt_layer = fmt::layer()
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .compact();

    // A second call (e.g. from tests) leaves the first subscriber in place.
    let _ = tracing_subscriber::registry()
        .with(filter_for(verbose))
        .with(fmt_layer)
        .try_init();
}
