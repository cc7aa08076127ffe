//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Default filter, raised to debug by `--verbose`
const DEFAULT_FILTER: &str = "audio_memo=warn";
const VERBOSE_FILTER: &str = "audio_memo=debug";

/// Install the stderr subscriber. `RUST_LOG` takes precedence.
pub fn init_logging(verbose: bool) {
    let default = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Fails only if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
