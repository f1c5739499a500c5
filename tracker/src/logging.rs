use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "clickup_tracker=info,clickup=info";
const VERBOSE_FILTER: &str = "clickup_tracker=debug,clickup=debug";

/// Install the global subscriber. Logs go to stderr so they never mix with
/// the shell's output. `RUST_LOG` wins over `verbose`.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    }
}
