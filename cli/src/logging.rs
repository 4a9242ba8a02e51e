use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the global subscriber. `RUST_LOG` wins over the configured level;
/// `--verbose` forces debug output for the jarvis crates.
pub fn init(log_level: &str, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info,jarvis_core=debug,jarvis_memory=debug,jarvis_orchestrator=debug,jarvis=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
    };

    // Replies go to stdout, diagnostics to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}
