use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset. Progress output goes to stdout,
/// so diagnostics stay quiet unless asked for.
const DEFAULT_FILTER: &str = "warn";

/// Held by `main` for the lifetime of the process.
pub struct TelemetryGuard;

/// Install the stderr fmt subscriber. Safe to call more than once; later
/// calls are no-ops.
pub fn init() -> TelemetryGuard {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    TelemetryGuard
}
