//! tracing subscriber setup. Logs go to stderr so stdout stays pipeable.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::ChronoUtc;

/// Filter comes from `WPBP_LOG`, then `RUST_LOG`, then the verbosity default.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "wpblueprint=debug" } else { "wpblueprint=warn" };
    let filter = EnvFilter::try_from_env("WPBP_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(ChronoUtc::rfc_3339())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        init_tracing(true);
        init_tracing(false);
        tracing::debug!("logged with a UTC timestamp");
    }
}
