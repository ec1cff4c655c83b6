use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Diagnostics go to stderr so they never mix with command output.
/// `RUST_LOG` wins over `-v`.
pub(super) fn init(verbose: bool) {
    let fallback = if verbose { "portico=debug" } else { "portico=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into());

    // Fails only when a subscriber is already installed.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
