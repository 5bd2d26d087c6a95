use semlink_core::{ENV_SEMLINK_LOG_JSON, ENV_SEMLINK_LOG_LEVEL};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(raw) => matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

fn level_filter(verbose: u8) -> EnvFilter {
    if verbose > 0 {
        return EnvFilter::new(if verbose == 1 { "debug" } else { "trace" });
    }
    std::env::var(ENV_SEMLINK_LOG_LEVEL)
        .ok()
        .and_then(|level| EnvFilter::try_new(level).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Logs go to stderr so command output on stdout stays parseable.
pub(crate) fn init_tracing(verbose: u8) {
    let filter = level_filter(verbose);
    let result = if env_bool(ENV_SEMLINK_LOG_JSON, false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
