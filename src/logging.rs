// contact-deck/src/logging.rs

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// `RUST_LOG` wins over the configured filter; "info" when neither is set.
pub fn resolve_filter(cfg: &LoggingConfig, env: Option<String>) -> String {
    env.filter(|v| !v.trim().is_empty())
        .or_else(|| cfg.filter.clone())
        .unwrap_or_else(|| "info".into())
}

/// Installs a fmt subscriber. Calling it twice is harmless: the second install is ignored.
pub fn init(cfg: &LoggingConfig) {
    let filter = resolve_filter(cfg, std::env::var("RUST_LOG").ok());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .try_init();
}
