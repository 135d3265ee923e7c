//! Tracing subscriber setup

use crate::config::BmadConfig;
use crate::error::{BmadError, BmadResult};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter from `RUST_LOG`, falling back to `directive`
///
/// # Errors
/// `BmadError::Telemetry` when the fallback directive is malformed
pub fn build_filter(directive: &str) -> BmadResult<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .map_err(|e| BmadError::Telemetry(e.to_string()))
}

/// Install the global subscriber described by `config`
///
/// # Errors
/// `BmadError::Telemetry` when the filter is malformed or a global
/// subscriber is already installed
pub fn init_tracing(config: &BmadConfig) -> BmadResult<()> {
    let filter = build_filter(&config.log_filter)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    installed.map_err(|e| BmadError::Telemetry(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_from_directive() {
        assert!(build_filter("bmad_core=debug,info").is_ok());
    }

    #[test]
    fn second_init_fails() {
        let config = BmadConfig::new().with_log_filter("warn");
        // the first call may already fail if another test installed one
        let _ = init_tracing(&config);
        assert!(init_tracing(&config).is_err());
    }
}
