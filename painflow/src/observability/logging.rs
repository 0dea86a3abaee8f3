//! Global tracing subscriber setup.

use crate::config::LoggingConfig;
use crate::errors::PainflowError;
use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `config.filter`. Calling this twice
/// returns a [`PainflowError::Config`] instead of panicking.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), PainflowError> {
    let filter = resolve_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok(), &config.filter)?;

    let result = if config.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    result.map_err(|e| PainflowError::Config(format!("tracing already initialised: {e}")))
}

/// Picks the environment directive when it parses, else the configured one.
fn resolve_filter(from_env: Option<String>, configured: &str) -> Result<EnvFilter, PainflowError> {
    if let Some(Ok(filter)) = from_env.as_deref().map(EnvFilter::try_new) {
        return Ok(filter);
    }
    EnvFilter::try_new(configured)
        .map_err(|e| PainflowError::Config(format!("invalid log filter {configured}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_env_directive_wins() {
        let filter = resolve_filter(Some("painflow=debug".to_string()), "painflow=info").unwrap();
        assert_eq!(filter.to_string(), "painflow=debug");
    }

    #[test]
    fn test_unparsable_env_falls_back_to_config() {
        let filter = resolve_filter(Some("painflow=loudest".to_string()), "painflow=warn").unwrap();
        assert_eq!(filter.to_string(), "painflow=warn");

        let filter = resolve_filter(None, "painflow=info").unwrap();
        assert_eq!(filter.to_string(), "painflow=info");
    }

    #[test]
    fn test_invalid_configured_filter_is_config_error() {
        let err = resolve_filter(None, "painflow=loudest").unwrap_err();
        assert!(matches!(err, PainflowError::Config(_)));
    }

    #[test]
    fn test_resolved_filter_scopes_levels() {
        let filter = resolve_filter(None, "painflow=info").unwrap();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(target: "painflow::pipeline", Level::INFO));
            assert!(!tracing::enabled!(target: "painflow::pipeline", Level::DEBUG));
        });
    }
}
