//! Startup and runtime errors surfaced to `main`.

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("WebSocket server error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Gateway task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;

    #[test]
    fn rejected_config_surfaces_validation_reason() {
        let mut config = GatewayConfig::default();
        config.protocol.opcodes.heartbeat = String::new();
        let err: GatewayError = config
            .validate()
            .map_err(ConfigError::from)
            .unwrap_err()
            .into();
        assert!(matches!(
            err,
            GatewayError::Config(ConfigError::ValidationFailed(_))
        ));
        assert!(err.to_string().starts_with("Validation failed: "));
    }
}
