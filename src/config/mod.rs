//! Gateway configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `LIGHTING_GATEWAY` prefix and nested values use double underscores as separators.
//! Every value has a default, so an empty environment yields a runnable gateway.
//!
//! # Example
//!
//! ```no_run
//! use lighting_gateway::config::GatewayConfig;
//!
//! let config = GatewayConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("WebSocket server on {}", config.server.bind_address());
//! ```

mod controller;
mod error;
mod protocol;
mod server;

pub use controller::ControllerConfig;
pub use error::{ConfigError, ValidationError};
pub use protocol::{OpcodeConfig, ProtocolConfig};
pub use server::{LogFormat, ServerConfig};

use serde::Deserialize;

/// Root gateway configuration
///
/// Load using [`GatewayConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayConfig {
    /// WebSocket server and logging
    #[serde(default)]
    pub server: ServerConfig,

    /// Hardware controller address and reconnect policy
    #[serde(default)]
    pub controller: ControllerConfig,

    /// Protocol identity, opcodes and heartbeat
    #[serde(default)]
    pub protocol: ProtocolConfig,
}

impl GatewayConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `LIGHTING_GATEWAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `LIGHTING_GATEWAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `LIGHTING_GATEWAY__CONTROLLER__HOST=10.0.0.5` -> `controller.host = 10.0.0.5`
    /// - `LIGHTING_GATEWAY__PROTOCOL__OPCODES__LAMP_ACK=0xC003` -> `protocol.opcodes.lamp_ack`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("LIGHTING_GATEWAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.controller.validate()?;
        self.protocol.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 5] = [
        "LIGHTING_GATEWAY__SERVER__PORT",
        "LIGHTING_GATEWAY__SERVER__LOG_FORMAT",
        "LIGHTING_GATEWAY__CONTROLLER__HOST",
        "LIGHTING_GATEWAY__PROTOCOL__HEARTBEAT_INTERVAL_SECS",
        "LIGHTING_GATEWAY__PROTOCOL__OPCODES__LAMP_ACK",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = GatewayConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.controller.host, "192.168.1.100");
        assert_eq!(config.controller.port, 8888);
        assert_eq!(config.protocol.heartbeat_interval_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("LIGHTING_GATEWAY__SERVER__PORT", "3000");
        env::set_var("LIGHTING_GATEWAY__SERVER__LOG_FORMAT", "json");
        env::set_var("LIGHTING_GATEWAY__CONTROLLER__HOST", "10.0.0.5");
        env::set_var("LIGHTING_GATEWAY__PROTOCOL__HEARTBEAT_INTERVAL_SECS", "10");
        env::set_var("LIGHTING_GATEWAY__PROTOCOL__OPCODES__LAMP_ACK", "0xC0FF");
        let result = GatewayConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.controller.host, "10.0.0.5");
        assert_eq!(config.protocol.heartbeat_interval_secs, 10);
        assert_eq!(config.protocol.profile().opcodes.lamp_ack, "0xC0FF");
    }

    #[test]
    fn test_invalid_value_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("LIGHTING_GATEWAY__SERVER__PORT", "not-a-port");
        let result = GatewayConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_validate_reports_first_bad_section() {
        let mut config = GatewayConfig::default();
        config.controller.reconnect_delay_secs = 0;
        assert_eq!(config.validate(), Err(ValidationError::InvalidReconnectDelay));
    }

    #[test]
    fn test_validation_error_wraps_as_validation_failed() {
        let err = ConfigError::from(ValidationError::InvalidHeartbeatInterval);
        assert!(matches!(
            err,
            ConfigError::ValidationFailed(ValidationError::InvalidHeartbeatInterval)
        ));
        assert_eq!(
            err.to_string(),
            "Validation failed: Heartbeat interval must be at least one second"
        );
    }
}
