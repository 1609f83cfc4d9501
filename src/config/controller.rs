//! Lighting controller connection configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::tcp::TcpConnector;

/// Where the hardware controller listens and how to reconnect to it
#[derive(Debug, Clone, Deserialize)]
pub struct ControllerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Delay before a reconnect attempt after the link drops
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_secs: u64,
}

impl ControllerConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }

    /// Connector for the configured controller address
    pub fn connector(&self) -> TcpConnector {
        TcpConnector::new(self.host.clone(), self.port)
    }

    /// Validate controller configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.host.trim().is_empty() {
            return Err(ValidationError::MissingRequired("controller.host"));
        }
        if self.port == 0 {
            return Err(ValidationError::InvalidPort("controller"));
        }
        if self.reconnect_delay_secs == 0 {
            return Err(ValidationError::InvalidReconnectDelay);
        }
        Ok(())
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            reconnect_delay_secs: default_reconnect_delay(),
        }
    }
}

fn default_host() -> String {
    "192.168.1.100".to_string()
}

fn default_port() -> u16 {
    8888
}

fn default_reconnect_delay() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ControllerConnector;

    #[test]
    fn test_controller_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.host, "192.168.1.100");
        assert_eq!(config.port, 8888);
        assert_eq!(config.reconnect_delay(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_connector_targets_configured_address() {
        let config = ControllerConfig {
            host: "10.0.0.7".to_string(),
            port: 9000,
            ..Default::default()
        };
        assert_eq!(config.connector().target(), "10.0.0.7:9000");
    }

    #[test]
    fn test_validation_rejects_zero_values() {
        let config = ControllerConfig {
            port: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPort("controller")));

        let config = ControllerConfig {
            reconnect_delay_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidReconnectDelay));
    }
}
