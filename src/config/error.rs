//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number for {0}")]
    InvalidPort(&'static str),

    #[error("Heartbeat interval must be at least one second")]
    InvalidHeartbeatInterval,

    #[error("Reconnect delay must be at least one second")]
    InvalidReconnectDelay,

    #[error("Opcode for {0} is empty")]
    EmptyOpcode(&'static str),

    #[error("Opcode {0} is assigned to more than one command")]
    DuplicateOpcode(String),
}
