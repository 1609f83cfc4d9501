//! Protocol identity, opcode and heartbeat configuration

use serde::Deserialize;
use std::collections::HashSet;

use super::error::ValidationError;
use crate::domain::protocol::{OpcodeTable, ProtocolIdentity, ProtocolProfile};

/// Envelope values stamped on gateway-built messages
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    pub protocol: String,
    pub firmware_version: String,
    pub header: String,
    pub footer: String,
    pub gateway_mac: String,
    pub node_mac: String,
    pub heartbeat_interval_secs: u64,
    pub opcodes: OpcodeConfig,
}

/// Wire opcode per command
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpcodeConfig {
    pub lamp_control: String,
    pub group_control: String,
    pub lamp_ack: String,
    pub group_status: String,
    pub circuit_control: String,
    pub heartbeat: String,
}

impl ProtocolConfig {
    /// Build the runtime profile used to classify and construct messages
    pub fn profile(&self) -> ProtocolProfile {
        ProtocolProfile {
            identity: ProtocolIdentity {
                protocol: self.protocol.clone(),
                firmware_version: self.firmware_version.clone(),
                header: self.header.clone(),
                footer: self.footer.clone(),
                gateway_mac: self.gateway_mac.clone(),
                node_mac: self.node_mac.clone(),
            },
            opcodes: self.opcodes.table(),
            heartbeat_interval_secs: self.heartbeat_interval_secs,
        }
    }

    /// Validate protocol configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.heartbeat_interval_secs == 0 {
            return Err(ValidationError::InvalidHeartbeatInterval);
        }
        if self.gateway_mac.trim().is_empty() {
            return Err(ValidationError::MissingRequired("protocol.gateway_mac"));
        }
        self.opcodes.validate()
    }
}

impl OpcodeConfig {
    fn table(&self) -> OpcodeTable {
        OpcodeTable {
            lamp_control: self.lamp_control.clone(),
            group_control: self.group_control.clone(),
            lamp_ack: self.lamp_ack.clone(),
            group_status: self.group_status.clone(),
            circuit_control: self.circuit_control.clone(),
            heartbeat: self.heartbeat.clone(),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let named = [
            ("lamp_control", &self.lamp_control),
            ("group_control", &self.group_control),
            ("lamp_ack", &self.lamp_ack),
            ("group_status", &self.group_status),
            ("circuit_control", &self.circuit_control),
            ("heartbeat", &self.heartbeat),
        ];

        let mut seen = HashSet::new();
        for (name, code) in named {
            if code.trim().is_empty() {
                return Err(ValidationError::EmptyOpcode(name));
            }
            if !seen.insert(code.as_str()) {
                return Err(ValidationError::DuplicateOpcode(code.clone()));
            }
        }
        Ok(())
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        let profile = ProtocolProfile::default();
        let identity = profile.identity;
        Self {
            protocol: identity.protocol,
            firmware_version: identity.firmware_version,
            header: identity.header,
            footer: identity.footer,
            gateway_mac: identity.gateway_mac,
            node_mac: identity.node_mac,
            heartbeat_interval_secs: profile.heartbeat_interval_secs,
            opcodes: OpcodeConfig::default(),
        }
    }
}

impl Default for OpcodeConfig {
    fn default() -> Self {
        let table = OpcodeTable::default();
        Self {
            lamp_control: table.lamp_control,
            group_control: table.group_control,
            lamp_ack: table.lamp_ack,
            group_status: table.group_status,
            circuit_control: table.circuit_control,
            heartbeat: table.heartbeat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds_default_profile() {
        let config = ProtocolConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.profile(), ProtocolProfile::default());
    }

    #[test]
    fn custom_opcode_flows_into_profile() {
        let mut config = ProtocolConfig::default();
        config.opcodes.lamp_control = "0xF011".to_string();

        let profile = config.profile();
        assert_eq!(profile.opcodes.lamp_control, "0xF011");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_heartbeat_interval_is_rejected() {
        let config = ProtocolConfig {
            heartbeat_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidHeartbeatInterval)
        );
    }

    #[test]
    fn empty_opcode_is_rejected() {
        let mut config = ProtocolConfig::default();
        config.opcodes.group_status = String::new();
        assert_eq!(
            config.validate(),
            Err(ValidationError::EmptyOpcode("group_status"))
        );
    }

    #[test]
    fn duplicate_opcode_is_rejected() {
        let mut config = ProtocolConfig::default();
        config.opcodes.heartbeat = "0xC003".to_string();
        assert_eq!(
            config.validate(),
            Err(ValidationError::DuplicateOpcode("0xC003".to_string()))
        );
    }
}
