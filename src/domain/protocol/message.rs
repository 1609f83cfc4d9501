//! The protocol message exchanged on both transports, plus the builders for
//! gateway-originated messages.

use serde_json::{Map, Value};

use crate::domain::foundation::Timestamp;
use crate::domain::lighting::{BinaryState, DeviceId};

use super::opcodes::{Command, OpcodeTable};

/// `nodeMac` addressing every device.
pub const BROADCAST_NODE_MAC: &str = "FFFFFFFFFFFF";

/// `nodeMac` marking a gateway-originated message.
pub const SYSTEM_NODE_MAC: &str = "SYSTEM";

/// Wire names of the schema fields, in canonical order.
mod field {
    pub const PROTOCOL: &str = "protocol";
    pub const FIRMWARE_VERSION: &str = "firmwareVersion";
    pub const HEADER: &str = "header";
    pub const GATEWAY_MAC: &str = "gatewayMac";
    pub const COMMAND: &str = "command";
    pub const NODE_MAC: &str = "nodeMac";
    pub const ACTION_VALUE: &str = "actionValue";
    pub const CURRENT_VALUE: &str = "currentValue";
    pub const CURRENT_DATE: &str = "currentDate";
    pub const CURRENT_TIME: &str = "currentTime";
    pub const FOOTER: &str = "footer";
}

/// One protocol message.
///
/// The JSON object is kept exactly as received, in field order, so a relayed
/// command carries what the client sent and nothing more. Schema fields are
/// read leniently: a missing or non-string value reads as `""`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolMessage {
    fields: Map<String, Value>,
}

impl ProtocolMessage {
    /// Wrap a decoded JSON object.
    pub(super) fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub(super) fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Copy of this message with `currentDate`/`currentTime` set to `at`.
    ///
    /// Existing timestamp fields keep their position; absent ones are appended.
    pub(super) fn stamped(&self, at: Timestamp) -> Self {
        let mut fields = self.fields.clone();
        fields.insert(field::CURRENT_DATE.to_string(), at.protocol_date().into());
        fields.insert(field::CURRENT_TIME.to_string(), at.protocol_time().into());
        Self { fields }
    }

    /// Raw value of any field, including ones outside the schema.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    fn text(&self, key: &str) -> &str {
        self.fields.get(key).and_then(Value::as_str).unwrap_or("")
    }

    pub fn protocol(&self) -> &str {
        self.text(field::PROTOCOL)
    }

    pub fn firmware_version(&self) -> &str {
        self.text(field::FIRMWARE_VERSION)
    }

    pub fn header(&self) -> &str {
        self.text(field::HEADER)
    }

    pub fn gateway_mac(&self) -> &str {
        self.text(field::GATEWAY_MAC)
    }

    /// Opcode text. A non-string opcode reads as `""` and never classifies.
    pub fn command(&self) -> &str {
        self.text(field::COMMAND)
    }

    pub fn node_mac(&self) -> &str {
        self.text(field::NODE_MAC)
    }

    pub fn action_value(&self) -> &str {
        self.text(field::ACTION_VALUE)
    }

    pub fn current_value(&self) -> &str {
        self.text(field::CURRENT_VALUE)
    }

    pub fn current_date(&self) -> &str {
        self.text(field::CURRENT_DATE)
    }

    pub fn current_time(&self) -> &str {
        self.text(field::CURRENT_TIME)
    }

    pub fn footer(&self) -> &str {
        self.text(field::FOOTER)
    }

    /// `actionValue` read as a binary state.
    pub fn action_state(&self) -> BinaryState {
        BinaryState::from_wire(self.action_value())
    }

    /// `currentValue` read as a binary state.
    pub fn current_state(&self) -> BinaryState {
        BinaryState::from_wire(self.current_value())
    }
}

/// Fixed envelope values stamped onto every gateway-built message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolIdentity {
    pub protocol: String,
    pub firmware_version: String,
    pub header: String,
    pub footer: String,
    pub gateway_mac: String,
    pub node_mac: String,
}

impl Default for ProtocolIdentity {
    fn default() -> Self {
        Self {
            protocol: "ILCMS".to_string(),
            firmware_version: "wmv2".to_string(),
            header: "0x01".to_string(),
            footer: "0xA3".to_string(),
            gateway_mac: "800000fff0000001".to_string(),
            node_mac: "011221f6fe01201".to_string(),
        }
    }
}

/// Everything needed to interpret and build protocol messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolProfile {
    pub identity: ProtocolIdentity,
    pub opcodes: OpcodeTable,
    pub heartbeat_interval_secs: u64,
}

impl Default for ProtocolProfile {
    fn default() -> Self {
        Self {
            identity: ProtocolIdentity::default(),
            opcodes: OpcodeTable::default(),
            heartbeat_interval_secs: 30,
        }
    }
}

impl ProtocolProfile {
    /// Classify a message's opcode.
    pub fn classify(&self, message: &ProtocolMessage) -> Command {
        self.opcodes.classify(message.command())
    }

    /// Per-device acknowledgement carrying the device's state.
    pub fn lamp_ack(&self, device: DeviceId, on: bool) -> ProtocolMessage {
        self.node_ack(device.as_str(), on)
    }

    /// Acknowledgement addressed to an arbitrary node identifier.
    pub fn node_ack(&self, node_mac: &str, on: bool) -> ProtocolMessage {
        let value = BinaryState::from(on).as_str();
        self.build(&self.opcodes.lamp_ack, node_mac, value)
    }

    /// Group status addressed to every device.
    pub fn group_status(&self, on: bool) -> ProtocolMessage {
        let value = BinaryState::from(on).as_str();
        self.build(&self.opcodes.group_status, BROADCAST_NODE_MAC, value)
    }

    /// Heartbeat carrying the interval in seconds.
    pub fn heartbeat(&self) -> ProtocolMessage {
        let interval = self.heartbeat_interval_secs.to_string();
        self.build(&self.opcodes.heartbeat, SYSTEM_NODE_MAC, &interval)
    }

    fn build(&self, command: &str, node_mac: &str, value: &str) -> ProtocolMessage {
        let identity = &self.identity;
        let entries = [
            (field::PROTOCOL, identity.protocol.as_str()),
            (field::FIRMWARE_VERSION, identity.firmware_version.as_str()),
            (field::HEADER, identity.header.as_str()),
            (field::GATEWAY_MAC, identity.gateway_mac.as_str()),
            (field::COMMAND, command),
            (field::NODE_MAC, node_mac),
            (field::ACTION_VALUE, value),
            (field::CURRENT_VALUE, value),
            (field::CURRENT_DATE, ""),
            (field::CURRENT_TIME, ""),
            (field::FOOTER, identity.footer.as_str()),
        ];
        let fields = entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), Value::from(value)))
            .collect();
        ProtocolMessage::from_fields(fields)
    }
}
