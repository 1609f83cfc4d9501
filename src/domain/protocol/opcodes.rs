//! Command opcodes and their classification.

/// Commands the gateway distinguishes.
///
/// Anything the opcode table does not recognise is `Other`; such messages
/// are still relayed to the controller but never interpreted locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    LampControl,
    GroupControl,
    LampAck,
    GroupStatus,
    CircuitControl,
    Heartbeat,
    Other,
}

/// Wire codes for each [`Command`], supplied by configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpcodeTable {
    pub lamp_control: String,
    pub group_control: String,
    pub lamp_ack: String,
    pub group_status: String,
    pub circuit_control: String,
    pub heartbeat: String,
}

impl OpcodeTable {
    /// Map a wire opcode to a [`Command`].
    pub fn classify(&self, code: &str) -> Command {
        match code {
            c if c == self.lamp_control => Command::LampControl,
            c if c == self.group_control => Command::GroupControl,
            c if c == self.lamp_ack => Command::LampAck,
            c if c == self.group_status => Command::GroupStatus,
            c if c == self.circuit_control => Command::CircuitControl,
            c if c == self.heartbeat => Command::Heartbeat,
            _ => Command::Other,
        }
    }
}

impl Default for OpcodeTable {
    fn default() -> Self {
        Self {
            lamp_control: "0xF001".to_string(),
            group_control: "0xC002".to_string(),
            lamp_ack: "0xC003".to_string(),
            group_status: "0xC004".to_string(),
            circuit_control: "0xC005".to_string(),
            heartbeat: "0xF004".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_recognises_default_codes() {
        let table = OpcodeTable::default();
        assert_eq!(table.classify("0xF001"), Command::LampControl);
        assert_eq!(table.classify("0xC002"), Command::GroupControl);
        assert_eq!(table.classify("0xC003"), Command::LampAck);
        assert_eq!(table.classify("0xC004"), Command::GroupStatus);
        assert_eq!(table.classify("0xC005"), Command::CircuitControl);
        assert_eq!(table.classify("0xF004"), Command::Heartbeat);
    }

    #[test]
    fn classify_is_case_sensitive_and_falls_back_to_other() {
        let table = OpcodeTable::default();
        assert_eq!(table.classify("0xf001"), Command::Other);
        assert_eq!(table.classify(""), Command::Other);
    }

    #[test]
    fn custom_table_overrides_defaults() {
        let table = OpcodeTable {
            lamp_control: "LC".to_string(),
            ..OpcodeTable::default()
        };
        assert_eq!(table.classify("LC"), Command::LampControl);
        assert_eq!(table.classify("0xF001"), Command::Other);
    }
}
