//! Protocol module - the message schema shared by both transports.
//!
//! # Components
//!
//! - [`message`] - `ProtocolMessage` and builders for gateway-originated messages
//! - [`opcodes`] - Opcode table and command classification
//! - [`codec`] - JSON encode/decode
//! - [`framing`] - Byte-stream framing for the controller link

pub mod codec;
pub mod framing;
pub mod message;
pub mod opcodes;

pub use codec::{decode, encode, encode_at, DecodeError};
pub use framing::{Framing, LineFraming};
pub use message::{
    ProtocolIdentity, ProtocolMessage, ProtocolProfile, BROADCAST_NODE_MAC, SYSTEM_NODE_MAC,
};
pub use opcodes::{Command, OpcodeTable};
