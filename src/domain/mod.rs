//! Domain layer containing the gateway's protocol and device state.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (timestamps, state machine trait, errors)
//! - `lighting` - Known devices and the canonical device state store
//! - `protocol` - Message schema, codec, framing and opcode classification

pub mod foundation;
pub mod lighting;
pub mod protocol;
