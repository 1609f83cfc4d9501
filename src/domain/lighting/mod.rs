//! Lighting domain: the known bulbs and their canonical state.

mod device;
mod store;

pub use device::{BinaryState, DeviceId};
pub use store::{DeviceState, DeviceStateStore};
