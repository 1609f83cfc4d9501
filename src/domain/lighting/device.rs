//! Device identifiers and the binary on/off value carried on the wire.

use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// An individually addressable bulb known to this gateway.
///
/// The set is closed: anything outside it is rejected at parse time, so the
/// state store can never hold an unknown device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeviceId {
    Bulb1,
    Bulb2,
}

impl DeviceId {
    /// Every known device, in broadcast order.
    pub const ALL: [DeviceId; DeviceId::COUNT] = [DeviceId::Bulb1, DeviceId::Bulb2];

    /// Number of known devices.
    pub const COUNT: usize = 2;

    /// Node identifier used in the `nodeMac` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceId::Bulb1 => "bulb1",
            DeviceId::Bulb2 => "bulb2",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            DeviceId::Bulb1 => 0,
            DeviceId::Bulb2 => 1,
        }
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeviceId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ValidationError::unknown_device(s))
    }
}

/// The two-valued state strings (`"0"` / `"1"`) used by `actionValue`
/// and `currentValue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryState {
    Off,
    On,
}

impl BinaryState {
    /// Interpret a wire value. Only `"1"` means on.
    pub fn from_wire(value: &str) -> Self {
        if value == "1" {
            BinaryState::On
        } else {
            BinaryState::Off
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryState::Off => "0",
            BinaryState::On => "1",
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, BinaryState::On)
    }
}

impl From<bool> for BinaryState {
    fn from(on: bool) -> Self {
        if on {
            BinaryState::On
        } else {
            BinaryState::Off
        }
    }
}
