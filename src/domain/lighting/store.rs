//! Canonical in-memory state of the bulbs and the group switch.
//!
//! The store is a plain data holder owned by the gateway actor. Every
//! mutation returns the resulting [`DeviceState`] so callers can broadcast
//! it without a second read.
//!
//! `group_control` records the last explicit group command or group status.
//! It is never derived from the individual bulbs.

use super::device::DeviceId;

/// Snapshot of all device state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceState {
    bulbs: [bool; DeviceId::COUNT],
    group_control: bool,
}

impl DeviceState {
    /// Whether the given bulb is on.
    pub fn is_on(&self, device: DeviceId) -> bool {
        self.bulbs[device.index()]
    }

    /// Last explicit group state.
    pub fn group_control(&self) -> bool {
        self.group_control
    }

    /// Iterate `(device, on)` pairs in broadcast order.
    pub fn devices(self) -> impl Iterator<Item = (DeviceId, bool)> {
        DeviceId::ALL.into_iter().map(move |id| (id, self.is_on(id)))
    }
}

/// Owner of the canonical [`DeviceState`].
#[derive(Debug, Default)]
pub struct DeviceStateStore {
    state: DeviceState,
}

impl DeviceStateStore {
    /// Create a store with every bulb and the group switch off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> DeviceState {
        self.state
    }

    /// Controller confirmed a single bulb's state.
    pub fn apply_individual_ack(&mut self, device: DeviceId, on: bool) -> DeviceState {
        self.state.bulbs[device.index()] = on;
        self.state
    }

    /// Controller reported the group state; it covers every bulb.
    pub fn apply_group_status(&mut self, on: bool) -> DeviceState {
        self.state.group_control = on;
        self.state.bulbs = [on; DeviceId::COUNT];
        self.state
    }

    /// Optimistic update for a client's lamp command, ahead of hardware confirmation.
    pub fn apply_individual_command(&mut self, device: DeviceId, on: bool) -> DeviceState {
        self.apply_individual_ack(device, on)
    }

    /// Optimistic update for a client's group command, ahead of hardware confirmation.
    pub fn apply_group_command(&mut self, on: bool) -> DeviceState {
        self.apply_group_status(on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_store_starts_all_off() {
        let state = DeviceStateStore::new().snapshot();
        assert!(!state.is_on(DeviceId::Bulb1));
        assert!(!state.is_on(DeviceId::Bulb2));
        assert!(!state.group_control());
    }

    #[test]
    fn individual_ack_touches_only_one_bulb() {
        let mut store = DeviceStateStore::new();
        let state = store.apply_individual_ack(DeviceId::Bulb2, true);

        assert!(state.is_on(DeviceId::Bulb2));
        assert!(!state.is_on(DeviceId::Bulb1));
        assert!(!state.group_control());
    }

    #[test]
    fn group_status_sets_every_bulb_and_group_flag() {
        let mut store = DeviceStateStore::new();
        let state = store.apply_group_status(true);

        assert!(state.is_on(DeviceId::Bulb1));
        assert!(state.is_on(DeviceId::Bulb2));
        assert!(state.group_control());
    }

    #[test]
    fn group_flag_survives_individual_toggle() {
        let mut store = DeviceStateStore::new();
        store.apply_group_command(true);
        let state = store.apply_individual_command(DeviceId::Bulb1, false);

        assert!(!state.is_on(DeviceId::Bulb1));
        assert!(state.is_on(DeviceId::Bulb2));
        assert!(state.group_control());
    }

    #[test]
    fn group_off_after_individual_on_clears_all() {
        let mut store = DeviceStateStore::new();
        store.apply_individual_ack(DeviceId::Bulb1, true);
        let state = store.apply_group_status(false);

        assert_eq!(state, DeviceState::default());
    }

    #[test]
    fn devices_iterates_in_broadcast_order() {
        let mut store = DeviceStateStore::new();
        store.apply_individual_ack(DeviceId::Bulb2, true);

        let pairs: Vec<_> = store.snapshot().devices().collect();
        assert_eq!(pairs, vec![(DeviceId::Bulb1, false), (DeviceId::Bulb2, true)]);
    }

    fn any_device() -> impl Strategy<Value = DeviceId> {
        prop_oneof![Just(DeviceId::Bulb1), Just(DeviceId::Bulb2)]
    }

    proptest! {
        #[test]
        fn toggling_twice_restores_device_and_leaves_others(
            device in any_device(),
            bulb1 in any::<bool>(),
            bulb2 in any::<bool>(),
            group in any::<bool>(),
        ) {
            let mut store = DeviceStateStore::new();
            store.apply_group_status(group);
            store.apply_individual_ack(DeviceId::Bulb1, bulb1);
            store.apply_individual_ack(DeviceId::Bulb2, bulb2);
            let before = store.snapshot();

            let original = before.is_on(device);
            store.apply_individual_command(device, !original);
            let after = store.apply_individual_command(device, original);

            prop_assert_eq!(after, before);
        }

        #[test]
        fn individual_updates_never_change_group_flag(
            group in any::<bool>(),
            toggles in proptest::collection::vec((any_device(), any::<bool>()), 0..16),
        ) {
            let mut store = DeviceStateStore::new();
            store.apply_group_command(group);
            for (device, on) in toggles {
                store.apply_individual_ack(device, on);
            }
            prop_assert_eq!(store.snapshot().group_control(), group);
        }
    }
}
