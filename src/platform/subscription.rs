// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Platform subscription handles and filters.

use std::fmt;

use crate::event::action;

/// The kind of event source a subscription belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
    /// Battery level and charging state.
    Battery,
    /// Wifi network state.
    Network,
    /// Media volume (settings observer).
    Volume,
    /// Package install and removal.
    Package,
    /// Devices found during a Bluetooth discovery session.
    BluetoothDiscovery,
    /// Bond state changes for one bond or unbond request.
    BluetoothBond,
}

impl SourceKind {
    /// Sources activated by the registry, in registration order.
    pub const REGISTERED: [Self; 4] = [Self::Package, Self::Volume, Self::Battery, Self::Network];

    /// Returns the notification actions this kind of source listens to.
    #[must_use]
    pub fn actions(&self) -> &'static [&'static str] {
        match self {
            Self::Battery => &[action::BATTERY_CHANGED],
            Self::Network => &[action::NETWORK_STATE_CHANGED],
            Self::Volume => &[action::SETTINGS_CHANGED],
            Self::Package => &[action::PACKAGE_ADDED, action::PACKAGE_FULLY_REMOVED],
            Self::BluetoothDiscovery => &[action::BLUETOOTH_DEVICE_FOUND],
            Self::BluetoothBond => &[action::BLUETOOTH_BOND_STATE_CHANGED],
        }
    }

    /// Returns a short lowercase name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Battery => "battery",
            Self::Network => "network",
            Self::Volume => "volume",
            Self::Package => "package",
            Self::BluetoothDiscovery => "bluetooth_discovery",
            Self::BluetoothBond => "bluetooth_bond",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a receiver wants to be notified about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionFilter {
    /// The source kind installing the receiver.
    pub kind: SourceKind,
    /// Notification actions to deliver.
    pub actions: &'static [&'static str],
}

impl SubscriptionFilter {
    /// Creates the filter for a source kind.
    #[must_use]
    pub fn for_kind(kind: SourceKind) -> Self {
        Self {
            kind,
            actions: kind.actions(),
        }
    }

    /// Returns true if the filter accepts the action.
    #[must_use]
    pub fn accepts(&self, action: &str) -> bool {
        self.actions.contains(&action)
    }
}

/// Handle of a live platform subscription.
///
/// Handles are issued by the [`SubscriptionHost`](super::SubscriptionHost)
/// and identify which receiver a notification was delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    /// Creates a handle from a raw platform value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_accepts_kind_actions() {
        let filter = SubscriptionFilter::for_kind(SourceKind::Package);
        assert!(filter.accepts(action::PACKAGE_ADDED));
        assert!(filter.accepts(action::PACKAGE_FULLY_REMOVED));
        assert!(!filter.accepts(action::BATTERY_CHANGED));
    }

    #[test]
    fn handle_display() {
        assert_eq!(SubscriptionHandle::new(7).to_string(), "Sub(7)");
    }
}
