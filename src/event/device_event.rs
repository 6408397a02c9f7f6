// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device event types.

use serde::Serialize;

use crate::types::{BatteryLevel, BatteryReading, BondState, DeviceType, NetworkKind};

/// Whether a package was installed or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PackageAction {
    /// A package was installed.
    Added,
    /// A package was fully removed.
    Removed,
}

/// Events produced by the event sources and consumed by the dispatcher.
///
/// Each event is produced by exactly one source and is immutable once
/// constructed.
///
/// # Examples
///
/// ```
/// use syscom_lib::event::{DeviceEvent, PackageAction};
/// use syscom_lib::types::BondState;
///
/// let installed = DeviceEvent::PackageChanged {
///     action: PackageAction::Added,
///     identifier: "package:com.example.game".to_string(),
/// };
/// assert!(!installed.is_bluetooth());
///
/// let bonded = DeviceEvent::bond_changed("Headset", BondState::Bonded);
/// assert!(bonded.is_bluetooth());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DeviceEvent {
    /// Battery level or charging state changed.
    BatteryChanged {
        /// Charge percentage.
        percent: BatteryLevel,
        /// Whether the battery is charging.
        charging: bool,
    },

    /// Media volume changed.
    VolumeChanged {
        /// New volume step.
        level: u8,
    },

    /// Network connectivity changed.
    NetworkChanged {
        /// Transport of the network.
        kind: NetworkKind,
        /// Whether the network is now connected.
        connected: bool,
    },

    /// A package was installed or removed.
    PackageChanged {
        /// Installed or removed.
        action: PackageAction,
        /// Opaque package URI as reported by the platform.
        identifier: String,
    },

    /// A named device was seen for the first time during discovery.
    BluetoothDeviceFound {
        /// Display name.
        name: String,
        /// Coarse device kind.
        device_type: DeviceType,
    },

    /// A bond or unbond request reached its terminal state.
    BluetoothBondChanged {
        /// Display name of the remote device.
        name: String,
        /// Terminal bond state.
        state: BondState,
    },
}

impl DeviceEvent {
    /// Creates a battery event from a reading.
    #[must_use]
    pub fn battery(reading: BatteryReading) -> Self {
        Self::BatteryChanged {
            percent: reading.percent,
            charging: reading.charging,
        }
    }

    /// Creates a volume event.
    #[must_use]
    pub fn volume(level: u8) -> Self {
        Self::VolumeChanged { level }
    }

    /// Creates a package installed event.
    #[must_use]
    pub fn package_added(identifier: impl Into<String>) -> Self {
        Self::PackageChanged {
            action: PackageAction::Added,
            identifier: identifier.into(),
        }
    }

    /// Creates a package removed event.
    #[must_use]
    pub fn package_removed(identifier: impl Into<String>) -> Self {
        Self::PackageChanged {
            action: PackageAction::Removed,
            identifier: identifier.into(),
        }
    }

    /// Creates a device found event.
    #[must_use]
    pub fn device_found(name: impl Into<String>, device_type: DeviceType) -> Self {
        Self::BluetoothDeviceFound {
            name: name.into(),
            device_type,
        }
    }

    /// Creates a bond changed event.
    #[must_use]
    pub fn bond_changed(name: impl Into<String>, state: BondState) -> Self {
        Self::BluetoothBondChanged {
            name: name.into(),
            state,
        }
    }

    /// Returns `true` for Bluetooth discovery and bonding events.
    #[must_use]
    pub fn is_bluetooth(&self) -> bool {
        matches!(
            self,
            Self::BluetoothDeviceFound { .. } | Self::BluetoothBondChanged { .. }
        )
    }
}
