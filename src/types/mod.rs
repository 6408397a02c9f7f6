// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for device state.
//!
//! This module provides type-safe representations of the values read from
//! and written to platform services. Constrained values are validated at
//! construction time.

mod battery;
mod bluetooth;
mod network;
mod storage;
mod system;
mod time_zone;
mod volume;
mod wifi;

pub use battery::{BATTERY_STATUS_CHARGING, BatteryLevel, BatteryReading, CHARGING_FLAG};
pub use bluetooth::{
    AdapterState, BOND_BONDED, BOND_BONDING, BOND_NONE, BluetoothDeviceRecord, BondState,
    DeviceType, MAJOR_CLASS_AUDIO_VIDEO, MAJOR_CLASS_COMPUTER, MAJOR_CLASS_PHONE, PeerDevice,
};
pub use network::{NetworkInfo, NetworkKind, NetworkSummary};
pub use storage::{Partition, StorageStats, bytes_to_gib};
pub use system::{Brightness, BuildInfo};
pub use time_zone::{DEFAULT_LABEL as DEFAULT_TIME_ZONE_LABEL, TimeZoneTable};
pub use volume::{DEFAULT_MAX_VOLUME, Volume};
pub use wifi::{
    KeyManagement, ScanEntry, SignalLevel, WifiConnectOutcome, WifiObservation, WifiSecurity,
};
