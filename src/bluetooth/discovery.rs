// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Discovery session state and device notification parsing.

use indexmap::IndexMap;

use crate::error::ParseError;
use crate::event::{Notification, extra};
use crate::types::{BluetoothDeviceRecord, BondState, PeerDevice};

/// Bits of a device class that hold the major class.
const MAJOR_CLASS_MASK: i64 = 0x1F00;

/// State of the discovery scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DiscoveryState {
    /// No scan has been started.
    #[default]
    Idle,
    /// A scan is running.
    Scanning,
    /// The last scan was stopped; its results remain available.
    Stopped,
}

/// Devices seen during a scan, keyed by display name in first-seen order.
///
/// Two distinct devices advertising the same name collapse into the first
/// one seen.
#[derive(Debug, Clone, Default)]
pub(crate) struct DiscoveredDevices {
    devices: IndexMap<String, PeerDevice>,
}

impl DiscoveredDevices {
    /// Records a device. Returns its record if it was not seen before.
    ///
    /// Unnamed devices are never recorded.
    pub(crate) fn insert(&mut self, device: PeerDevice) -> Option<BluetoothDeviceRecord> {
        let record = device.record()?;
        if self.devices.contains_key(&record.name) {
            return None;
        }
        self.devices.insert(record.name.clone(), device);
        Some(record)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&PeerDevice> {
        self.devices.get(name)
    }

    pub(crate) fn records(&self) -> Vec<BluetoothDeviceRecord> {
        self.devices.values().filter_map(PeerDevice::record).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.devices.len()
    }
}

/// Reads the device carried by a device-found or bond-state notification.
pub(crate) fn parse_device(notification: &Notification) -> Result<PeerDevice, ParseError> {
    let address = notification.text(extra::DEVICE_ADDRESS)?;
    let name = notification.optional_text(extra::DEVICE_NAME)?;
    let class = notification.optional_int(extra::DEVICE_CLASS)?.unwrap_or(0);
    let major_class =
        u32::try_from(class & MAJOR_CLASS_MASK).map_err(|_| ParseError::InvalidValue {
            field: extra::DEVICE_CLASS,
            message: format!("invalid device class {class}"),
        })?;

    Ok(PeerDevice {
        address: address.to_string(),
        name: name.map(str::to_string),
        major_class,
    })
}

/// Reads the device address and new bond state of a bond notification.
pub(crate) fn parse_bond_change(
    notification: &Notification,
) -> Result<(&str, BondState), ParseError> {
    let address = notification.text(extra::DEVICE_ADDRESS)?;
    let state = BondState::from_code(notification.int(extra::BOND_STATE)?)?;
    Ok((address, state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::action;
    use crate::types::DeviceType;

    fn found(address: &str, name: &str, class: i64) -> Notification {
        Notification::new(action::BLUETOOTH_DEVICE_FOUND)
            .with_text(extra::DEVICE_ADDRESS, address)
            .with_text(extra::DEVICE_NAME, name)
            .with_int(extra::DEVICE_CLASS, class)
    }

    #[test]
    fn first_seen_name_wins() {
        let mut devices = DiscoveredDevices::default();

        let first = PeerDevice::new("AA", "DeviceA", 0x0200);
        let second = PeerDevice::new("BB", "DeviceA", 0x0400);

        assert_eq!(
            devices.insert(first),
            Some(BluetoothDeviceRecord::new("DeviceA", DeviceType::Phone))
        );
        assert_eq!(devices.insert(second), None);
        assert_eq!(devices.len(), 1);
        assert_eq!(devices.get("DeviceA").unwrap().address, "AA");
    }

    #[test]
    fn unnamed_devices_are_skipped() {
        let mut devices = DiscoveredDevices::default();
        let mut unnamed = PeerDevice::new("AA", "", 0);
        assert_eq!(devices.insert(unnamed.clone()), None);
        unnamed.name = None;
        assert_eq!(devices.insert(unnamed), None);
        assert!(devices.records().is_empty());
    }

    #[test]
    fn records_keep_insertion_order() {
        let mut devices = DiscoveredDevices::default();
        devices.insert(PeerDevice::new("1", "Zeta", 0));
        devices.insert(PeerDevice::new("2", "Alpha", 0));

        let names: Vec<_> = devices.records().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn parse_masks_minor_class() {
        // Audio/video major class with a headset minor class
        let device = parse_device(&found("AA", "Headset", 0x0404)).unwrap();
        assert_eq!(device.major_class, 0x0400);
        assert_eq!(
            device.record(),
            Some(BluetoothDeviceRecord::new("Headset", DeviceType::AudioVideo))
        );
    }

    #[test]
    fn parse_requires_address() {
        let notification =
            Notification::new(action::BLUETOOTH_DEVICE_FOUND).with_text(extra::DEVICE_NAME, "X");
        assert_eq!(
            parse_device(&notification),
            Err(ParseError::MissingField(extra::DEVICE_ADDRESS))
        );
    }

    #[test]
    fn parse_bond_state() {
        let notification = Notification::new(action::BLUETOOTH_BOND_STATE_CHANGED)
            .with_text(extra::DEVICE_ADDRESS, "AA")
            .with_int(extra::BOND_STATE, 11);
        assert_eq!(
            parse_bond_change(&notification),
            Ok(("AA", BondState::Bonding))
        );

        let unknown = Notification::new(action::BLUETOOTH_BOND_STATE_CHANGED)
            .with_text(extra::DEVICE_ADDRESS, "AA")
            .with_int(extra::BOND_STATE, 99);
        assert!(parse_bond_change(&unknown).is_err());
    }
}
