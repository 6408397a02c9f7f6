// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bluetooth device and adapter types.

use std::fmt;

use serde::Serialize;

use crate::error::ParseError;

/// Major device class code for computers.
pub const MAJOR_CLASS_COMPUTER: u32 = 0x0100;

/// Major device class code for phones.
pub const MAJOR_CLASS_PHONE: u32 = 0x0200;

/// Major device class code for audio/video equipment.
pub const MAJOR_CLASS_AUDIO_VIDEO: u32 = 0x0400;

/// Platform bond state code: not bonded.
pub const BOND_NONE: i64 = 10;

/// Platform bond state code: bonding in progress.
pub const BOND_BONDING: i64 = 11;

/// Platform bond state code: bonded.
pub const BOND_BONDED: i64 = 12;

/// Coarse kind of a remote Bluetooth device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum DeviceType {
    /// Any class not listed below.
    #[default]
    Unknown,
    /// Phone.
    Phone,
    /// Desktop or laptop computer.
    Computer,
    /// Headset, speaker, or other audio/video equipment.
    AudioVideo,
}

impl DeviceType {
    /// Maps a platform major device class code.
    ///
    /// ```
    /// use syscom_lib::types::DeviceType;
    ///
    /// assert_eq!(DeviceType::from_major_class(0x0400), DeviceType::AudioVideo);
    /// assert_eq!(DeviceType::from_major_class(0x1F00), DeviceType::Unknown);
    /// ```
    #[must_use]
    pub fn from_major_class(code: u32) -> Self {
        match code {
            MAJOR_CLASS_PHONE => Self::Phone,
            MAJOR_CLASS_COMPUTER => Self::Computer,
            MAJOR_CLASS_AUDIO_VIDEO => Self::AudioVideo,
            _ => Self::Unknown,
        }
    }

    /// Returns the numeric code used by the engine.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Phone => 1,
            Self::Computer => 2,
            Self::AudioVideo => 3,
        }
    }
}

/// A named remote device as reported to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BluetoothDeviceRecord {
    /// Display name advertised by the device.
    pub name: String,
    /// Coarse device kind.
    pub device_type: DeviceType,
}

impl BluetoothDeviceRecord {
    /// Creates a record.
    #[must_use]
    pub fn new(name: impl Into<String>, device_type: DeviceType) -> Self {
        Self {
            name: name.into(),
            device_type,
        }
    }
}

/// A remote device as known to the platform.
///
/// The address is what the platform needs to act on the device; the
/// engine only ever sees the [`BluetoothDeviceRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerDevice {
    /// Hardware address.
    pub address: String,
    /// Advertised name, absent for devices that did not report one.
    pub name: Option<String>,
    /// Platform major device class code.
    pub major_class: u32,
}

impl PeerDevice {
    /// Creates a peer device.
    #[must_use]
    pub fn new(address: impl Into<String>, name: impl Into<String>, major_class: u32) -> Self {
        Self {
            address: address.into(),
            name: Some(name.into()),
            major_class,
        }
    }

    /// Returns the engine-facing record, or `None` for unnamed devices.
    #[must_use]
    pub fn record(&self) -> Option<BluetoothDeviceRecord> {
        let name = self.name.as_deref().filter(|n| !n.is_empty())?;
        Some(BluetoothDeviceRecord::new(
            name,
            DeviceType::from_major_class(self.major_class),
        ))
    }
}

/// Bond state of a remote device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BondState {
    /// Not bonded.
    Unbonded,
    /// Bonding in progress.
    Bonding,
    /// Bonded.
    Bonded,
}

impl BondState {
    /// Parses a platform bond state code.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` for unknown codes.
    pub fn from_code(code: i64) -> Result<Self, ParseError> {
        match code {
            BOND_NONE => Ok(Self::Unbonded),
            BOND_BONDING => Ok(Self::Bonding),
            BOND_BONDED => Ok(Self::Bonded),
            other => Err(ParseError::InvalidValue {
                field: "bond_state",
                message: format!("unknown bond state code {other}"),
            }),
        }
    }

    /// Returns the platform code.
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::Unbonded => BOND_NONE,
            Self::Bonding => BOND_BONDING,
            Self::Bonded => BOND_BONDED,
        }
    }
}

impl fmt::Display for BondState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unbonded => "unbonded",
            Self::Bonding => "bonding",
            Self::Bonded => "bonded",
        };
        f.write_str(s)
    }
}

/// State of the local Bluetooth adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AdapterState {
    /// The device has no Bluetooth adapter.
    Absent,
    /// The adapter is present but disabled.
    Off,
    /// The adapter is enabled.
    On,
}

impl AdapterState {
    /// Returns the numeric code used by the engine (-1 absent, 0 off, 1 on).
    #[must_use]
    pub const fn code(&self) -> i8 {
        match self {
            Self::Absent => -1,
            Self::Off => 0,
            Self::On => 1,
        }
    }

    /// Returns true if the adapter is enabled.
    #[must_use]
    pub fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_type_mapping() {
        assert_eq!(DeviceType::from_major_class(MAJOR_CLASS_PHONE), DeviceType::Phone);
        assert_eq!(
            DeviceType::from_major_class(MAJOR_CLASS_COMPUTER),
            DeviceType::Computer
        );
        assert_eq!(DeviceType::from_major_class(0), DeviceType::Unknown);
        assert_eq!(DeviceType::AudioVideo.code(), 3);
    }

    #[test]
    fn bond_state_codes() {
        for state in [BondState::Unbonded, BondState::Bonding, BondState::Bonded] {
            assert_eq!(BondState::from_code(state.code()).unwrap(), state);
        }
        assert!(BondState::from_code(-1).is_err());
    }

    #[test]
    fn unnamed_peer_has_no_record() {
        let mut peer = PeerDevice::new("00:11:22:33:44:55", "", MAJOR_CLASS_PHONE);
        assert!(peer.record().is_none());

        peer.name = None;
        assert!(peer.record().is_none());

        peer.name = Some("Pixel".to_string());
        let record = peer.record().unwrap();
        assert_eq!(record.name, "Pixel");
        assert_eq!(record.device_type, DeviceType::Phone);
    }

    #[test]
    fn adapter_codes() {
        assert_eq!(AdapterState::Absent.code(), -1);
        assert_eq!(AdapterState::Off.code(), 0);
        assert!(AdapterState::On.is_on());
    }
}
