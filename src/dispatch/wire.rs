// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire encoding of device events.
//!
//! The engine receives every event as a method name plus a string payload.
//! The method names are fixed by the engine-side scripts, including the
//! misspelled Bluetooth names, and must not change.

use crate::config::{BatteryPayloadFormat, BridgeConfig};
use crate::event::{DeviceEvent, PackageAction};
use crate::types::{BatteryLevel, BatteryReading, BondState};

/// Method name of battery events.
pub const BATTERY_LEVEL_CHANGE: &str = "BatteryLevelChange";
/// Method name of volume events.
pub const AUDIO_VOLUME_CHANGE: &str = "AudioVolumeChange";
/// Method name of package install events.
pub const PACKAGE_INSTALLED: &str = "AndroidNewPackageInstalled";
/// Method name of package removal events.
pub const PACKAGE_REMOVED: &str = "AndroidPackageRemoved";
/// Method name of completed pairings.
pub const BLUETOOTH_BONDED: &str = "NewBluetoophDeviceBonded";
/// Method name of completed unpairings.
pub const BLUETOOTH_UNBONDED: &str = "BluetoophDeviceUnbonded";
/// Method name of network events, only sent with extended events enabled.
pub const NETWORK_STATE_CHANGE: &str = "NetworkStateChange";
/// Method name of discovery sightings, only sent with extended events enabled.
pub const BLUETOOTH_DEVICE_FOUND: &str = "BluetoothDeviceFound";

/// An event encoded for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireMessage {
    /// Engine method name.
    pub event_name: &'static str,
    /// String payload.
    pub payload: String,
}

impl WireMessage {
    /// Encodes an event.
    ///
    /// Returns `None` for events that have no engine method under the given
    /// configuration: network changes and discovery sightings without
    /// extended events, and intermediate `Bonding` states.
    ///
    /// # Examples
    ///
    /// ```
    /// use syscom_lib::config::BridgeConfig;
    /// use syscom_lib::dispatch::WireMessage;
    /// use syscom_lib::event::DeviceEvent;
    ///
    /// let config = BridgeConfig::default();
    /// let message = WireMessage::encode(&DeviceEvent::volume(7), &config).unwrap();
    ///
    /// assert_eq!(message.event_name, "AudioVolumeChange");
    /// assert_eq!(message.payload, "7");
    /// ```
    #[must_use]
    pub fn encode(event: &DeviceEvent, config: &BridgeConfig) -> Option<Self> {
        let (event_name, payload) = match event {
            DeviceEvent::BatteryChanged { percent, charging } => (
                BATTERY_LEVEL_CHANGE,
                battery_payload(*percent, *charging, config.battery_payload)?,
            ),
            DeviceEvent::VolumeChanged { level } => (AUDIO_VOLUME_CHANGE, level.to_string()),
            DeviceEvent::PackageChanged { action, identifier } => {
                let name = match action {
                    PackageAction::Added => PACKAGE_INSTALLED,
                    PackageAction::Removed => PACKAGE_REMOVED,
                };
                (name, identifier.clone())
            }
            DeviceEvent::BluetoothBondChanged { name, state } => match state {
                BondState::Bonded => (BLUETOOTH_BONDED, name.clone()),
                BondState::Unbonded => (BLUETOOTH_UNBONDED, name.clone()),
                BondState::Bonding => return None,
            },
            DeviceEvent::NetworkChanged { kind, connected } if config.extended_events => (
                NETWORK_STATE_CHANGE,
                format!("{kind}:{}", u8::from(*connected)),
            ),
            DeviceEvent::BluetoothDeviceFound { name, .. } if config.extended_events => {
                (BLUETOOTH_DEVICE_FOUND, name.clone())
            }
            DeviceEvent::NetworkChanged { .. } | DeviceEvent::BluetoothDeviceFound { .. } => {
                return None;
            }
        };

        Some(Self {
            event_name,
            payload,
        })
    }
}

fn battery_payload(
    percent: BatteryLevel,
    charging: bool,
    format: BatteryPayloadFormat,
) -> Option<String> {
    let reading = BatteryReading::new(percent, charging);
    match format {
        BatteryPayloadFormat::Packed => Some(reading.packed().to_string()),
        BatteryPayloadFormat::Json => serde_json::to_string(&reading)
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to serialize battery reading"))
            .ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeviceType, NetworkKind};

    fn encode(event: &DeviceEvent) -> Option<WireMessage> {
        WireMessage::encode(event, &BridgeConfig::default())
    }

    fn battery(percent: u8, charging: bool) -> DeviceEvent {
        DeviceEvent::BatteryChanged {
            percent: BatteryLevel::new(percent).unwrap(),
            charging,
        }
    }

    #[test]
    fn battery_packed_payload() {
        let message = encode(&battery(75, true)).unwrap();
        assert_eq!(message.event_name, "BatteryLevelChange");
        assert_eq!(message.payload, "1075");

        assert_eq!(encode(&battery(40, false)).unwrap().payload, "40");
        assert_eq!(encode(&battery(0, true)).unwrap().payload, "1000");
    }

    #[test]
    fn battery_json_payload() {
        let config = BridgeConfig::new().with_battery_payload(BatteryPayloadFormat::Json);
        let message = WireMessage::encode(&battery(75, true), &config).unwrap();
        assert_eq!(message.payload, r#"{"percent":75,"charging":true}"#);

        let parsed: serde_json::Value = serde_json::from_str(&message.payload).unwrap();
        assert_eq!(parsed["percent"], 75);
    }

    #[test]
    fn battery_json_payload_not_charging() {
        let config = BridgeConfig::new().with_battery_payload(BatteryPayloadFormat::Json);
        let message = WireMessage::encode(&battery(0, false), &config).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&message.payload).unwrap();
        assert_eq!(parsed, serde_json::json!({"percent": 0, "charging": false}));
    }

    #[test]
    fn package_names() {
        let added = encode(&DeviceEvent::package_added("package:com.example.game")).unwrap();
        assert_eq!(added.event_name, "AndroidNewPackageInstalled");
        assert_eq!(added.payload, "package:com.example.game");

        let removed = encode(&DeviceEvent::package_removed("package:com.example.game")).unwrap();
        assert_eq!(removed.event_name, "AndroidPackageRemoved");
    }

    #[test]
    fn bond_names_keep_engine_spelling() {
        let bonded = encode(&DeviceEvent::bond_changed("Headset", BondState::Bonded)).unwrap();
        assert_eq!(bonded.event_name, "NewBluetoophDeviceBonded");
        assert_eq!(bonded.payload, "Headset");

        let unbonded = encode(&DeviceEvent::bond_changed("Headset", BondState::Unbonded)).unwrap();
        assert_eq!(unbonded.event_name, "BluetoophDeviceUnbonded");

        assert!(encode(&DeviceEvent::bond_changed("Headset", BondState::Bonding)).is_none());
    }

    #[test]
    fn extended_events_are_opt_in() {
        let network = DeviceEvent::NetworkChanged {
            kind: NetworkKind::Wifi,
            connected: true,
        };
        let found = DeviceEvent::device_found("Speaker", DeviceType::AudioVideo);

        assert!(encode(&network).is_none());
        assert!(encode(&found).is_none());

        let config = BridgeConfig::new().with_extended_events();
        let message = WireMessage::encode(&network, &config).unwrap();
        assert_eq!(message.event_name, "NetworkStateChange");
        assert_eq!(message.payload, "wifi:1");

        let message = WireMessage::encode(&found, &config).unwrap();
        assert_eq!(message.event_name, "BluetoothDeviceFound");
        assert_eq!(message.payload, "Speaker");
    }
}
