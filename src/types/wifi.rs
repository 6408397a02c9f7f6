// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wifi scan observations.
//!
//! Observations are rebuilt from the platform scan results every time they
//! are requested and are never stored.

use serde::Serialize;

/// RSSI at or below which the signal level is 0.
const MIN_RSSI: i32 = -100;

/// RSSI at or above which the signal level is at its maximum.
const MAX_RSSI: i32 = -55;

/// Number of signal level buckets (levels 0 through 4).
const SIGNAL_LEVELS: i32 = 5;

/// Signal strength bucket between 0 and 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SignalLevel(u8);

impl SignalLevel {
    /// Highest signal level.
    pub const MAX: Self = Self(4);

    /// Computes the signal bucket from an RSSI in dBm.
    ///
    /// ```
    /// use syscom_lib::types::SignalLevel;
    ///
    /// assert_eq!(SignalLevel::from_rssi(-120).value(), 0);
    /// assert_eq!(SignalLevel::from_rssi(-70).value(), 2);
    /// assert_eq!(SignalLevel::from_rssi(-40).value(), 4);
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_rssi(rssi: i32) -> Self {
        if rssi <= MIN_RSSI {
            return Self(0);
        }
        if rssi >= MAX_RSSI {
            return Self::MAX;
        }
        let input_range = MAX_RSSI - MIN_RSSI;
        let output_range = SIGNAL_LEVELS - 1;
        // Safe: rssi in (MIN_RSSI, MAX_RSSI) keeps the quotient in [0, 3]
        Self(((rssi - MIN_RSSI) * output_range / input_range) as u8)
    }

    /// Returns the bucket value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

/// Security class of a wifi network as reported to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WifiSecurity {
    /// No WPA2 protection advertised.
    Open,
    /// WPA2 protected.
    Secured,
}

impl WifiSecurity {
    /// Classifies a platform capabilities string such as `[WPA2-PSK-CCMP][ESS]`.
    #[must_use]
    pub fn from_capabilities(capabilities: &str) -> Self {
        if capabilities.contains("WPA2") {
            Self::Secured
        } else {
            Self::Open
        }
    }

    /// Returns the numeric code used by the engine (0 open, 1 secured).
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Secured => 1,
        }
    }
}

/// Key management used when joining a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyManagement {
    /// WPA/WPA2 pre-shared key.
    Wpa,
    /// Legacy WEP key.
    Wep,
    /// No key.
    Open,
}

impl KeyManagement {
    /// Classifies a platform capabilities string.
    #[must_use]
    pub fn from_capabilities(capabilities: &str) -> Self {
        if capabilities.contains("WPA") {
            Self::Wpa
        } else if capabilities.contains("WEP") {
            Self::Wep
        } else {
            Self::Open
        }
    }
}

/// A single entry of a platform wifi scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    /// Network name, if broadcast.
    pub ssid: Option<String>,
    /// Received signal strength in dBm.
    pub rssi: i32,
    /// Platform capabilities string.
    pub capabilities: String,
}

impl ScanEntry {
    /// Creates a scan entry.
    #[must_use]
    pub fn new(ssid: impl Into<String>, rssi: i32, capabilities: impl Into<String>) -> Self {
        Self {
            ssid: Some(ssid.into()),
            rssi,
            capabilities: capabilities.into(),
        }
    }
}

/// A wifi network visible from the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WifiObservation {
    /// Network name.
    pub ssid: String,
    /// Signal bucket (0-4).
    pub signal_level: SignalLevel,
    /// Security class.
    pub security: WifiSecurity,
}

impl WifiObservation {
    /// Builds an observation from a scan entry; entries without SSID yield `None`.
    #[must_use]
    pub fn from_scan(entry: &ScanEntry) -> Option<Self> {
        let ssid = entry.ssid.as_ref()?;
        Some(Self {
            ssid: ssid.clone(),
            signal_level: SignalLevel::from_rssi(entry.rssi),
            security: WifiSecurity::from_capabilities(&entry.capabilities),
        })
    }
}

/// Result of a wifi connection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WifiConnectOutcome {
    /// The device is already associated with the requested network.
    AlreadyConnected,
    /// The scan entry did not allow the key management to be determined.
    SecurityUnknown,
    /// The connection was handed to the platform.
    Requested,
    /// The network is not in the current scan results.
    SsidNotFound,
}

impl WifiConnectOutcome {
    /// Returns the numeric code used by the engine.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::AlreadyConnected => 100,
            Self::SecurityUnknown => 200,
            Self::Requested => 300,
            Self::SsidNotFound => 500,
        }
    }
}
