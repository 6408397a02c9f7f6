// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Network kind and summary types.

use std::fmt;

use serde::Serialize;

/// Transport of a network connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum NetworkKind {
    /// Wifi.
    Wifi,
    /// Cellular data.
    Mobile,
    /// Any other transport, by platform name.
    Other(String),
}

impl NetworkKind {
    /// Parses the platform transport name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "wifi" => Self::Wifi,
            "mobile" => Self::Mobile,
            _ => Self::Other(name.to_string()),
        }
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wifi => f.write_str("wifi"),
            Self::Mobile => f.write_str("mobile"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// One network interface as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInfo {
    /// Transport.
    pub kind: NetworkKind,
    /// Whether the network is connected.
    pub connected: bool,
}

/// Which network transports are present on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NetworkSummary {
    /// A wifi network is known to the platform.
    pub wifi: bool,
    /// A mobile network is known to the platform.
    pub mobile: bool,
    /// At least one network is connected.
    pub connected: bool,
}

impl NetworkSummary {
    /// Summarizes a list of networks.
    #[must_use]
    pub fn from_networks(networks: &[NetworkInfo]) -> Self {
        networks.iter().fold(Self::default(), |mut acc, n| {
            match n.kind {
                NetworkKind::Wifi => acc.wifi = true,
                NetworkKind::Mobile => acc.mobile = true,
                NetworkKind::Other(_) => {}
            }
            acc.connected |= n.connected;
            acc
        })
    }

    /// Returns the numeric code used by the engine (bit 1 wifi, bit 2 mobile).
    #[must_use]
    pub fn code(&self) -> u8 {
        u8::from(self.wifi) | (u8::from(self.mobile) << 1)
    }
}
