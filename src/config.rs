// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Default time to wait for a pairing request to reach a terminal state.
pub const DEFAULT_PAIR_TIMEOUT: Duration = Duration::from_secs(30);

/// How battery events are encoded on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatteryPayloadFormat {
    /// `percent`, plus 1000 while charging (`"1075"`).
    #[default]
    Packed,
    /// `{"percent":75,"charging":true}`.
    Json,
}

/// Configuration for a [`SystemContext`](crate::SystemContext).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use syscom_lib::config::{BatteryPayloadFormat, BridgeConfig};
///
/// let config = BridgeConfig::new()
///     .with_sink_identity("Launcher")
///     .with_pair_timeout(Duration::from_secs(10))
///     .with_battery_payload(BatteryPayloadFormat::Json);
///
/// assert_eq!(config.sink_identity.as_deref(), Some("Launcher"));
///
/// // The same configuration loaded from JSON
/// let loaded = BridgeConfig::from_json(
///     r#"{"sink_identity":"Launcher","pair_timeout_ms":10000,"battery_payload":"json"}"#,
/// )
/// .unwrap();
/// assert_eq!(loaded, config);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Name of the engine object receiving events. Events emitted while this
    /// is unset are dropped.
    pub sink_identity: Option<String>,
    /// Pairing timeout in milliseconds.
    pub pair_timeout_ms: u64,
    /// Battery payload encoding.
    pub battery_payload: BatteryPayloadFormat,
    /// Also forward network and device-found events.
    pub extended_events: bool,
}

impl BridgeConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, has unknown fields, names
    /// an empty sink identity or a zero pairing timeout.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sink_identity.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::Invalid(
                "sink_identity must not be empty".to_string(),
            ));
        }
        if self.pair_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "pair_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Sets the sink identity.
    #[must_use]
    pub fn with_sink_identity(mut self, identity: impl Into<String>) -> Self {
        self.sink_identity = Some(identity.into());
        self
    }

    /// Sets the pairing timeout, rounded down to whole milliseconds and
    /// clamped to at least one.
    #[must_use]
    pub fn with_pair_timeout(mut self, timeout: Duration) -> Self {
        self.pair_timeout_ms = u64::try_from(timeout.as_millis())
            .unwrap_or(u64::MAX)
            .max(1);
        self
    }

    /// Sets the battery payload encoding.
    #[must_use]
    pub fn with_battery_payload(mut self, format: BatteryPayloadFormat) -> Self {
        self.battery_payload = format;
        self
    }

    /// Enables forwarding of network and device-found events.
    #[must_use]
    pub fn with_extended_events(mut self) -> Self {
        self.extended_events = true;
        self
    }

    /// Returns the pairing timeout.
    #[must_use]
    pub fn pair_timeout(&self) -> Duration {
        Duration::from_millis(self.pair_timeout_ms)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            sink_identity: None,
            pair_timeout_ms: 30_000,
            battery_payload: BatteryPayloadFormat::Packed,
            extended_events: false,
        }
    }
}
