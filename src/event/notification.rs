// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw platform notifications.
//!
//! A [`Notification`] is what the platform hands to a registered receiver:
//! an action string, an optional data URI and a bag of typed extras. Event
//! sources read the fields they need through the typed accessors, which
//! report missing or mistyped fields as [`ParseError`].

use std::collections::HashMap;

use crate::error::ParseError;

/// Notification action strings.
pub mod action {
    /// Battery level, scale or status changed.
    pub const BATTERY_CHANGED: &str = "android.intent.action.BATTERY_CHANGED";
    /// Wifi network state changed.
    pub const NETWORK_STATE_CHANGED: &str = "android.net.wifi.STATE_CHANGE";
    /// A system setting changed (includes the media volume).
    pub const SETTINGS_CHANGED: &str = "content://settings/system";
    /// A package was installed.
    pub const PACKAGE_ADDED: &str = "android.intent.action.PACKAGE_ADDED";
    /// A package and its data were removed.
    pub const PACKAGE_FULLY_REMOVED: &str = "android.intent.action.PACKAGE_FULLY_REMOVED";
    /// A remote Bluetooth device was found during discovery.
    pub const BLUETOOTH_DEVICE_FOUND: &str = "android.bluetooth.device.action.FOUND";
    /// The bond state of a remote Bluetooth device changed.
    pub const BLUETOOTH_BOND_STATE_CHANGED: &str =
        "android.bluetooth.device.action.BOND_STATE_CHANGED";
}

/// Extra keys read by the event sources.
pub mod extra {
    /// Raw battery level (integer).
    pub const LEVEL: &str = "level";
    /// Maximum battery level (integer).
    pub const SCALE: &str = "scale";
    /// Battery status code (integer).
    pub const STATUS: &str = "status";
    /// Network transport name (text).
    pub const NETWORK_TYPE: &str = "network_type";
    /// Network connectivity (boolean).
    pub const CONNECTED: &str = "connected";
    /// Remote device hardware address (text).
    pub const DEVICE_ADDRESS: &str = "device_address";
    /// Remote device display name (text).
    pub const DEVICE_NAME: &str = "device_name";
    /// Remote device major class code (integer).
    pub const DEVICE_CLASS: &str = "device_class";
    /// Bond state code (integer).
    pub const BOND_STATE: &str = "bond_state";
}

/// A typed notification extra.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extra {
    /// Integer value.
    Int(i64),
    /// Boolean value.
    Bool(bool),
    /// Text value.
    Text(String),
}

/// A notification delivered by the platform to a registered receiver.
///
/// # Examples
///
/// ```
/// use syscom_lib::event::{Notification, action, extra};
///
/// let notification = Notification::new(action::BATTERY_CHANGED)
///     .with_int(extra::LEVEL, 75)
///     .with_int(extra::SCALE, 100);
///
/// assert_eq!(notification.int(extra::LEVEL).unwrap(), 75);
/// assert!(notification.int(extra::STATUS).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    action: String,
    data: Option<String>,
    extras: HashMap<String, Extra>,
}

impl Notification {
    /// Creates a notification with the given action and no payload.
    #[must_use]
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            data: None,
            extras: HashMap::new(),
        }
    }

    /// Sets the data URI.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Adds an integer extra.
    #[must_use]
    pub fn with_int(mut self, key: impl Into<String>, value: i64) -> Self {
        self.extras.insert(key.into(), Extra::Int(value));
        self
    }

    /// Adds a boolean extra.
    #[must_use]
    pub fn with_bool(mut self, key: impl Into<String>, value: bool) -> Self {
        self.extras.insert(key.into(), Extra::Bool(value));
        self
    }

    /// Adds a text extra.
    #[must_use]
    pub fn with_text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), Extra::Text(value.into()));
        self
    }

    /// Returns the action string.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Returns the data URI, if any.
    #[must_use]
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    /// Returns the raw extra for a key.
    #[must_use]
    pub fn extra(&self, key: &str) -> Option<&Extra> {
        self.extras.get(key)
    }

    /// Reads a required integer extra.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingField` if absent, `ParseError::InvalidValue`
    /// if the extra is not an integer.
    pub fn int(&self, key: &'static str) -> Result<i64, ParseError> {
        self.optional_int(key)?.ok_or(ParseError::MissingField(key))
    }

    /// Reads an optional integer extra.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` if the extra is present but not an integer.
    pub fn optional_int(&self, key: &'static str) -> Result<Option<i64>, ParseError> {
        match self.extras.get(key) {
            None => Ok(None),
            Some(Extra::Int(v)) => Ok(Some(*v)),
            Some(other) => Err(type_mismatch(key, "integer", other)),
        }
    }

    /// Reads a required boolean extra.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingField` if absent, `ParseError::InvalidValue`
    /// if the extra is not a boolean.
    pub fn bool(&self, key: &'static str) -> Result<bool, ParseError> {
        match self.extras.get(key) {
            None => Err(ParseError::MissingField(key)),
            Some(Extra::Bool(v)) => Ok(*v),
            Some(other) => Err(type_mismatch(key, "boolean", other)),
        }
    }

    /// Reads a required text extra.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingField` if absent, `ParseError::InvalidValue`
    /// if the extra is not text.
    pub fn text(&self, key: &'static str) -> Result<&str, ParseError> {
        self.optional_text(key)?.ok_or(ParseError::MissingField(key))
    }

    /// Reads an optional text extra.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` if the extra is present but not text.
    pub fn optional_text(&self, key: &'static str) -> Result<Option<&str>, ParseError> {
        match self.extras.get(key) {
            None => Ok(None),
            Some(Extra::Text(v)) => Ok(Some(v.as_str())),
            Some(other) => Err(type_mismatch(key, "text", other)),
        }
    }
}

fn type_mismatch(field: &'static str, expected: &str, found: &Extra) -> ParseError {
    ParseError::InvalidValue {
        field,
        message: format!("expected {expected}, found {found:?}"),
    }
}
