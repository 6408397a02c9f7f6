// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `SysCom` library.
//!
//! This module provides the error hierarchy for the library: platform service
//! failures, value validation, notification parsing, Bluetooth sequencing and
//! configuration loading.
//!
//! Malformed notifications ([`ParseError`]) are never surfaced to the platform
//! callback that delivered them; they are logged and dropped by the event
//! sources. A missing sink identity is not an error at all: the dispatcher
//! counts and drops the event.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A platform service is missing or refused the request.
    #[error("probe error: {0}")]
    Probe(#[from] ProbeError),

    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// A platform notification could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A Bluetooth discovery or pairing request failed.
    #[error("bluetooth error: {0}")]
    Bluetooth(#[from] BluetoothError),

    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors reported by platform services.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The underlying OS service is not available on this device.
    #[error("{service} service is unavailable")]
    Unavailable {
        /// Name of the missing service.
        service: &'static str,
    },

    /// The OS service refused the request (permission denied, adapter off...).
    #[error("{service} service rejected the request: {reason}")]
    Rejected {
        /// Name of the service.
        service: &'static str,
        /// Reason reported by the platform.
        reason: String,
    },
}

impl ProbeError {
    /// Creates an [`Unavailable`](Self::Unavailable) error.
    #[must_use]
    pub fn unavailable(service: &'static str) -> Self {
        Self::Unavailable { service }
    }

    /// Creates a [`Rejected`](Self::Rejected) error.
    #[must_use]
    pub fn rejected(service: &'static str, reason: impl Into<String>) -> Self {
        Self::Rejected {
            service,
            reason: reason.into(),
        }
    }
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// The time zone label is not part of the supported label table.
    #[error("unknown time zone label: {0}")]
    UnknownTimeZone(String),

    /// A name argument was empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Errors raised while parsing a platform notification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Expected field is missing from the notification.
    #[error("missing field in notification: {0}")]
    MissingField(&'static str),

    /// A field is present but has the wrong type or an invalid value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: &'static str,
        /// Description of the parsing failure.
        message: String,
    },

    /// The notification action is not handled by the receiving source.
    #[error("unexpected notification action: {0}")]
    UnexpectedAction(String),
}

/// Errors related to Bluetooth discovery and pairing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BluetoothError {
    /// The requested device is not in the discovered or bonded set.
    #[error("bluetooth device not found: {0}")]
    DeviceNotFound(String),

    /// A discovery session or a bond request for the device is already active.
    #[error("operation already in progress: {0}")]
    AlreadyInProgress(&'static str),
}

/// Errors related to configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value is invalid.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
