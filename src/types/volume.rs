// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Audio volume type.

use std::fmt;

use crate::error::ValueError;

/// Typical maximum of the media stream volume on handheld devices.
pub const DEFAULT_MAX_VOLUME: u8 = 15;

/// Media stream volume, validated against the device maximum.
///
/// The maximum is device dependent, so it is supplied at construction
/// time rather than fixed in the type.
///
/// # Examples
///
/// ```
/// use syscom_lib::types::Volume;
///
/// let volume = Volume::new(7, 15).unwrap();
/// assert_eq!(volume.value(), 7);
///
/// assert!(Volume::new(-1, 15).is_err());
/// assert!(Volume::new(16, 15).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Volume(u8);

impl Volume {
    /// Silence.
    pub const MUTED: Self = Self(0);

    /// Creates a volume within `[0, max]`.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `value` is negative or above `max`.
    pub fn new(value: i32, max: u8) -> Result<Self, ValueError> {
        match u8::try_from(value) {
            Ok(v) if v <= max => Ok(Self(v)),
            _ => Err(ValueError::OutOfRange {
                min: 0,
                max: i64::from(max),
                actual: i64::from(value),
            }),
        }
    }

    /// Returns the raw volume step.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
