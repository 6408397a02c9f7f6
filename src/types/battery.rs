// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Battery level type and charge reading.
//!
//! This module provides a type-safe representation of the battery charge,
//! ensuring values are always within the valid range of 0-100%, and the
//! packed integer encoding the engine expects for battery notifications.

use std::fmt;

use serde::Serialize;

use crate::error::ValueError;

/// Platform status code reported while the battery is charging.
pub const BATTERY_STATUS_CHARGING: i64 = 2;

/// Offset added to the percentage in the packed payload while charging.
pub const CHARGING_FLAG: u16 = 1000;

/// Battery charge as a percentage (0-100).
///
/// # Examples
///
/// ```
/// use syscom_lib::types::BatteryLevel;
///
/// let level = BatteryLevel::new(75).unwrap();
/// assert_eq!(level.value(), 75);
///
/// // Derived from the raw level/scale pair of a battery notification
/// let level = BatteryLevel::from_level_scale(3, 4).unwrap();
/// assert_eq!(level.value(), 75);
///
/// assert!(BatteryLevel::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct BatteryLevel(u8);

impl BatteryLevel {
    /// Empty battery.
    pub const EMPTY: Self = Self(0);

    /// Full battery.
    pub const FULL: Self = Self(100);

    /// Creates a new battery level.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: i64::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Computes the percentage from a raw `level` out of `scale`.
    ///
    /// The result is `round(level / scale * 100)`, halves rounded up.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `scale` is not positive or if
    /// `level` is not within `[0, scale]`.
    pub fn from_level_scale(level: i64, scale: i64) -> Result<Self, ValueError> {
        if scale <= 0 {
            return Err(ValueError::OutOfRange {
                min: 1,
                max: i64::MAX,
                actual: scale,
            });
        }
        if !(0..=scale).contains(&level) {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: scale,
                actual: level,
            });
        }
        // Round half up in integers; 0 <= level <= scale keeps this in [0, 100]
        let (level, scale) = (i128::from(level), i128::from(scale));
        let percent = (level * 200 + scale) / (2 * scale);
        let percent = u8::try_from(percent).map_err(|_| ValueError::OutOfRange {
            min: 0,
            max: 100,
            actual: i64::try_from(percent).unwrap_or(i64::MAX),
        })?;
        Ok(Self(percent))
    }

    /// Returns the percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for BatteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for BatteryLevel {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A battery level together with its charging flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatteryReading {
    /// Charge percentage.
    pub percent: BatteryLevel,
    /// Whether the battery is charging.
    pub charging: bool,
}

impl BatteryReading {
    /// Creates a new reading.
    #[must_use]
    pub const fn new(percent: BatteryLevel, charging: bool) -> Self {
        Self { percent, charging }
    }

    /// Returns the packed single-integer encoding.
    ///
    /// Values `>= 1000` mean charging (`percent + 1000`), values below mean
    /// not charging.
    ///
    /// ```
    /// use syscom_lib::types::{BatteryLevel, BatteryReading};
    ///
    /// let reading = BatteryReading::new(BatteryLevel::new(75).unwrap(), true);
    /// assert_eq!(reading.packed(), 1075);
    /// ```
    #[must_use]
    pub fn packed(&self) -> u16 {
        let percent = u16::from(self.percent.value());
        if self.charging {
            percent + CHARGING_FLAG
        } else {
            percent
        }
    }

    /// Decodes a packed value back into a reading.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the percentage part exceeds 100.
    pub fn from_packed(packed: u16) -> Result<Self, ValueError> {
        let (percent, charging) = if packed >= CHARGING_FLAG {
            (packed - CHARGING_FLAG, true)
        } else {
            (packed, false)
        };
        let percent = u8::try_from(percent).map_err(|_| ValueError::OutOfRange {
            min: 0,
            max: 100,
            actual: i64::from(percent),
        })?;
        Ok(Self::new(BatteryLevel::new(percent)?, charging))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_valid_values() {
        for v in 0..=100 {
            assert_eq!(BatteryLevel::new(v).unwrap().value(), v);
        }
        assert!(BatteryLevel::new(101).is_err());
    }

    #[test]
    fn level_from_level_scale_rounds() {
        assert_eq!(BatteryLevel::from_level_scale(75, 100).unwrap().value(), 75);
        assert_eq!(BatteryLevel::from_level_scale(1, 3).unwrap().value(), 33);
        assert_eq!(BatteryLevel::from_level_scale(2, 3).unwrap().value(), 67);
        assert_eq!(BatteryLevel::from_level_scale(0, 50).unwrap().value(), 0);
        assert_eq!(BatteryLevel::from_level_scale(50, 50).unwrap().value(), 100);
    }

    #[test]
    fn level_from_level_scale_rounds_half_up() {
        assert_eq!(BatteryLevel::from_level_scale(23, 40).unwrap().value(), 58);
        assert_eq!(BatteryLevel::from_level_scale(29, 200).unwrap().value(), 15);
        assert_eq!(BatteryLevel::from_level_scale(1, 8).unwrap().value(), 13);
        assert_eq!(BatteryLevel::from_level_scale(1, 200).unwrap().value(), 1);
    }

    #[test]
    fn level_from_level_scale_matches_formula() {
        for scale in 1_i64..=1000 {
            for level in 0..=scale {
                // round(level / scale * 100) with halves going up
                let expected = (level * 200 + scale) / (2 * scale);
                let actual = BatteryLevel::from_level_scale(level, scale).unwrap();
                assert_eq!(i64::from(actual.value()), expected, "{level}/{scale}");
            }
        }
    }

    #[test]
    fn level_from_level_scale_large_scale() {
        let level = BatteryLevel::from_level_scale(i64::MAX / 2, i64::MAX).unwrap();
        assert_eq!(level.value(), 50);
    }

    #[test]
    fn level_from_level_scale_rejects_invalid() {
        assert!(BatteryLevel::from_level_scale(10, 0).is_err());
        assert!(BatteryLevel::from_level_scale(-1, 100).is_err());
        assert!(BatteryLevel::from_level_scale(101, 100).is_err());
        assert!(BatteryLevel::from_level_scale(-1, -1).is_err());
    }

    #[test]
    fn packed_encoding() {
        let level = BatteryLevel::new(75).unwrap();
        assert_eq!(BatteryReading::new(level, true).packed(), 1075);
        assert_eq!(BatteryReading::new(level, false).packed(), 75);
        assert_eq!(BatteryReading::new(BatteryLevel::FULL, true).packed(), 1100);
    }

    #[test]
    fn packed_decoding() {
        let reading = BatteryReading::from_packed(1042).unwrap();
        assert_eq!(reading.percent.value(), 42);
        assert!(reading.charging);

        let reading = BatteryReading::from_packed(42).unwrap();
        assert!(!reading.charging);

        assert!(BatteryReading::from_packed(500).is_err());
    }

    #[test]
    fn level_display() {
        assert_eq!(BatteryLevel::new(75).unwrap().to_string(), "75%");
    }
}
