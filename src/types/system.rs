// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Build identification and screen brightness.

use std::fmt;

use serde::Serialize;

/// Separator used by [`BuildInfo::summary`].
pub const SUMMARY_SEPARATOR: char = '$';

/// Identification of the running system image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    /// End-user visible device model.
    pub model: String,
    /// Display id of the build.
    pub display: String,
    /// SDK (API) level.
    pub sdk_level: u32,
    /// Incremental build identifier.
    pub incremental: String,
    /// Full build fingerprint, `brand/product/device:release/id/tags...`.
    pub fingerprint: String,
}

impl BuildInfo {
    /// Returns `model$display$sdk$incremental`.
    ///
    /// ```
    /// use syscom_lib::types::BuildInfo;
    ///
    /// let info = BuildInfo {
    ///     model: "Lynx-R1".to_string(),
    ///     display: "kona-user 12".to_string(),
    ///     sdk_level: 31,
    ///     incremental: "eng.20230509".to_string(),
    ///     fingerprint: "Lynx-R/kona/kona:12/v1.1.2/eng.20230509:user/keys".to_string(),
    /// };
    /// assert_eq!(info.summary(), "Lynx-R1$kona-user 12$31$eng.20230509");
    /// assert_eq!(info.system_version(), Some("v1.1.2"));
    /// ```
    #[must_use]
    pub fn summary(&self) -> String {
        let s = SUMMARY_SEPARATOR;
        format!(
            "{}{s}{}{s}{}{s}{}",
            self.model, self.display, self.sdk_level, self.incremental
        )
    }

    /// Returns the system version: the fourth `/`-separated segment of the
    /// fingerprint, if present and non-empty.
    #[must_use]
    pub fn system_version(&self) -> Option<&str> {
        self.fingerprint
            .split('/')
            .nth(3)
            .filter(|segment| !segment.is_empty())
    }
}

/// Screen brightness setting (0-2048).
///
/// Out-of-range requests are clamped rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Brightness(u16);

impl Brightness {
    /// Highest accepted setting.
    pub const MAX: Self = Self(2048);

    /// Lowest accepted setting.
    pub const MIN: Self = Self(0);

    /// Creates a brightness, clamping `value` into `[0, 2048]`.
    ///
    /// ```
    /// use syscom_lib::types::Brightness;
    ///
    /// assert_eq!(Brightness::clamped(-5).value(), 0);
    /// assert_eq!(Brightness::clamped(300).value(), 300);
    /// assert_eq!(Brightness::clamped(5000).value(), 2048);
    /// ```
    #[must_use]
    pub fn clamped(value: i32) -> Self {
        let value = value.clamp(0, i32::from(Self::MAX.0));
        Self(u16::try_from(value).unwrap_or(Self::MAX.0))
    }

    /// Returns the raw setting.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
