// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Battery source.

use crate::error::ParseError;
use crate::event::{DeviceEvent, Notification, action, extra};
use crate::platform::SourceKind;
use crate::types::{BATTERY_STATUS_CHARGING, BatteryLevel};

use super::{EventSource, expect_action};

/// Emits [`DeviceEvent::BatteryChanged`] from battery notifications.
///
/// `level` and `scale` are required; `status` is optional and only the
/// charging status code marks the battery as charging.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatterySource;

impl EventSource for BatterySource {
    fn kind(&self) -> SourceKind {
        SourceKind::Battery
    }

    fn on_notification(
        &self,
        notification: &Notification,
    ) -> Result<Option<DeviceEvent>, ParseError> {
        expect_action(notification, action::BATTERY_CHANGED)?;

        let level = notification.int(extra::LEVEL)?;
        let scale = notification.int(extra::SCALE)?;
        let percent =
            BatteryLevel::from_level_scale(level, scale).map_err(|e| ParseError::InvalidValue {
                field: extra::LEVEL,
                message: e.to_string(),
            })?;
        let charging = notification.optional_int(extra::STATUS)? == Some(BATTERY_STATUS_CHARGING);

        Ok(Some(DeviceEvent::BatteryChanged { percent, charging }))
    }
}
