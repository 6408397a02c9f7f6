// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Network source.

use crate::error::ParseError;
use crate::event::{DeviceEvent, Notification, action, extra};
use crate::platform::SourceKind;
use crate::types::NetworkKind;

use super::{EventSource, expect_action};

/// Emits [`DeviceEvent::NetworkChanged`] from network state notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkSource;

impl EventSource for NetworkSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Network
    }

    fn on_notification(
        &self,
        notification: &Notification,
    ) -> Result<Option<DeviceEvent>, ParseError> {
        expect_action(notification, action::NETWORK_STATE_CHANGED)?;

        let kind = NetworkKind::from_name(notification.text(extra::NETWORK_TYPE)?);
        let connected = notification.bool(extra::CONNECTED)?;

        Ok(Some(DeviceEvent::NetworkChanged { kind, connected }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kind_and_state() {
        let notification = Notification::new(action::NETWORK_STATE_CHANGED)
            .with_text(extra::NETWORK_TYPE, "WIFI")
            .with_bool(extra::CONNECTED, true);

        assert_eq!(
            NetworkSource.on_notification(&notification).unwrap(),
            Some(DeviceEvent::NetworkChanged {
                kind: NetworkKind::Wifi,
                connected: true,
            })
        );
    }

    #[test]
    fn other_transport_keeps_name() {
        let notification = Notification::new(action::NETWORK_STATE_CHANGED)
            .with_text(extra::NETWORK_TYPE, "ethernet")
            .with_bool(extra::CONNECTED, false);

        assert!(matches!(
            NetworkSource.on_notification(&notification).unwrap(),
            Some(DeviceEvent::NetworkChanged {
                kind: NetworkKind::Other(ref name),
                connected: false,
            }) if name == "ethernet"
        ));
    }

    #[test]
    fn connected_flag_is_required() {
        let notification = Notification::new(action::NETWORK_STATE_CHANGED)
            .with_text(extra::NETWORK_TYPE, "mobile");

        assert_eq!(
            NetworkSource.on_notification(&notification),
            Err(ParseError::MissingField(extra::CONNECTED))
        );
    }

    #[test]
    fn connected_flag_must_be_boolean() {
        let notification = Notification::new(action::NETWORK_STATE_CHANGED)
            .with_text(extra::NETWORK_TYPE, "mobile")
            .with_int(extra::CONNECTED, 1);

        assert!(matches!(
            NetworkSource.on_notification(&notification),
            Err(ParseError::InvalidValue { field: "connected", .. })
        ));
    }
}
