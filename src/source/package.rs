// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Package source.

use crate::error::ParseError;
use crate::event::{DeviceEvent, Notification, action};
use crate::platform::SourceKind;

use super::EventSource;

/// Emits [`DeviceEvent::PackageChanged`] on package install and full removal.
///
/// The event identifier is the notification's data URI, forwarded as-is
/// (`package:<id>`).
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageSource;

impl EventSource for PackageSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Package
    }

    fn on_notification(
        &self,
        notification: &Notification,
    ) -> Result<Option<DeviceEvent>, ParseError> {
        let identifier = || notification.data().ok_or(ParseError::MissingField("data"));

        match notification.action() {
            action::PACKAGE_ADDED => Ok(Some(DeviceEvent::package_added(identifier()?))),
            action::PACKAGE_FULLY_REMOVED => Ok(Some(DeviceEvent::package_removed(identifier()?))),
            other => Err(ParseError::UnexpectedAction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::PackageAction;

    #[test]
    fn added_and_removed() {
        let added = Notification::new(action::PACKAGE_ADDED).with_data("package:com.example.game");
        let removed =
            Notification::new(action::PACKAGE_FULLY_REMOVED).with_data("package:com.example.game");

        assert_eq!(
            PackageSource.on_notification(&added).unwrap(),
            Some(DeviceEvent::PackageChanged {
                action: PackageAction::Added,
                identifier: "package:com.example.game".to_string(),
            })
        );
        assert_eq!(
            PackageSource.on_notification(&removed).unwrap(),
            Some(DeviceEvent::package_removed("package:com.example.game"))
        );
    }

    #[test]
    fn data_is_required() {
        let notification = Notification::new(action::PACKAGE_ADDED);
        assert_eq!(
            PackageSource.on_notification(&notification),
            Err(ParseError::MissingField("data"))
        );
    }

    #[test]
    fn partial_removal_is_not_handled() {
        let notification = Notification::new("android.intent.action.PACKAGE_REMOVED")
            .with_data("package:com.example.game");
        assert!(matches!(
            PackageSource.on_notification(&notification),
            Err(ParseError::UnexpectedAction(_))
        ));
    }
}
