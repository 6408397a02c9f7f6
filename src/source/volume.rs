// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Volume source.

use std::sync::Arc;

use crate::error::ParseError;
use crate::event::{DeviceEvent, Notification};
use crate::platform::{AudioService, SourceKind};

use super::EventSource;

/// Emits [`DeviceEvent::VolumeChanged`] when system settings change.
///
/// Settings notifications carry no payload, so the current volume is read
/// back from the audio service on every notification. A failed read is
/// logged and produces no event.
pub struct VolumeSource {
    audio: Option<Arc<dyn AudioService>>,
}

impl VolumeSource {
    /// Creates a volume source reading from `audio`.
    #[must_use]
    pub fn new(audio: Option<Arc<dyn AudioService>>) -> Self {
        Self { audio }
    }
}

impl std::fmt::Debug for VolumeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VolumeSource")
            .field("audio", &self.audio.is_some())
            .finish()
    }
}

impl EventSource for VolumeSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Volume
    }

    fn on_notification(
        &self,
        _notification: &Notification,
    ) -> Result<Option<DeviceEvent>, ParseError> {
        let Some(audio) = &self.audio else {
            tracing::warn!("Settings changed but no audio service is available");
            return Ok(None);
        };

        match audio.volume() {
            Ok(level) => Ok(Some(DeviceEvent::volume(level))),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read volume after settings change");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::action;
    use crate::platform::InMemoryPlatform;

    #[test]
    fn reads_current_volume() {
        let platform = Arc::new(InMemoryPlatform::new());
        platform.set_current_volume(9);
        let source = VolumeSource::new(Some(platform.clone()));

        let event = source
            .on_notification(&Notification::new(action::SETTINGS_CHANGED))
            .unwrap();
        assert_eq!(event, Some(DeviceEvent::volume(9)));
    }

    #[test]
    fn failed_read_produces_no_event() {
        let platform = Arc::new(InMemoryPlatform::new());
        platform.reject("volume");
        let source = VolumeSource::new(Some(platform.clone()));

        let event = source
            .on_notification(&Notification::new(action::SETTINGS_CHANGED))
            .unwrap();
        assert!(event.is_none());
    }

    #[test]
    fn missing_audio_service_produces_no_event() {
        let source = VolumeSource::new(None);
        let event = source
            .on_notification(&Notification::new(action::SETTINGS_CHANGED))
            .unwrap();
        assert!(event.is_none());
    }
}
