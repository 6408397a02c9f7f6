// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event sources.
//!
//! An event source turns raw platform [`Notification`]s of one kind into
//! [`DeviceEvent`]s. Sources are stateless parsers; the platform
//! subscription they depend on is owned by a [`SourceSlot`], which the
//! registry activates and deactivates. Sources may call platform services
//! while parsing, so they are shared out of the slot and run without any
//! registry lock held.
//!
//! Malformed notifications never reach the platform callback as errors:
//! the slot logs them at `warn` level and drops them.

mod battery;
mod network;
mod package;
mod volume;

pub use battery::BatterySource;
pub use network::NetworkSource;
pub use package::PackageSource;
pub use volume::VolumeSource;

use std::sync::Arc;

use crate::dispatch::EventSender;
use crate::error::{ParseError, ProbeError};
use crate::event::{DeviceEvent, Notification};
use crate::platform::{SourceKind, SubscriptionFilter, SubscriptionHandle, SubscriptionHost};

/// Parses platform notifications of one kind into device events.
pub trait EventSource: Send + Sync {
    /// Returns the kind of this source.
    fn kind(&self) -> SourceKind;

    /// Returns the subscription filter to register with the platform.
    fn filter(&self) -> SubscriptionFilter {
        SubscriptionFilter::for_kind(self.kind())
    }

    /// Parses a notification.
    ///
    /// Returns `Ok(None)` when the notification is valid but produces no
    /// event.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if required fields are missing or invalid.
    fn on_notification(&self, notification: &Notification)
    -> Result<Option<DeviceEvent>, ParseError>;
}

/// An event source together with its live platform subscription.
pub struct SourceSlot {
    source: Arc<dyn EventSource>,
    handle: Option<SubscriptionHandle>,
}

impl SourceSlot {
    /// Wraps an inactive source.
    #[must_use]
    pub fn new(source: Box<dyn EventSource>) -> Self {
        Self {
            source: Arc::from(source),
            handle: None,
        }
    }

    /// Returns a shared reference to the wrapped source.
    #[must_use]
    pub fn source(&self) -> Arc<dyn EventSource> {
        Arc::clone(&self.source)
    }

    /// Returns the kind of the wrapped source.
    #[must_use]
    pub fn kind(&self) -> SourceKind {
        self.source.kind()
    }

    /// Returns the live subscription handle, if active.
    #[must_use]
    pub fn handle(&self) -> Option<SubscriptionHandle> {
        self.handle
    }

    /// Returns true if the source holds a live subscription.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Subscribes the source. Does nothing if already active.
    ///
    /// Returns `true` if a new subscription was installed.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the subscription; the slot
    /// stays inactive.
    pub fn activate(&mut self, host: &dyn SubscriptionHost) -> Result<bool, ProbeError> {
        if self.handle.is_some() {
            return Ok(false);
        }
        let handle = host.subscribe(&self.source.filter())?;
        tracing::debug!(kind = %self.kind(), %handle, "Source activated");
        self.handle = Some(handle);
        Ok(true)
    }

    /// Removes the subscription. Does nothing if inactive.
    ///
    /// Returns `true` if a subscription was removed.
    pub fn deactivate(&mut self, host: &dyn SubscriptionHost) -> bool {
        let Some(handle) = self.handle.take() else {
            return false;
        };
        host.unsubscribe(handle);
        tracing::debug!(kind = %self.kind(), %handle, "Source deactivated");
        true
    }
}

impl std::fmt::Debug for SourceSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceSlot")
            .field("kind", &self.kind())
            .field("handle", &self.handle)
            .finish()
    }
}

/// Parses a notification with `source` and queues the resulting event.
///
/// Malformed notifications are logged and dropped.
pub fn forward_notification(
    source: &dyn EventSource,
    notification: &Notification,
    events: &EventSender,
) {
    match source.on_notification(notification) {
        Ok(Some(event)) => events.send(event),
        Ok(None) => {}
        Err(e) => tracing::warn!(
            kind = %source.kind(),
            action = notification.action(),
            error = %e,
            "Malformed notification dropped"
        ),
    }
}

/// Returns `UnexpectedAction` unless the notification carries `expected`.
fn expect_action(notification: &Notification, expected: &str) -> Result<(), ParseError> {
    if notification.action() == expected {
        Ok(())
    } else {
        Err(ParseError::UnexpectedAction(notification.action().to_string()))
    }
}
