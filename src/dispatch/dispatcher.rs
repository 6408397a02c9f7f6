// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event dispatcher.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::config::BridgeConfig;
use crate::event::DeviceEvent;
use crate::platform::EventSink;

use super::WireMessage;

/// Forwards device events to the engine sink.
///
/// The dispatcher owns the sink identity, the name of the engine object that
/// receives every message. Until an identity is set, emitted events are
/// dropped and counted.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use syscom_lib::config::BridgeConfig;
/// use syscom_lib::dispatch::Dispatcher;
/// use syscom_lib::event::DeviceEvent;
/// use syscom_lib::platform::InMemoryPlatform;
///
/// let platform = Arc::new(InMemoryPlatform::new());
/// let dispatcher = Dispatcher::new(Some(platform.clone()), BridgeConfig::default());
///
/// dispatcher.emit(&DeviceEvent::volume(4));
/// assert_eq!(dispatcher.dropped_count(), 1);
///
/// dispatcher.set_sink_identity("Launcher");
/// dispatcher.emit(&DeviceEvent::volume(4));
/// assert_eq!(dispatcher.delivered_count(), 1);
/// assert_eq!(platform.messages()[0].target, "Launcher");
/// ```
pub struct Dispatcher {
    sink: Option<Arc<dyn EventSink>>,
    config: BridgeConfig,
    identity: RwLock<Option<String>>,
    delivered: AtomicU64,
    dropped: AtomicU64,
}

impl Dispatcher {
    /// Creates a dispatcher. The initial sink identity comes from the
    /// configuration.
    #[must_use]
    pub fn new(sink: Option<Arc<dyn EventSink>>, config: BridgeConfig) -> Self {
        let identity = config.sink_identity.clone();
        Self {
            sink,
            config,
            identity: RwLock::new(identity),
            delivered: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Sets the sink identity. Takes effect for the next emitted event.
    pub fn set_sink_identity(&self, identity: impl Into<String>) {
        let identity = identity.into();
        tracing::debug!(%identity, "Sink identity set");
        *self.identity.write() = Some(identity);
    }

    /// Clears the sink identity.
    pub fn clear_sink_identity(&self) {
        *self.identity.write() = None;
    }

    /// Returns the current sink identity.
    #[must_use]
    pub fn sink_identity(&self) -> Option<String> {
        self.identity.read().clone()
    }

    /// Returns the configuration the dispatcher encodes with.
    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Encodes an event and sends it to the sink.
    ///
    /// Never fails: events without a wire mapping are skipped, and events
    /// emitted without a sink identity are dropped with a warning.
    pub fn emit(&self, event: &DeviceEvent) {
        let Some(message) = WireMessage::encode(event, &self.config) else {
            tracing::debug!(?event, "Event has no wire mapping, skipped");
            return;
        };

        // Clone out so the lock is not held across the sink call
        let identity = self.identity.read().clone();
        let (Some(identity), Some(sink)) = (identity, self.sink.as_ref()) else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                event_name = message.event_name,
                "No sink configured, event dropped"
            );
            return;
        };

        tracing::debug!(
            target_object = %identity,
            event_name = message.event_name,
            payload = %message.payload,
            "Dispatching event"
        );
        sink.send_message(&identity, message.event_name, &message.payload);
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of events delivered to the sink.
    #[must_use]
    pub fn delivered_count(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Returns the number of events dropped for lack of a sink.
    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("sink", &self.sink.is_some())
            .field("identity", &*self.identity.read())
            .field("delivered", &self.delivered_count())
            .field("dropped", &self.dropped_count())
            .finish_non_exhaustive()
    }
}
