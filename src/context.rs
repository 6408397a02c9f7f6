// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! System context.

use std::sync::Arc;

use crate::bluetooth::BluetoothSequencer;
use crate::config::BridgeConfig;
use crate::dispatch::{Dispatcher, EventPump, EventSender, event_channel};
use crate::error::Error;
use crate::event::{DeviceEvent, Notification};
use crate::platform::{PlatformServices, SourceKind, SubscriptionHandle};
use crate::probe::SystemProbes;
use crate::registry::SourceRegistry;

/// One bridge session between the platform and the engine.
///
/// The context owns the dispatcher, the event source registry, the
/// Bluetooth sequencer and the capability probes. The host creates one per
/// session and routes every platform notification through
/// [`deliver`](Self::deliver). Dropping the context removes every platform
/// subscription it installed.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use syscom_lib::SystemContext;
/// use syscom_lib::config::BridgeConfig;
/// use syscom_lib::event::{Notification, action, extra};
/// use syscom_lib::platform::{InMemoryPlatform, PlatformServices, SourceKind};
///
/// let platform = Arc::new(InMemoryPlatform::new());
/// let (ctx, mut pump) = SystemContext::new(
///     PlatformServices::from_platform(&platform),
///     BridgeConfig::new().with_sink_identity("Launcher"),
/// );
///
/// ctx.register_all().unwrap();
///
/// // The host forwards a battery notification to the receiver it belongs to
/// let handle = platform.subscriptions_for(SourceKind::Battery)[0];
/// ctx.deliver(
///     handle,
///     &Notification::new(action::BATTERY_CHANGED)
///         .with_int(extra::LEVEL, 75)
///         .with_int(extra::SCALE, 100)
///         .with_int(extra::STATUS, 2),
/// );
///
/// pump.pump_pending();
/// let messages = platform.messages();
/// assert_eq!(messages[0].method, "BatteryLevelChange");
/// assert_eq!(messages[0].payload, "1075");
/// ```
pub struct SystemContext {
    dispatcher: Arc<Dispatcher>,
    events: EventSender,
    registry: SourceRegistry,
    bluetooth: BluetoothSequencer,
    probes: SystemProbes,
}

impl SystemContext {
    /// Creates a context and the pump that forwards its events to the sink.
    ///
    /// Events only reach the sink while the pump is driven, either by
    /// spawning [`EventPump::run`] or by calling
    /// [`EventPump::pump_pending`] from the host loop.
    #[must_use]
    pub fn new(services: PlatformServices, config: BridgeConfig) -> (Self, EventPump) {
        let pair_timeout = config.pair_timeout();
        let dispatcher = Arc::new(Dispatcher::new(services.sink().cloned(), config));
        let (events, pump) = event_channel(Arc::clone(&dispatcher));

        let registry = SourceRegistry::new(&services, events.clone());
        let bluetooth = BluetoothSequencer::new(&services, events.clone(), pair_timeout);
        tracing::debug!(?services, "System context created");

        let ctx = Self {
            dispatcher,
            events,
            registry,
            bluetooth,
            probes: SystemProbes::new(services),
        };
        (ctx, pump)
    }

    /// Sets the engine object receiving events.
    pub fn set_sink_identity(&self, identity: impl Into<String>) {
        self.dispatcher.set_sink_identity(identity);
    }

    /// Queues an event for the sink, behind any events already queued.
    pub fn emit(&self, event: DeviceEvent) {
        self.events.send(event);
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Registers the battery, network, volume and package sources.
    ///
    /// # Errors
    ///
    /// Returns the first subscription error; the other sources are still
    /// registered.
    pub fn register_all(&self) -> Result<(), Error> {
        self.registry.register_all()
    }

    /// Unregisters every source. Safe to call repeatedly.
    pub fn unregister_all(&self) {
        self.registry.unregister_all();
    }

    /// Registers one source.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the subscription or the
    /// kind is not a registry source.
    pub fn register(&self, kind: SourceKind) -> Result<(), Error> {
        self.registry.register(kind)
    }

    /// Unregisters one source.
    pub fn unregister(&self, kind: SourceKind) {
        self.registry.unregister(kind);
    }

    /// Registers the volume settings observer.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the subscription.
    pub fn register_volume_observer(&self) -> Result<(), Error> {
        self.registry.register_volume_observer()
    }

    /// Unregisters the volume settings observer.
    pub fn unregister_volume_observer(&self) {
        self.registry.unregister_volume_observer();
    }

    /// Returns true if the source is registered.
    #[must_use]
    pub fn is_registered(&self, kind: SourceKind) -> bool {
        self.registry.is_registered(kind)
    }

    // =========================================================================
    // Platform callbacks
    // =========================================================================

    /// Hands a platform notification to the receiver owning `handle`.
    ///
    /// Never fails: malformed notifications are logged and dropped, and
    /// notifications for unknown or already removed receivers are ignored.
    pub fn deliver(&self, handle: SubscriptionHandle, notification: &Notification) {
        if self.registry.route(handle, notification) || self.bluetooth.route(handle, notification)
        {
            return;
        }
        tracing::debug!(
            %handle,
            action = notification.action(),
            "Notification for inactive receiver ignored"
        );
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Returns the capability probes.
    #[must_use]
    pub fn probes(&self) -> &SystemProbes {
        &self.probes
    }

    /// Returns the Bluetooth sequencer.
    #[must_use]
    pub fn bluetooth(&self) -> &BluetoothSequencer {
        &self.bluetooth
    }

    /// Returns the dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Removes every platform subscription: sources, discovery scan and
    /// outstanding bond requests, which end as failed.
    pub fn shutdown(&self) {
        self.registry.unregister_all();
        self.bluetooth.stop_discovery();
        self.bluetooth.cancel_pending_requests();
        tracing::debug!("System context shut down");
    }
}

impl Drop for SystemContext {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for SystemContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemContext")
            .field("dispatcher", &self.dispatcher)
            .field("registry", &self.registry)
            .field("bluetooth", &self.bluetooth)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{action, extra};
    use crate::platform::InMemoryPlatform;

    fn context() -> (Arc<InMemoryPlatform>, SystemContext, EventPump) {
        let platform = Arc::new(InMemoryPlatform::new());
        let (ctx, pump) = SystemContext::new(
            PlatformServices::from_platform(&platform),
            BridgeConfig::new().with_sink_identity("Launcher"),
        );
        (platform, ctx, pump)
    }

    #[test]
    fn unknown_handle_is_ignored() {
        let (platform, ctx, mut pump) = context();

        ctx.deliver(
            SubscriptionHandle::new(999),
            &Notification::new(action::PACKAGE_ADDED).with_data("package:a"),
        );

        assert_eq!(pump.pump_pending(), 0);
        assert!(platform.messages().is_empty());
    }

    #[test]
    fn emit_goes_through_the_channel() {
        let (platform, ctx, mut pump) = context();

        ctx.emit(DeviceEvent::volume(4));
        assert!(platform.messages().is_empty());

        pump.pump_pending();
        assert_eq!(platform.messages()[0].method, "AudioVolumeChange");
    }

    #[test]
    fn drop_removes_subscriptions() {
        let (platform, ctx, _pump) = context();
        ctx.register_all().unwrap();
        ctx.bluetooth().start_discovery().unwrap();
        assert_eq!(platform.subscription_count(), 5);

        drop(ctx);

        assert_eq!(platform.subscription_count(), 0);
        assert!(!platform.is_discovering());
    }

    #[test]
    fn deliver_routes_to_volume_observer() {
        let (platform, ctx, mut pump) = context();
        ctx.register_volume_observer().unwrap();
        platform.set_current_volume(11);

        let handle = platform.subscriptions_for(SourceKind::Volume)[0];
        ctx.deliver(handle, &Notification::new(action::SETTINGS_CHANGED));

        assert_eq!(pump.pump_pending(), 1);
        assert_eq!(platform.messages()[0].payload, "11");
    }

    #[test]
    fn malformed_network_notification_is_dropped() {
        let (platform, ctx, mut pump) = context();
        ctx.register(SourceKind::Network).unwrap();

        let handle = platform.subscriptions_for(SourceKind::Network)[0];
        ctx.deliver(
            handle,
            &Notification::new(action::NETWORK_STATE_CHANGED).with_int(extra::CONNECTED, 1),
        );

        assert_eq!(pump.pump_pending(), 0);
    }
}
