// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registration lifecycle of the event sources.
//!
//! The registry owns one [`SourceSlot`] per registered source kind (package,
//! volume, battery, network). Every operation is idempotent: registering an
//! active source or unregistering an inactive one does nothing, so the host
//! may call them freely from its own lifecycle hooks.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::dispatch::EventSender;
use crate::error::{Error, ProbeError};
use crate::event::Notification;
use crate::platform::{PlatformServices, SourceKind, SubscriptionHandle, SubscriptionHost};
use crate::source::{
    BatterySource, EventSource, NetworkSource, PackageSource, SourceSlot, VolumeSource,
    forward_notification,
};

/// Registry of the long-lived event sources.
pub struct SourceRegistry {
    host: Option<Arc<dyn SubscriptionHost>>,
    slots: Mutex<Vec<SourceSlot>>,
    events: EventSender,
}

impl SourceRegistry {
    /// Creates a registry with every source inactive.
    #[must_use]
    pub fn new(services: &PlatformServices, events: EventSender) -> Self {
        let slots = SourceKind::REGISTERED
            .iter()
            .filter_map(|kind| -> Option<Box<dyn EventSource>> {
                match kind {
                    SourceKind::Volume => {
                        Some(Box::new(VolumeSource::new(services.audio().ok().cloned())))
                    }
                    SourceKind::Battery => Some(Box::new(BatterySource)),
                    SourceKind::Network => Some(Box::new(NetworkSource)),
                    SourceKind::Package => Some(Box::new(PackageSource)),
                    SourceKind::BluetoothDiscovery | SourceKind::BluetoothBond => None,
                }
            })
            .map(SourceSlot::new)
            .collect();

        Self {
            host: services.subscriptions().ok().cloned(),
            slots: Mutex::new(slots),
            events,
        }
    }

    fn host(&self) -> Result<&dyn SubscriptionHost, ProbeError> {
        self.host
            .as_deref()
            .ok_or(ProbeError::unavailable("subscriptions"))
    }

    /// Registers every source.
    ///
    /// Each source is attempted even if an earlier one fails.
    ///
    /// # Errors
    ///
    /// Returns the first subscription error encountered.
    pub fn register_all(&self) -> Result<(), Error> {
        let host = self.host()?;
        let mut first_error = None;

        for slot in self.slots.lock().iter_mut() {
            if let Err(e) = slot.activate(host) {
                tracing::warn!(kind = %slot.kind(), error = %e, "Failed to register source");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// Unregisters every source. Inactive sources are skipped.
    pub fn unregister_all(&self) {
        let Some(host) = self.host.as_deref() else {
            return;
        };
        for slot in self.slots.lock().iter_mut() {
            slot.deactivate(host);
        }
    }

    /// Registers one source.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the subscription, or if
    /// `kind` is not a registry source (Bluetooth subscriptions belong to
    /// the [`BluetoothSequencer`](crate::bluetooth::BluetoothSequencer)).
    pub fn register(&self, kind: SourceKind) -> Result<(), Error> {
        let host = self.host()?;
        let mut slots = self.slots.lock();
        let slot = slots
            .iter_mut()
            .find(|slot| slot.kind() == kind)
            .ok_or_else(|| {
                ProbeError::rejected("subscriptions", format!("{kind} is not a registry source"))
            })?;
        slot.activate(host)?;
        Ok(())
    }

    /// Unregisters one source. Does nothing if it is not registered.
    pub fn unregister(&self, kind: SourceKind) {
        let Some(host) = self.host.as_deref() else {
            return;
        };
        if let Some(slot) = self.slots.lock().iter_mut().find(|slot| slot.kind() == kind) {
            slot.deactivate(host);
        }
    }

    /// Registers the volume settings observer.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the subscription.
    pub fn register_volume_observer(&self) -> Result<(), Error> {
        self.register(SourceKind::Volume)
    }

    /// Unregisters the volume settings observer.
    pub fn unregister_volume_observer(&self) {
        self.unregister(SourceKind::Volume);
    }

    /// Returns true if the source holds a live subscription.
    #[must_use]
    pub fn is_registered(&self, kind: SourceKind) -> bool {
        self.slots
            .lock()
            .iter()
            .any(|slot| slot.kind() == kind && slot.is_active())
    }

    /// Routes a notification to the source owning `handle`.
    ///
    /// Returns `false` if no active source owns the handle. The source runs
    /// after the registry lock is released, so platform services it calls
    /// may re-enter the registry.
    pub fn route(&self, handle: SubscriptionHandle, notification: &Notification) -> bool {
        let source = self
            .slots
            .lock()
            .iter()
            .find(|slot| slot.handle() == Some(handle))
            .map(SourceSlot::source);
        let Some(source) = source else {
            return false;
        };
        forward_notification(source.as_ref(), notification, &self.events);
        true
    }
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("slots", &*self.slots.lock())
            .finish_non_exhaustive()
    }
}
