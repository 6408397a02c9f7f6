// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bluetooth discovery and pairing.
//!
//! The [`BluetoothSequencer`] drives two independent state machines:
//!
//! - **Discovery**: `Idle -> Scanning -> Stopped`. While scanning, every
//!   named device reported by the platform is recorded once, keyed by its
//!   display name, and announced as a
//!   [`DeviceEvent::BluetoothDeviceFound`](crate::event::DeviceEvent).
//! - **Pairing**: one session per bond or unbond request, from
//!   `AwaitingBond` / `AwaitingUnbond` to `Bonded`, `Unbonded` or `Failed`.
//!   Each session has its own platform subscription, removed as soon as the
//!   session ends, so late notifications for a finished request are never
//!   seen by the sequencer.
//!
//! Requests return immediately; outcomes arrive later as events and through
//! the returned [`BondTicket`].
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use syscom_lib::SystemContext;
//! use syscom_lib::bluetooth::DiscoveryState;
//! use syscom_lib::config::BridgeConfig;
//! use syscom_lib::platform::{InMemoryPlatform, PlatformServices};
//!
//! let platform = Arc::new(InMemoryPlatform::new());
//! let (ctx, _pump) = SystemContext::new(
//!     PlatformServices::from_platform(&platform),
//!     BridgeConfig::default(),
//! );
//!
//! let bluetooth = ctx.bluetooth();
//! bluetooth.start_discovery().unwrap();
//! assert_eq!(bluetooth.discovery_state(), DiscoveryState::Scanning);
//!
//! let found = bluetooth.stop_discovery();
//! assert!(found.is_empty());
//! ```

mod discovery;
mod session;

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

pub use discovery::DiscoveryState;
pub use session::{BondPhase, BondTicket};

use crate::dispatch::EventSender;
use crate::error::{BluetoothError, Error, ProbeError};
use crate::event::{DeviceEvent, Notification};
use crate::platform::{
    BluetoothControl, PlatformServices, SourceKind, SubscriptionFilter, SubscriptionHandle,
    SubscriptionHost,
};
use crate::types::{BluetoothDeviceRecord, BondState, PeerDevice};

use discovery::{DiscoveredDevices, parse_bond_change, parse_device};
use session::{BondSession, BondTarget, Step};

/// Bluetooth discovery and pairing sequencer.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct BluetoothSequencer {
    shared: Arc<Shared>,
}

struct Shared {
    control: Option<Arc<dyn BluetoothControl>>,
    host: Option<Arc<dyn SubscriptionHost>>,
    events: EventSender,
    pair_timeout: Duration,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    discovery: DiscoveryState,
    discovery_handle: Option<SubscriptionHandle>,
    discovered: DiscoveredDevices,
    sessions: HashMap<SubscriptionHandle, BondSession>,
}

impl State {
    fn has_session_for(&self, address: &str) -> bool {
        self.sessions
            .values()
            .any(|session| session.device.address == address)
    }
}

impl BluetoothSequencer {
    /// Creates a sequencer. Pairing requests fail after `pair_timeout`.
    #[must_use]
    pub fn new(services: &PlatformServices, events: EventSender, pair_timeout: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                control: services.bluetooth().ok().cloned(),
                host: services.subscriptions().ok().cloned(),
                events,
                pair_timeout,
                state: Mutex::new(State::default()),
            }),
        }
    }

    // =========================================================================
    // Discovery
    // =========================================================================

    /// Starts a discovery scan, clearing the devices of the previous scan.
    ///
    /// # Errors
    ///
    /// Returns `BluetoothError::AlreadyInProgress` if a scan is running, or
    /// the platform error if the scan cannot be started. On failure the
    /// previous scan state and results are kept.
    pub fn start_discovery(&self) -> Result<(), Error> {
        let shared = &self.shared;
        let control = shared.control()?;
        let host = shared.host()?;

        let (previous_state, previous_devices) = {
            let mut state = shared.state.lock();
            if state.discovery == DiscoveryState::Scanning {
                return Err(BluetoothError::AlreadyInProgress("discovery").into());
            }
            let previous = state.discovery;
            state.discovery = DiscoveryState::Scanning;
            (previous, std::mem::take(&mut state.discovered))
        };

        let revert = |handle: Option<SubscriptionHandle>| {
            let mut state = shared.state.lock();
            state.discovery = previous_state;
            state.discovered = previous_devices.clone();
            state.discovery_handle = None;
            drop(state);
            if let Some(handle) = handle {
                host.unsubscribe(handle);
            }
        };

        let filter = SubscriptionFilter::for_kind(SourceKind::BluetoothDiscovery);
        let handle = match host.subscribe(&filter) {
            Ok(handle) => handle,
            Err(e) => {
                revert(None);
                return Err(e.into());
            }
        };
        shared.state.lock().discovery_handle = Some(handle);

        if let Err(e) = control.start_discovery() {
            tracing::warn!(error = %e, "Failed to start discovery");
            revert(Some(handle));
            return Err(e.into());
        }

        tracing::debug!(%handle, "Discovery started");
        Ok(())
    }

    /// Stops the running scan and returns the devices found.
    ///
    /// Safe to call when no scan is running; the devices of the last scan
    /// are returned in that case too.
    pub fn stop_discovery(&self) -> Vec<BluetoothDeviceRecord> {
        let shared = &self.shared;
        let (handle, records) = {
            let mut state = shared.state.lock();
            let records = state.discovered.records();
            if state.discovery != DiscoveryState::Scanning {
                return records;
            }
            state.discovery = DiscoveryState::Stopped;
            (state.discovery_handle.take(), records)
        };

        if let (Some(host), Some(handle)) = (shared.host.as_deref(), handle) {
            host.unsubscribe(handle);
        }
        if let Some(control) = shared.control.as_deref()
            && let Err(e) = control.cancel_discovery()
        {
            tracing::warn!(error = %e, "Failed to cancel discovery");
        }

        tracing::debug!(devices = records.len(), "Discovery stopped");
        records
    }

    /// Returns the devices found by the current or last scan, in the order
    /// they were first seen.
    #[must_use]
    pub fn discovered_devices(&self) -> Vec<BluetoothDeviceRecord> {
        self.shared.state.lock().discovered.records()
    }

    /// Returns the discovery state.
    #[must_use]
    pub fn discovery_state(&self) -> DiscoveryState {
        self.shared.state.lock().discovery
    }

    // =========================================================================
    // Pairing
    // =========================================================================

    /// Requests bonding with a device found by discovery.
    ///
    /// Completion emits `NewBluetoophDeviceBonded` with the device name.
    ///
    /// # Errors
    ///
    /// Returns `BluetoothError::DeviceNotFound` if no discovered device has
    /// this name, `BluetoothError::AlreadyInProgress` if a request for the
    /// device is outstanding, or the platform error if the request cannot
    /// be issued.
    pub fn request_pair(&self, name: &str) -> Result<BondTicket, Error> {
        let device = self
            .shared
            .state
            .lock()
            .discovered
            .get(name)
            .cloned()
            .ok_or_else(|| BluetoothError::DeviceNotFound(name.to_string()))?;

        self.open_session(device, name, BondTarget::Bond)
    }

    /// Requests removal of the bond with a bonded device.
    ///
    /// Completion emits `BluetoophDeviceUnbonded` with the device name.
    ///
    /// # Errors
    ///
    /// Returns `BluetoothError::DeviceNotFound` if no bonded device has this
    /// name, `BluetoothError::AlreadyInProgress` if a request for the device
    /// is outstanding, or the platform error if the request cannot be issued.
    pub fn request_unpair(&self, name: &str) -> Result<BondTicket, Error> {
        let device = self
            .shared
            .control()?
            .bonded_devices()?
            .into_iter()
            .find(|device| device.name.as_deref() == Some(name))
            .ok_or_else(|| BluetoothError::DeviceNotFound(name.to_string()))?;

        self.open_session(device, name, BondTarget::Unbond)
    }

    fn open_session(
        &self,
        device: PeerDevice,
        name: &str,
        target: BondTarget,
    ) -> Result<BondTicket, Error> {
        let shared = &self.shared;
        let control = shared.control()?;
        let host = shared.host()?;

        if shared.state.lock().has_session_for(&device.address) {
            return Err(BluetoothError::AlreadyInProgress("bond request").into());
        }

        let handle = host.subscribe(&SubscriptionFilter::for_kind(SourceKind::BluetoothBond))?;
        let (mut session, phase) = BondSession::new(device.clone(), name.to_string(), target);
        let id = session.id;

        {
            let mut state = shared.state.lock();
            // A concurrent request may have won the race since the check above
            if state.has_session_for(&device.address) {
                drop(state);
                host.unsubscribe(handle);
                return Err(BluetoothError::AlreadyInProgress("bond request").into());
            }
            session.timeout = self.arm_timeout(handle);
            state.sessions.insert(handle, session);
        }

        let issued = match target {
            BondTarget::Bond => control.bond(&device),
            BondTarget::Unbond => control.unbond(&device),
        };
        if let Err(e) = issued {
            tracing::warn!(request_id = %id, device = %name, error = %e, "Bond request refused");
            shared.end_session(handle, BondPhase::Failed);
            return Err(e.into());
        }

        tracing::debug!(request_id = %id, device = %name, ?target, %handle, "Bond request issued");
        Ok(BondTicket::new(id, name.to_string(), phase))
    }

    fn arm_timeout(&self, handle: SubscriptionHandle) -> Option<JoinHandle<()>> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(%handle, "No async runtime, bond request has no timeout");
            return None;
        };
        let shared: Weak<Shared> = Arc::downgrade(&self.shared);
        let timeout = self.shared.pair_timeout;

        Some(runtime.spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(shared) = shared.upgrade()
                && shared.end_session(handle, BondPhase::Failed)
            {
                tracing::warn!(%handle, ?timeout, "Bond request timed out");
            }
        }))
    }

    /// Fails every outstanding bond and unbond request.
    pub fn cancel_pending_requests(&self) {
        let handles: Vec<_> = self.shared.state.lock().sessions.keys().copied().collect();
        for handle in handles {
            self.shared.end_session(handle, BondPhase::Failed);
        }
    }

    /// Returns the number of outstanding bond and unbond requests.
    #[must_use]
    pub fn pending_request_count(&self) -> usize {
        self.shared.state.lock().sessions.len()
    }

    // =========================================================================
    // Notification routing
    // =========================================================================

    /// Handles a notification delivered to one of the sequencer's
    /// subscriptions.
    ///
    /// Returns `false` if the handle belongs to neither the running scan nor
    /// an outstanding request.
    pub fn route(&self, handle: SubscriptionHandle, notification: &Notification) -> bool {
        let is_discovery = self.shared.state.lock().discovery_handle == Some(handle);
        if is_discovery {
            self.shared.on_device_found(notification);
            return true;
        }
        self.shared.on_bond_change(handle, notification)
    }
}

impl Shared {
    fn control(&self) -> Result<&dyn BluetoothControl, ProbeError> {
        self.control
            .as_deref()
            .ok_or(ProbeError::unavailable("bluetooth"))
    }

    fn host(&self) -> Result<&dyn SubscriptionHost, ProbeError> {
        self.host
            .as_deref()
            .ok_or(ProbeError::unavailable("subscriptions"))
    }

    fn on_device_found(&self, notification: &Notification) {
        let device = match parse_device(notification) {
            Ok(device) => device,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed device notification dropped");
                return;
            }
        };

        let record = {
            let mut state = self.state.lock();
            if state.discovery != DiscoveryState::Scanning {
                return;
            }
            state.discovered.insert(device)
        };

        if let Some(record) = record {
            tracing::debug!(name = %record.name, device_type = ?record.device_type, "Device found");
            self.events
                .send(DeviceEvent::device_found(record.name, record.device_type));
        }
    }

    fn on_bond_change(&self, handle: SubscriptionHandle, notification: &Notification) -> bool {
        let mut state = self.state.lock();
        let Some(session) = state.sessions.get_mut(&handle) else {
            return false;
        };

        let (address, bond_state) = match parse_bond_change(notification) {
            Ok(change) => change,
            Err(e) => {
                tracing::warn!(%handle, error = %e, "Malformed bond notification dropped");
                return true;
            }
        };
        // The subscription receives bond changes of every device
        if address != session.device.address {
            return true;
        }

        tracing::debug!(request_id = %session.id, state = %bond_state, "Bond state changed");
        let Step::Finished(phase) = session.observe(bond_state) else {
            return true;
        };
        let Some(session) = state.sessions.remove(&handle) else {
            return true;
        };
        drop(state);

        self.release(handle);
        let event = match phase {
            BondPhase::Bonded => Some(DeviceEvent::bond_changed(&session.name, BondState::Bonded)),
            BondPhase::Unbonded => {
                Some(DeviceEvent::bond_changed(&session.name, BondState::Unbonded))
            }
            _ => None,
        };
        tracing::debug!(request_id = %session.id, %phase, "Bond request finished");
        session.finish(phase);

        if let Some(event) = event {
            self.events.send(event);
        }
        true
    }

    /// Ends a session without an event. Returns false if it already ended.
    fn end_session(&self, handle: SubscriptionHandle, phase: BondPhase) -> bool {
        let Some(session) = self.state.lock().sessions.remove(&handle) else {
            return false;
        };
        self.release(handle);
        session.finish(phase);
        true
    }

    fn release(&self, handle: SubscriptionHandle) {
        if let Some(host) = self.host.as_deref() {
            host.unsubscribe(handle);
        }
    }
}

impl std::fmt::Debug for BluetoothSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("BluetoothSequencer")
            .field("discovery", &state.discovery)
            .field("discovered", &state.discovered.len())
            .field("sessions", &state.sessions.len())
            .field("pair_timeout", &self.shared.pair_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BridgeConfig;
    use crate::dispatch::{Dispatcher, EventPump, event_channel};
    use crate::event::{action, extra};
    use crate::platform::InMemoryPlatform;
    use crate::types::DeviceType;

    const TIMEOUT: Duration = Duration::from_secs(30);

    fn setup() -> (Arc<InMemoryPlatform>, BluetoothSequencer, EventPump) {
        let platform = Arc::new(InMemoryPlatform::new());
        let services = PlatformServices::from_platform(&platform);
        let dispatcher = Arc::new(Dispatcher::new(
            services.sink().cloned(),
            BridgeConfig::new()
                .with_sink_identity("Launcher")
                .with_extended_events(),
        ));
        let (tx, pump) = event_channel(dispatcher);
        (platform, BluetoothSequencer::new(&services, tx, TIMEOUT), pump)
    }

    fn found(address: &str, name: &str) -> Notification {
        Notification::new(action::BLUETOOTH_DEVICE_FOUND)
            .with_text(extra::DEVICE_ADDRESS, address)
            .with_text(extra::DEVICE_NAME, name)
            .with_int(extra::DEVICE_CLASS, 0x0404)
    }

    fn bond_state(address: &str, code: i64) -> Notification {
        Notification::new(action::BLUETOOTH_BOND_STATE_CHANGED)
            .with_text(extra::DEVICE_ADDRESS, address)
            .with_int(extra::BOND_STATE, code)
    }

    fn discover(
        platform: &InMemoryPlatform,
        bluetooth: &BluetoothSequencer,
        devices: &[(&str, &str)],
    ) {
        bluetooth.start_discovery().unwrap();
        let handle = platform.subscriptions_for(SourceKind::BluetoothDiscovery)[0];
        for (address, name) in devices {
            assert!(bluetooth.route(handle, &found(address, name)));
        }
    }

    fn bond_handle(platform: &InMemoryPlatform) -> SubscriptionHandle {
        *platform
            .subscriptions_for(SourceKind::BluetoothBond)
            .last()
            .unwrap()
    }

    #[test]
    fn discovery_records_each_name_once() {
        let (platform, bluetooth, mut pump) = setup();

        discover(
            &platform,
            &bluetooth,
            &[("AA", "DeviceA"), ("BB", "DeviceA"), ("CC", "DeviceC")],
        );
        assert!(platform.is_discovering());

        let devices = bluetooth.stop_discovery();
        assert_eq!(
            devices,
            vec![
                BluetoothDeviceRecord::new("DeviceA", DeviceType::AudioVideo),
                BluetoothDeviceRecord::new("DeviceC", DeviceType::AudioVideo),
            ]
        );
        assert!(!platform.is_discovering());
        assert_eq!(bluetooth.discovery_state(), DiscoveryState::Stopped);

        // One found event per distinct name
        assert_eq!(pump.pump_pending(), 2);
        let payloads: Vec<_> = platform.messages().into_iter().map(|m| m.payload).collect();
        assert_eq!(payloads, vec!["DeviceA", "DeviceC"]);
    }

    #[test]
    fn second_discovery_is_rejected() {
        let (platform, bluetooth, _pump) = setup();

        bluetooth.start_discovery().unwrap();
        assert!(matches!(
            bluetooth.start_discovery(),
            Err(Error::Bluetooth(BluetoothError::AlreadyInProgress(_)))
        ));
        assert_eq!(platform.subscriptions_for(SourceKind::BluetoothDiscovery).len(), 1);
    }

    #[test]
    fn restart_clears_previous_devices() {
        let (platform, bluetooth, _pump) = setup();

        discover(&platform, &bluetooth, &[("AA", "DeviceA")]);
        bluetooth.stop_discovery();
        bluetooth.start_discovery().unwrap();

        assert!(bluetooth.discovered_devices().is_empty());
    }

    #[test]
    fn failed_start_reverts_state() {
        let (platform, bluetooth, _pump) = setup();
        discover(&platform, &bluetooth, &[("AA", "DeviceA")]);
        bluetooth.stop_discovery();

        platform.reject("start_discovery");
        assert!(bluetooth.start_discovery().is_err());

        assert_eq!(bluetooth.discovery_state(), DiscoveryState::Stopped);
        assert_eq!(bluetooth.discovered_devices().len(), 1);
        assert!(platform.subscriptions_for(SourceKind::BluetoothDiscovery).is_empty());
    }

    #[test]
    fn stop_without_scan_is_noop() {
        let (platform, bluetooth, _pump) = setup();

        assert!(bluetooth.stop_discovery().is_empty());
        assert_eq!(bluetooth.discovery_state(), DiscoveryState::Idle);
        assert_eq!(platform.subscription_count(), 0);
    }

    #[test]
    fn sightings_after_stop_are_ignored() {
        let (platform, bluetooth, _pump) = setup();
        discover(&platform, &bluetooth, &[]);
        let handle = platform.subscriptions_for(SourceKind::BluetoothDiscovery)[0];
        bluetooth.stop_discovery();

        assert!(!bluetooth.route(handle, &found("AA", "Late")));
        assert!(bluetooth.discovered_devices().is_empty());
    }

    #[test]
    fn pair_unknown_device() {
        let (platform, bluetooth, mut pump) = setup();

        assert!(matches!(
            bluetooth.request_pair("DeviceX"),
            Err(Error::Bluetooth(BluetoothError::DeviceNotFound(ref name))) if name == "DeviceX"
        ));
        assert!(platform.bond_requests().is_empty());
        assert_eq!(platform.subscription_count(), 0);
        assert_eq!(pump.pump_pending(), 0);
    }

    #[tokio::test]
    async fn pair_emits_once() {
        let (platform, bluetooth, mut pump) = setup();
        discover(&platform, &bluetooth, &[("AA", "DeviceX")]);
        bluetooth.stop_discovery();
        pump.pump_pending();

        let mut ticket = bluetooth.request_pair("DeviceX").unwrap();
        assert_eq!(platform.bond_requests(), vec!["AA"]);
        let handle = bond_handle(&platform);

        assert!(bluetooth.route(handle, &bond_state("AA", 11)));
        assert_eq!(ticket.phase(), BondPhase::AwaitingBond);
        assert!(bluetooth.route(handle, &bond_state("AA", 12)));

        // Session is gone; a spurious repeat is not routed
        assert!(!bluetooth.route(handle, &bond_state("AA", 12)));

        assert_eq!(ticket.wait().await, BondPhase::Bonded);
        assert_eq!(bluetooth.pending_request_count(), 0);
        assert!(platform.subscriptions_for(SourceKind::BluetoothBond).is_empty());

        assert_eq!(pump.pump_pending(), 1);
        let last = platform.messages().pop().unwrap();
        assert_eq!(last.method, "NewBluetoophDeviceBonded");
        assert_eq!(last.payload, "DeviceX");
    }

    #[tokio::test]
    async fn bond_notifications_for_other_devices_are_ignored() {
        let (platform, bluetooth, mut pump) = setup();
        discover(&platform, &bluetooth, &[("AA", "DeviceX")]);
        pump.pump_pending();

        let ticket = bluetooth.request_pair("DeviceX").unwrap();
        let handle = bond_handle(&platform);

        assert!(bluetooth.route(handle, &bond_state("ZZ", 12)));
        assert_eq!(ticket.phase(), BondPhase::AwaitingBond);
        assert_eq!(pump.pump_pending(), 0);
    }

    #[tokio::test]
    async fn pair_failure_emits_nothing() {
        let (platform, bluetooth, mut pump) = setup();
        discover(&platform, &bluetooth, &[("AA", "DeviceX")]);
        pump.pump_pending();

        let mut ticket = bluetooth.request_pair("DeviceX").unwrap();
        let handle = bond_handle(&platform);

        bluetooth.route(handle, &bond_state("AA", 11));
        bluetooth.route(handle, &bond_state("AA", 10));

        assert_eq!(ticket.wait().await, BondPhase::Failed);
        assert_eq!(pump.pump_pending(), 0);
    }

    #[tokio::test]
    async fn duplicate_request_is_rejected() {
        let (platform, bluetooth, _pump) = setup();
        discover(&platform, &bluetooth, &[("AA", "DeviceX")]);

        let _ticket = bluetooth.request_pair("DeviceX").unwrap();
        assert!(matches!(
            bluetooth.request_pair("DeviceX"),
            Err(Error::Bluetooth(BluetoothError::AlreadyInProgress(_)))
        ));
        assert_eq!(platform.subscriptions_for(SourceKind::BluetoothBond).len(), 1);
    }

    #[tokio::test]
    async fn refused_bond_tears_down_session() {
        let (platform, bluetooth, _pump) = setup();
        discover(&platform, &bluetooth, &[("AA", "DeviceX")]);
        platform.reject("bond");

        assert!(matches!(
            bluetooth.request_pair("DeviceX"),
            Err(Error::Probe(ProbeError::Rejected { .. }))
        ));
        assert_eq!(bluetooth.pending_request_count(), 0);
        assert!(platform.subscriptions_for(SourceKind::BluetoothBond).is_empty());
    }

    #[tokio::test]
    async fn unpair_bonded_device() {
        let (platform, bluetooth, mut pump) = setup();
        platform.set_bonded_devices(vec![PeerDevice::new("BB", "Speaker", 0x0400)]);

        let mut ticket = bluetooth.request_unpair("Speaker").unwrap();
        assert_eq!(ticket.phase(), BondPhase::AwaitingUnbond);
        assert_eq!(platform.unbond_requests(), vec!["BB"]);

        bluetooth.route(bond_handle(&platform), &bond_state("BB", 10));

        assert_eq!(ticket.wait().await, BondPhase::Unbonded);
        assert_eq!(pump.pump_pending(), 1);
        let message = platform.messages().pop().unwrap();
        assert_eq!(message.method, "BluetoophDeviceUnbonded");
        assert_eq!(message.payload, "Speaker");
    }

    #[test]
    fn unpair_unknown_device() {
        let (_platform, bluetooth, _pump) = setup();
        assert!(matches!(
            bluetooth.request_unpair("Nobody"),
            Err(Error::Bluetooth(BluetoothError::DeviceNotFound(_)))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn pairing_times_out() {
        let (platform, bluetooth, mut pump) = setup();
        discover(&platform, &bluetooth, &[("AA", "DeviceX")]);
        pump.pump_pending();

        let mut ticket = bluetooth.request_pair("DeviceX").unwrap();
        let handle = bond_handle(&platform);
        bluetooth.route(handle, &bond_state("AA", 11));

        tokio::time::sleep(TIMEOUT + Duration::from_secs(1)).await;

        assert_eq!(ticket.wait().await, BondPhase::Failed);
        assert_eq!(bluetooth.pending_request_count(), 0);
        assert!(platform.subscriptions_for(SourceKind::BluetoothBond).is_empty());
        assert!(!bluetooth.route(handle, &bond_state("AA", 12)));
        assert_eq!(pump.pump_pending(), 0);
    }

    #[test]
    fn pairing_without_runtime_has_no_timeout() {
        let (platform, bluetooth, _pump) = setup();
        discover(&platform, &bluetooth, &[("AA", "DeviceX")]);

        let ticket = bluetooth.request_pair("DeviceX").unwrap();
        assert_eq!(ticket.phase(), BondPhase::AwaitingBond);

        bluetooth.cancel_pending_requests();
        assert_eq!(ticket.phase(), BondPhase::Failed);
        assert!(platform.subscriptions_for(SourceKind::BluetoothBond).is_empty());
    }

    #[test]
    fn missing_bluetooth_service() {
        let platform = Arc::new(InMemoryPlatform::new());
        let services = PlatformServices::builder()
            .subscriptions(platform.clone())
            .build();
        let dispatcher = Arc::new(Dispatcher::new(None, BridgeConfig::default()));
        let (tx, _pump) = event_channel(dispatcher);
        let bluetooth = BluetoothSequencer::new(&services, tx, TIMEOUT);

        assert!(matches!(
            bluetooth.start_discovery(),
            Err(Error::Probe(ProbeError::Unavailable { service: "bluetooth" }))
        ));
        assert!(bluetooth.stop_discovery().is_empty());
    }
}
