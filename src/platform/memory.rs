// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory platform.
//!
//! [`InMemoryPlatform`] implements every capability trait on top of plain
//! in-memory state. It records what the library asked of it (subscriptions,
//! bond requests, wifi connections, force-stops, sink messages) so a host simulator or a
//! test can inspect it, and lets individual operations be rejected to
//! exercise failure paths.

use std::collections::{BTreeSet, HashMap, HashSet};

use parking_lot::Mutex;

use crate::error::ProbeError;
use crate::types::{
    AdapterState, BatteryLevel, BatteryReading, Brightness, BuildInfo, DEFAULT_MAX_VOLUME,
    KeyManagement, NetworkInfo, Partition, PeerDevice, ScanEntry, StorageStats, Volume,
};

use super::{
    AudioService, BluetoothControl, DisplayService, EventSink, NetworkService, PackageService,
    PowerService, ProcessControl, SourceKind, StorageService, SubscriptionFilter,
    SubscriptionHandle, SubscriptionHost, SystemInfoService, TimeService,
};

/// A message received by the in-memory sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkMessage {
    /// Target object name.
    pub target: String,
    /// Method name (event name).
    pub method: String,
    /// Payload.
    pub payload: String,
}

#[derive(Debug)]
struct State {
    battery: BatteryReading,
    volume: u8,
    max_volume: u8,
    microphone_muted: bool,
    networks: Vec<NetworkInfo>,
    scan_results: Vec<ScanEntry>,
    connection: Option<ScanEntry>,
    wifi_enabled: bool,
    wifi_requests: Vec<(String, KeyManagement)>,
    adapter: AdapterState,
    adapter_name: String,
    bonded: Vec<PeerDevice>,
    discovering: bool,
    bond_requests: Vec<String>,
    unbond_requests: Vec<String>,
    storage: HashMap<Partition, StorageStats>,
    total_memory: u64,
    time_zone: String,
    build_info: BuildInfo,
    brightness: Brightness,
    installed: BTreeSet<String>,
    force_stopped: Vec<String>,
    subscriptions: HashMap<SubscriptionHandle, SubscriptionFilter>,
    next_handle: u64,
    messages: Vec<SinkMessage>,
    rejected: HashSet<&'static str>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            battery: BatteryReading::new(BatteryLevel::FULL, false),
            volume: 0,
            max_volume: DEFAULT_MAX_VOLUME,
            microphone_muted: false,
            networks: Vec::new(),
            scan_results: Vec::new(),
            connection: None,
            wifi_enabled: true,
            wifi_requests: Vec::new(),
            adapter: AdapterState::On,
            adapter_name: "syscom".to_string(),
            bonded: Vec::new(),
            discovering: false,
            bond_requests: Vec::new(),
            unbond_requests: Vec::new(),
            storage: HashMap::new(),
            total_memory: 0,
            time_zone: "Europe/London".to_string(),
            build_info: BuildInfo {
                model: "InMemory".to_string(),
                display: "syscom-sim".to_string(),
                sdk_level: 33,
                incremental: "1".to_string(),
                fingerprint: "syscom/sim/sim:13/v0.1.0/1:user/test-keys".to_string(),
            },
            brightness: Brightness::clamped(1024),
            installed: BTreeSet::new(),
            force_stopped: Vec::new(),
            subscriptions: HashMap::new(),
            next_handle: 1,
            messages: Vec::new(),
            rejected: HashSet::new(),
        }
    }
}

impl State {
    fn check(&self, service: &'static str, operation: &'static str) -> Result<(), ProbeError> {
        if self.rejected.contains(operation) {
            return Err(ProbeError::rejected(service, format!("{operation} rejected")));
        }
        Ok(())
    }
}

/// A platform whose state lives in memory.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use syscom_lib::platform::{InMemoryPlatform, PowerService};
/// use syscom_lib::types::BatteryLevel;
///
/// let platform = Arc::new(InMemoryPlatform::new());
/// platform.set_battery(BatteryLevel::new(42).unwrap(), true);
///
/// assert_eq!(platform.battery_percent().unwrap().value(), 42);
/// assert!(platform.is_charging().unwrap());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryPlatform {
    state: Mutex<State>,
}

impl InMemoryPlatform {
    /// Creates a platform with a full battery, adapter on and no networks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the named operation fail with `ProbeError::Rejected`.
    ///
    /// Operation names are the trait method names, e.g. `"start_discovery"`,
    /// `"bond"`, `"subscribe"`, `"set_volume"`.
    pub fn reject(&self, operation: &'static str) {
        self.state.lock().rejected.insert(operation);
    }

    /// Clears a rejection set with [`reject`](Self::reject).
    pub fn allow(&self, operation: &'static str) {
        self.state.lock().rejected.remove(operation);
    }

    // =========================================================================
    // State setters
    // =========================================================================

    /// Sets the battery state.
    pub fn set_battery(&self, percent: BatteryLevel, charging: bool) {
        self.state.lock().battery = BatteryReading::new(percent, charging);
    }

    /// Sets the current volume without validation, as a hardware key would.
    pub fn set_current_volume(&self, volume: u8) {
        self.state.lock().volume = volume;
    }

    /// Sets the maximum volume.
    pub fn set_max_volume(&self, max: u8) {
        self.state.lock().max_volume = max;
    }

    /// Replaces the known networks.
    pub fn set_networks(&self, networks: Vec<NetworkInfo>) {
        self.state.lock().networks = networks;
    }

    /// Replaces the wifi scan results.
    pub fn set_scan_results(&self, results: Vec<ScanEntry>) {
        self.state.lock().scan_results = results;
    }

    /// Sets the network the device is associated with.
    pub fn set_connection(&self, connection: Option<ScanEntry>) {
        self.state.lock().connection = connection;
    }

    /// Sets the Bluetooth adapter state.
    pub fn set_adapter_state(&self, adapter: AdapterState) {
        self.state.lock().adapter = adapter;
    }

    /// Replaces the bonded devices.
    pub fn set_bonded_devices(&self, devices: Vec<PeerDevice>) {
        self.state.lock().bonded = devices;
    }

    /// Sets the capacity of a partition.
    pub fn set_storage(&self, partition: Partition, stats: StorageStats) {
        self.state.lock().storage.insert(partition, stats);
    }

    /// Sets the total RAM.
    pub fn set_total_memory(&self, bytes: u64) {
        self.state.lock().total_memory = bytes;
    }

    /// Replaces the build identification.
    pub fn set_build_info(&self, info: BuildInfo) {
        self.state.lock().build_info = info;
    }

    /// Marks a package as installed.
    pub fn install_package(&self, package: impl Into<String>) {
        self.state.lock().installed.insert(package.into());
    }

    /// Removes an installed package.
    pub fn remove_package(&self, package: &str) {
        self.state.lock().installed.remove(package);
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Returns the handles of live subscriptions for a source kind.
    #[must_use]
    pub fn subscriptions_for(&self, kind: SourceKind) -> Vec<SubscriptionHandle> {
        let mut handles: Vec<_> = self
            .state
            .lock()
            .subscriptions
            .iter()
            .filter(|(_, filter)| filter.kind == kind)
            .map(|(handle, _)| *handle)
            .collect();
        handles.sort_by_key(SubscriptionHandle::value);
        handles
    }

    /// Returns the total number of live subscriptions.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.state.lock().subscriptions.len()
    }

    /// Returns all messages received by the sink.
    #[must_use]
    pub fn messages(&self) -> Vec<SinkMessage> {
        self.state.lock().messages.clone()
    }

    /// Returns true while a discovery scan is running.
    #[must_use]
    pub fn is_discovering(&self) -> bool {
        self.state.lock().discovering
    }

    /// Returns the addresses passed to `bond`, in order.
    #[must_use]
    pub fn bond_requests(&self) -> Vec<String> {
        self.state.lock().bond_requests.clone()
    }

    /// Returns the addresses passed to `unbond`, in order.
    #[must_use]
    pub fn unbond_requests(&self) -> Vec<String> {
        self.state.lock().unbond_requests.clone()
    }

    /// Returns the wifi connection requests, in order.
    #[must_use]
    pub fn wifi_requests(&self) -> Vec<(String, KeyManagement)> {
        self.state.lock().wifi_requests.clone()
    }

    /// Returns whether wifi is enabled.
    #[must_use]
    pub fn is_wifi_enabled(&self) -> bool {
        self.state.lock().wifi_enabled
    }

    /// Returns the packages passed to `force_stop`, in order.
    #[must_use]
    pub fn force_stopped(&self) -> Vec<String> {
        self.state.lock().force_stopped.clone()
    }
}

impl PowerService for InMemoryPlatform {
    fn battery_percent(&self) -> Result<BatteryLevel, ProbeError> {
        let state = self.state.lock();
        state.check("power", "battery_percent")?;
        Ok(state.battery.percent)
    }

    fn is_charging(&self) -> Result<bool, ProbeError> {
        let state = self.state.lock();
        state.check("power", "is_charging")?;
        Ok(state.battery.charging)
    }
}

impl AudioService for InMemoryPlatform {
    fn volume(&self) -> Result<u8, ProbeError> {
        let state = self.state.lock();
        state.check("audio", "volume")?;
        Ok(state.volume)
    }

    fn max_volume(&self) -> Result<u8, ProbeError> {
        let state = self.state.lock();
        state.check("audio", "max_volume")?;
        Ok(state.max_volume)
    }

    fn set_volume(&self, volume: Volume) -> Result<(), ProbeError> {
        let mut state = self.state.lock();
        state.check("audio", "set_volume")?;
        state.volume = volume.value().min(state.max_volume);
        Ok(())
    }

    fn is_microphone_muted(&self) -> Result<bool, ProbeError> {
        let state = self.state.lock();
        state.check("audio", "is_microphone_muted")?;
        Ok(state.microphone_muted)
    }

    fn set_microphone_mute(&self, mute: bool) -> Result<(), ProbeError> {
        let mut state = self.state.lock();
        state.check("audio", "set_microphone_mute")?;
        state.microphone_muted = mute;
        Ok(())
    }
}

impl NetworkService for InMemoryPlatform {
    fn networks(&self) -> Result<Vec<NetworkInfo>, ProbeError> {
        let state = self.state.lock();
        state.check("network", "networks")?;
        Ok(state.networks.clone())
    }

    fn scan_results(&self) -> Result<Vec<ScanEntry>, ProbeError> {
        let state = self.state.lock();
        state.check("network", "scan_results")?;
        Ok(state.scan_results.clone())
    }

    fn connection_info(&self) -> Result<Option<ScanEntry>, ProbeError> {
        let state = self.state.lock();
        state.check("network", "connection_info")?;
        Ok(state.connection.clone())
    }

    fn set_wifi_enabled(&self, enabled: bool) -> Result<(), ProbeError> {
        let mut state = self.state.lock();
        state.check("network", "set_wifi_enabled")?;
        state.wifi_enabled = enabled;
        Ok(())
    }

    fn connect(&self, ssid: &str, key: KeyManagement, _passphrase: &str) -> Result<(), ProbeError> {
        let mut state = self.state.lock();
        state.check("network", "connect")?;
        state.wifi_requests.push((ssid.to_string(), key));
        Ok(())
    }
}

impl BluetoothControl for InMemoryPlatform {
    fn adapter_state(&self) -> Result<AdapterState, ProbeError> {
        let state = self.state.lock();
        state.check("bluetooth", "adapter_state")?;
        Ok(state.adapter)
    }

    fn set_enabled(&self, enabled: bool) -> Result<(), ProbeError> {
        let mut state = self.state.lock();
        state.check("bluetooth", "set_enabled")?;
        if state.adapter == AdapterState::Absent {
            return Err(ProbeError::unavailable("bluetooth"));
        }
        state.adapter = if enabled {
            AdapterState::On
        } else {
            AdapterState::Off
        };
        Ok(())
    }

    fn name(&self) -> Result<String, ProbeError> {
        let state = self.state.lock();
        state.check("bluetooth", "name")?;
        Ok(state.adapter_name.clone())
    }

    fn set_name(&self, name: &str) -> Result<(), ProbeError> {
        let mut state = self.state.lock();
        state.check("bluetooth", "set_name")?;
        state.adapter_name = name.to_string();
        Ok(())
    }

    fn bonded_devices(&self) -> Result<Vec<PeerDevice>, ProbeError> {
        let state = self.state.lock();
        state.check("bluetooth", "bonded_devices")?;
        Ok(state.bonded.clone())
    }

    fn start_discovery(&self) -> Result<(), ProbeError> {
        let mut state = self.state.lock();
        state.check("bluetooth", "start_discovery")?;
        state.discovering = true;
        Ok(())
    }

    fn cancel_discovery(&self) -> Result<(), ProbeError> {
        let mut state = self.state.lock();
        state.check("bluetooth", "cancel_discovery")?;
        state.discovering = false;
        Ok(())
    }

    fn bond(&self, device: &PeerDevice) -> Result<(), ProbeError> {
        let mut state = self.state.lock();
        state.check("bluetooth", "bond")?;
        state.bond_requests.push(device.address.clone());
        Ok(())
    }

    fn unbond(&self, device: &PeerDevice) -> Result<(), ProbeError> {
        let mut state = self.state.lock();
        state.check("bluetooth", "unbond")?;
        state.unbond_requests.push(device.address.clone());
        Ok(())
    }
}

impl StorageService for InMemoryPlatform {
    fn stats(&self, partition: Partition) -> Result<StorageStats, ProbeError> {
        let state = self.state.lock();
        state.check("storage", "stats")?;
        state
            .storage
            .get(&partition)
            .copied()
            .ok_or(ProbeError::unavailable("storage"))
    }

    fn total_memory_bytes(&self) -> Result<u64, ProbeError> {
        let state = self.state.lock();
        state.check("storage", "total_memory_bytes")?;
        Ok(state.total_memory)
    }
}

impl TimeService for InMemoryPlatform {
    fn time_zone(&self) -> Result<String, ProbeError> {
        let state = self.state.lock();
        state.check("time", "time_zone")?;
        Ok(state.time_zone.clone())
    }

    fn set_time_zone(&self, zone: &str) -> Result<(), ProbeError> {
        let mut state = self.state.lock();
        state.check("time", "set_time_zone")?;
        state.time_zone = zone.to_string();
        Ok(())
    }
}

impl SystemInfoService for InMemoryPlatform {
    fn build_info(&self) -> Result<BuildInfo, ProbeError> {
        let state = self.state.lock();
        state.check("system", "build_info")?;
        Ok(state.build_info.clone())
    }
}

impl DisplayService for InMemoryPlatform {
    fn brightness(&self) -> Result<Brightness, ProbeError> {
        let state = self.state.lock();
        state.check("display", "brightness")?;
        Ok(state.brightness)
    }

    fn set_brightness(&self, brightness: Brightness) -> Result<(), ProbeError> {
        let mut state = self.state.lock();
        state.check("display", "set_brightness")?;
        state.brightness = brightness;
        Ok(())
    }
}

impl PackageService for InMemoryPlatform {
    fn is_installed(&self, package: &str) -> Result<bool, ProbeError> {
        let state = self.state.lock();
        state.check("packages", "is_installed")?;
        Ok(state.installed.contains(package))
    }
}

impl ProcessControl for InMemoryPlatform {
    fn force_stop(&self, package: &str) -> Result<(), ProbeError> {
        let mut state = self.state.lock();
        state.check("processes", "force_stop")?;
        state.force_stopped.push(package.to_string());
        Ok(())
    }
}

impl SubscriptionHost for InMemoryPlatform {
    fn subscribe(&self, filter: &SubscriptionFilter) -> Result<SubscriptionHandle, ProbeError> {
        let mut state = self.state.lock();
        state.check("subscriptions", "subscribe")?;
        let handle = SubscriptionHandle::new(state.next_handle);
        state.next_handle += 1;
        state.subscriptions.insert(handle, filter.clone());
        Ok(handle)
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        self.state.lock().subscriptions.remove(&handle);
    }
}

impl EventSink for InMemoryPlatform {
    fn send_message(&self, target: &str, method: &str, payload: &str) {
        self.state.lock().messages.push(SinkMessage {
            target: target.to_string(),
            method: method.to_string(),
            payload: payload.to_string(),
        });
    }
}
