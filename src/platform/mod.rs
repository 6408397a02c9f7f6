// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capability traits for the host platform.
//!
//! Everything the library needs from the operating system and from the
//! engine goes through the traits in this module. A host integration
//! implements them against the real platform APIs; [`InMemoryPlatform`]
//! implements all of them in memory for simulation and tests.
//!
//! Services are bundled into [`PlatformServices`]. Each service is
//! optional: a missing service makes the probes that need it fail with
//! [`ProbeError::Unavailable`] instead of returning a default value.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use syscom_lib::platform::{InMemoryPlatform, PlatformServices};
//!
//! let platform = Arc::new(InMemoryPlatform::new());
//!
//! // Every service backed by the same in-memory platform
//! let services = PlatformServices::from_platform(&platform);
//!
//! // Or only some of them
//! let partial = PlatformServices::builder()
//!     .power(platform.clone())
//!     .sink(platform.clone())
//!     .build();
//! assert!(partial.audio().is_err());
//! ```

mod memory;
mod subscription;

use std::sync::Arc;

pub use memory::{InMemoryPlatform, SinkMessage};
pub use subscription::{SourceKind, SubscriptionFilter, SubscriptionHandle};

use crate::error::ProbeError;
use crate::types::{
    AdapterState, BatteryLevel, Brightness, BuildInfo, KeyManagement, NetworkInfo, Partition,
    PeerDevice, ScanEntry, StorageStats, Volume,
};

/// Battery state.
pub trait PowerService: Send + Sync {
    /// Returns the current charge percentage.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform cannot report the battery.
    fn battery_percent(&self) -> Result<BatteryLevel, ProbeError>;

    /// Returns whether the battery is charging.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform cannot report the battery.
    fn is_charging(&self) -> Result<bool, ProbeError>;
}

/// Media volume and microphone control.
pub trait AudioService: Send + Sync {
    /// Returns the current media volume step.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio service cannot be queried.
    fn volume(&self) -> Result<u8, ProbeError>;

    /// Returns the maximum media volume step.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio service cannot be queried.
    fn max_volume(&self) -> Result<u8, ProbeError>;

    /// Sets the media volume.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the change.
    fn set_volume(&self, volume: Volume) -> Result<(), ProbeError>;

    /// Returns whether the microphone is muted.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio service cannot be queried.
    fn is_microphone_muted(&self) -> Result<bool, ProbeError>;

    /// Mutes or unmutes the microphone.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the change.
    fn set_microphone_mute(&self, mute: bool) -> Result<(), ProbeError>;
}

/// Network state and wifi control.
pub trait NetworkService: Send + Sync {
    /// Returns all networks known to the platform.
    ///
    /// # Errors
    ///
    /// Returns an error if connectivity cannot be queried.
    fn networks(&self) -> Result<Vec<NetworkInfo>, ProbeError>;

    /// Returns the latest wifi scan results.
    ///
    /// # Errors
    ///
    /// Returns an error if scan results cannot be read (e.g. location denied).
    fn scan_results(&self) -> Result<Vec<ScanEntry>, ProbeError>;

    /// Returns the wifi network the device is associated with, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection info cannot be read.
    fn connection_info(&self) -> Result<Option<ScanEntry>, ProbeError>;

    /// Enables or disables wifi.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the change.
    fn set_wifi_enabled(&self, enabled: bool) -> Result<(), ProbeError>;

    /// Adds the network and asks the platform to join it.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the request.
    fn connect(&self, ssid: &str, key: KeyManagement, passphrase: &str) -> Result<(), ProbeError>;
}

/// Local Bluetooth adapter control.
///
/// `bond` and `unbond` stand in for the platform-specific pairing calls;
/// the outcome arrives later as a bond state notification.
pub trait BluetoothControl: Send + Sync {
    /// Returns the adapter state.
    ///
    /// # Errors
    ///
    /// Returns an error if the adapter cannot be queried.
    fn adapter_state(&self) -> Result<AdapterState, ProbeError>;

    /// Enables or disables the adapter.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the change.
    fn set_enabled(&self, enabled: bool) -> Result<(), ProbeError>;

    /// Returns the adapter's advertised name.
    ///
    /// # Errors
    ///
    /// Returns an error if the adapter cannot be queried.
    fn name(&self) -> Result<String, ProbeError>;

    /// Sets the adapter's advertised name.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the change.
    fn set_name(&self, name: &str) -> Result<(), ProbeError>;

    /// Returns the devices currently bonded with this adapter.
    ///
    /// # Errors
    ///
    /// Returns an error if the adapter cannot be queried.
    fn bonded_devices(&self) -> Result<Vec<PeerDevice>, ProbeError>;

    /// Starts an asynchronous discovery scan.
    ///
    /// # Errors
    ///
    /// Returns an error if the scan cannot be started.
    fn start_discovery(&self) -> Result<(), ProbeError>;

    /// Cancels a running discovery scan.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the cancellation.
    fn cancel_discovery(&self) -> Result<(), ProbeError>;

    /// Requests bonding with a remote device.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be issued.
    fn bond(&self, device: &PeerDevice) -> Result<(), ProbeError>;

    /// Requests removal of the bond with a remote device.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be issued.
    fn unbond(&self, device: &PeerDevice) -> Result<(), ProbeError>;
}

/// Storage and memory capacity.
pub trait StorageService: Send + Sync {
    /// Returns free and total bytes of a partition.
    ///
    /// # Errors
    ///
    /// Returns an error if the partition cannot be inspected.
    fn stats(&self, partition: Partition) -> Result<StorageStats, ProbeError>;

    /// Returns the total RAM of the device in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if memory information is unavailable.
    fn total_memory_bytes(&self) -> Result<u64, ProbeError>;
}

/// System time zone.
pub trait TimeService: Send + Sync {
    /// Returns the canonical identifier of the current zone.
    ///
    /// # Errors
    ///
    /// Returns an error if the zone cannot be read.
    fn time_zone(&self) -> Result<String, ProbeError>;

    /// Sets the system zone by canonical identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the change.
    fn set_time_zone(&self, zone: &str) -> Result<(), ProbeError>;
}

/// Build identification of the system image.
pub trait SystemInfoService: Send + Sync {
    /// Returns the build identification.
    ///
    /// # Errors
    ///
    /// Returns an error if the build properties cannot be read.
    fn build_info(&self) -> Result<BuildInfo, ProbeError>;
}

/// Screen settings.
pub trait DisplayService: Send + Sync {
    /// Returns the screen brightness setting.
    ///
    /// # Errors
    ///
    /// Returns an error if the setting cannot be read.
    fn brightness(&self) -> Result<Brightness, ProbeError>;

    /// Writes the screen brightness setting.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the change (e.g. no
    /// permission to write system settings).
    fn set_brightness(&self, brightness: Brightness) -> Result<(), ProbeError>;
}

/// Installed package queries.
pub trait PackageService: Send + Sync {
    /// Returns true if a package with this name is installed.
    ///
    /// # Errors
    ///
    /// Returns an error if the package manager cannot be queried.
    fn is_installed(&self, package: &str) -> Result<bool, ProbeError>;
}

/// Control over other applications' processes.
pub trait ProcessControl: Send + Sync {
    /// Force-stops every process of `package`.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses (usually a missing system
    /// privilege).
    fn force_stop(&self, package: &str) -> Result<(), ProbeError>;
}

/// Registration of notification receivers with the platform.
///
/// The host delivers every notification together with the handle of the
/// receiver it was delivered to, see
/// [`SystemContext::deliver`](crate::SystemContext::deliver).
pub trait SubscriptionHost: Send + Sync {
    /// Registers a receiver.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the registration.
    fn subscribe(&self, filter: &SubscriptionFilter) -> Result<SubscriptionHandle, ProbeError>;

    /// Removes a receiver. Unknown handles are ignored.
    fn unsubscribe(&self, handle: SubscriptionHandle);
}

/// The engine-side message target.
///
/// Implementations must return promptly; the dispatcher calls this from
/// whichever thread drains the event channel.
pub trait EventSink: Send + Sync {
    /// Sends `payload` to `method` on the object named `target`.
    fn send_message(&self, target: &str, method: &str, payload: &str);
}

/// The set of platform services available to a session.
#[derive(Clone, Default)]
pub struct PlatformServices {
    power: Option<Arc<dyn PowerService>>,
    audio: Option<Arc<dyn AudioService>>,
    network: Option<Arc<dyn NetworkService>>,
    bluetooth: Option<Arc<dyn BluetoothControl>>,
    storage: Option<Arc<dyn StorageService>>,
    time: Option<Arc<dyn TimeService>>,
    system: Option<Arc<dyn SystemInfoService>>,
    display: Option<Arc<dyn DisplayService>>,
    packages: Option<Arc<dyn PackageService>>,
    processes: Option<Arc<dyn ProcessControl>>,
    subscriptions: Option<Arc<dyn SubscriptionHost>>,
    sink: Option<Arc<dyn EventSink>>,
}

impl PlatformServices {
    /// Creates a builder with no services.
    #[must_use]
    pub fn builder() -> PlatformServicesBuilder {
        PlatformServicesBuilder::default()
    }

    /// Uses one object for every service.
    #[must_use]
    pub fn from_platform<P>(platform: &Arc<P>) -> Self
    where
        P: PowerService
            + AudioService
            + NetworkService
            + BluetoothControl
            + StorageService
            + TimeService
            + SystemInfoService
            + DisplayService
            + PackageService
            + ProcessControl
            + SubscriptionHost
            + EventSink
            + 'static,
    {
        Self::builder()
            .power(platform.clone())
            .audio(platform.clone())
            .network(platform.clone())
            .bluetooth(platform.clone())
            .storage(platform.clone())
            .time(platform.clone())
            .system(platform.clone())
            .display(platform.clone())
            .packages(platform.clone())
            .processes(platform.clone())
            .subscriptions(platform.clone())
            .sink(platform.clone())
            .build()
    }

    /// Returns the power service.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Unavailable` if the service was not provided.
    pub fn power(&self) -> Result<&Arc<dyn PowerService>, ProbeError> {
        self.power.as_ref().ok_or(ProbeError::unavailable("power"))
    }

    /// Returns the audio service.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Unavailable` if the service was not provided.
    pub fn audio(&self) -> Result<&Arc<dyn AudioService>, ProbeError> {
        self.audio.as_ref().ok_or(ProbeError::unavailable("audio"))
    }

    /// Returns the network service.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Unavailable` if the service was not provided.
    pub fn network(&self) -> Result<&Arc<dyn NetworkService>, ProbeError> {
        self.network
            .as_ref()
            .ok_or(ProbeError::unavailable("network"))
    }

    /// Returns the Bluetooth control.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Unavailable` if the service was not provided.
    pub fn bluetooth(&self) -> Result<&Arc<dyn BluetoothControl>, ProbeError> {
        self.bluetooth
            .as_ref()
            .ok_or(ProbeError::unavailable("bluetooth"))
    }

    /// Returns the storage service.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Unavailable` if the service was not provided.
    pub fn storage(&self) -> Result<&Arc<dyn StorageService>, ProbeError> {
        self.storage
            .as_ref()
            .ok_or(ProbeError::unavailable("storage"))
    }

    /// Returns the time service.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Unavailable` if the service was not provided.
    pub fn time(&self) -> Result<&Arc<dyn TimeService>, ProbeError> {
        self.time.as_ref().ok_or(ProbeError::unavailable("time"))
    }

    /// Returns the system information service.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Unavailable` if the service was not provided.
    pub fn system(&self) -> Result<&Arc<dyn SystemInfoService>, ProbeError> {
        self.system.as_ref().ok_or(ProbeError::unavailable("system"))
    }

    /// Returns the display service.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Unavailable` if the service was not provided.
    pub fn display(&self) -> Result<&Arc<dyn DisplayService>, ProbeError> {
        self.display
            .as_ref()
            .ok_or(ProbeError::unavailable("display"))
    }

    /// Returns the package service.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Unavailable` if the service was not provided.
    pub fn packages(&self) -> Result<&Arc<dyn PackageService>, ProbeError> {
        self.packages
            .as_ref()
            .ok_or(ProbeError::unavailable("packages"))
    }

    /// Returns the process control.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Unavailable` if the service was not provided.
    pub fn processes(&self) -> Result<&Arc<dyn ProcessControl>, ProbeError> {
        self.processes
            .as_ref()
            .ok_or(ProbeError::unavailable("processes"))
    }

    /// Returns the subscription host.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Unavailable` if the service was not provided.
    pub fn subscriptions(&self) -> Result<&Arc<dyn SubscriptionHost>, ProbeError> {
        self.subscriptions
            .as_ref()
            .ok_or(ProbeError::unavailable("subscriptions"))
    }

    /// Returns the engine sink, if one was provided.
    #[must_use]
    pub fn sink(&self) -> Option<&Arc<dyn EventSink>> {
        self.sink.as_ref()
    }
}

impl std::fmt::Debug for PlatformServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformServices")
            .field("power", &self.power.is_some())
            .field("audio", &self.audio.is_some())
            .field("network", &self.network.is_some())
            .field("bluetooth", &self.bluetooth.is_some())
            .field("storage", &self.storage.is_some())
            .field("time", &self.time.is_some())
            .field("system", &self.system.is_some())
            .field("display", &self.display.is_some())
            .field("packages", &self.packages.is_some())
            .field("processes", &self.processes.is_some())
            .field("subscriptions", &self.subscriptions.is_some())
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

/// Builder for [`PlatformServices`].
#[derive(Default)]
#[must_use]
pub struct PlatformServicesBuilder {
    services: PlatformServices,
}

impl PlatformServicesBuilder {
    /// Sets the power service.
    pub fn power(mut self, service: Arc<dyn PowerService>) -> Self {
        self.services.power = Some(service);
        self
    }

    /// Sets the audio service.
    pub fn audio(mut self, service: Arc<dyn AudioService>) -> Self {
        self.services.audio = Some(service);
        self
    }

    /// Sets the network service.
    pub fn network(mut self, service: Arc<dyn NetworkService>) -> Self {
        self.services.network = Some(service);
        self
    }

    /// Sets the Bluetooth control.
    pub fn bluetooth(mut self, service: Arc<dyn BluetoothControl>) -> Self {
        self.services.bluetooth = Some(service);
        self
    }

    /// Sets the storage service.
    pub fn storage(mut self, service: Arc<dyn StorageService>) -> Self {
        self.services.storage = Some(service);
        self
    }

    /// Sets the time service.
    pub fn time(mut self, service: Arc<dyn TimeService>) -> Self {
        self.services.time = Some(service);
        self
    }

    /// Sets the system information service.
    pub fn system(mut self, service: Arc<dyn SystemInfoService>) -> Self {
        self.services.system = Some(service);
        self
    }

    /// Sets the display service.
    pub fn display(mut self, service: Arc<dyn DisplayService>) -> Self {
        self.services.display = Some(service);
        self
    }

    /// Sets the package service.
    pub fn packages(mut self, service: Arc<dyn PackageService>) -> Self {
        self.services.packages = Some(service);
        self
    }

    /// Sets the process control.
    pub fn processes(mut self, service: Arc<dyn ProcessControl>) -> Self {
        self.services.processes = Some(service);
        self
    }

    /// Sets the subscription host.
    pub fn subscriptions(mut self, service: Arc<dyn SubscriptionHost>) -> Self {
        self.services.subscriptions = Some(service);
        self
    }

    /// Sets the engine sink.
    pub fn sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.services.sink = Some(sink);
        self
    }

    /// Builds the service set.
    #[must_use]
    pub fn build(self) -> PlatformServices {
        self.services
    }
}
