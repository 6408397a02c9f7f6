// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capability probes.
//!
//! [`SystemProbes`] is the synchronous query and control surface the engine
//! calls into: battery, audio, network, wifi, Bluetooth adapter, storage,
//! build identification, screen brightness, packages and time zone. Every
//! probe goes straight to the platform service; nothing is cached. A
//! missing service fails with [`ProbeError::Unavailable`] rather
//! than returning a default value.

use crate::error::{Error, ProbeError, ValueError};
use crate::platform::PlatformServices;
use crate::types::{
    AdapterState, BatteryLevel, BluetoothDeviceRecord, Brightness, BuildInfo, KeyManagement,
    NetworkSummary, Partition, PeerDevice, TimeZoneTable, Volume, WifiConnectOutcome,
    WifiObservation, bytes_to_gib,
};

/// Synchronous queries and controls over the platform services.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use syscom_lib::platform::{InMemoryPlatform, PlatformServices};
/// use syscom_lib::probe::SystemProbes;
///
/// let platform = Arc::new(InMemoryPlatform::new());
/// let probes = SystemProbes::new(PlatformServices::from_platform(&platform));
///
/// probes.set_audio_volume(7).unwrap();
/// assert_eq!(probes.audio_volume().unwrap(), 7);
///
/// // Out of range values leave the volume untouched
/// assert!(probes.set_audio_volume(16).is_err());
/// assert_eq!(probes.audio_volume().unwrap(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct SystemProbes {
    services: PlatformServices,
    time_zones: TimeZoneTable,
}

impl SystemProbes {
    /// Creates probes over the given services.
    #[must_use]
    pub fn new(services: PlatformServices) -> Self {
        Self {
            services,
            time_zones: TimeZoneTable::standard(),
        }
    }

    /// Returns the library version.
    #[must_use]
    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    // =========================================================================
    // Battery
    // =========================================================================

    /// Returns the battery charge percentage.
    ///
    /// # Errors
    ///
    /// Returns an error if the power service is missing or fails.
    pub fn battery_percent(&self) -> Result<BatteryLevel, Error> {
        Ok(self.services.power()?.battery_percent()?)
    }

    /// Returns whether the battery is charging.
    ///
    /// # Errors
    ///
    /// Returns an error if the power service is missing or fails.
    pub fn is_charging(&self) -> Result<bool, Error> {
        Ok(self.services.power()?.is_charging()?)
    }

    // =========================================================================
    // Audio
    // =========================================================================

    /// Returns the media volume step.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio service is missing or fails.
    pub fn audio_volume(&self) -> Result<u8, Error> {
        Ok(self.services.audio()?.volume()?)
    }

    /// Returns the maximum media volume step.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio service is missing or fails.
    pub fn max_audio_volume(&self) -> Result<u8, Error> {
        Ok(self.services.audio()?.max_volume()?)
    }

    /// Sets the media volume.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `value` is outside `[0, max]`, in
    /// which case the volume is not changed, or an error from the audio
    /// service.
    pub fn set_audio_volume(&self, value: i32) -> Result<(), Error> {
        let audio = self.services.audio()?;
        let volume = Volume::new(value, audio.max_volume()?)?;
        audio.set_volume(volume)?;
        tracing::debug!(volume = volume.value(), "Audio volume set");
        Ok(())
    }

    /// Returns whether the microphone is muted.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio service is missing or fails.
    pub fn is_microphone_muted(&self) -> Result<bool, Error> {
        Ok(self.services.audio()?.is_microphone_muted()?)
    }

    /// Mutes or unmutes the microphone.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio service is missing or fails.
    pub fn set_microphone_mute(&self, mute: bool) -> Result<(), Error> {
        Ok(self.services.audio()?.set_microphone_mute(mute)?)
    }

    // =========================================================================
    // Network and wifi
    // =========================================================================

    /// Returns which transports are present.
    ///
    /// # Errors
    ///
    /// Returns an error if the network service is missing or fails.
    pub fn network_summary(&self) -> Result<NetworkSummary, Error> {
        let networks = self.services.network()?.networks()?;
        Ok(NetworkSummary::from_networks(&networks))
    }

    /// Returns the SSIDs of the latest wifi scan.
    ///
    /// # Errors
    ///
    /// Returns an error if the network service is missing or fails.
    pub fn wifi_ssids(&self) -> Result<Vec<String>, Error> {
        Ok(self
            .wifi_observations()?
            .into_iter()
            .map(|observation| observation.ssid)
            .collect())
    }

    /// Returns the networks of the latest wifi scan.
    ///
    /// # Errors
    ///
    /// Returns an error if the network service is missing or fails.
    pub fn wifi_observations(&self) -> Result<Vec<WifiObservation>, Error> {
        let results = self.services.network()?.scan_results()?;
        Ok(results.iter().filter_map(WifiObservation::from_scan).collect())
    }

    /// Returns the network the device is associated with, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the network service is missing or fails.
    pub fn current_wifi(&self) -> Result<Option<WifiObservation>, Error> {
        let connection = self.services.network()?.connection_info()?;
        Ok(connection.as_ref().and_then(WifiObservation::from_scan))
    }

    /// Returns the SSID of the network the device is associated with.
    ///
    /// # Errors
    ///
    /// Returns an error if the network service is missing or fails.
    pub fn current_ssid(&self) -> Result<Option<String>, Error> {
        Ok(self.current_wifi()?.map(|observation| observation.ssid))
    }

    /// Enables or disables wifi.
    ///
    /// # Errors
    ///
    /// Returns an error if the network service is missing or refuses.
    pub fn enable_wifi(&self, enabled: bool) -> Result<(), Error> {
        Ok(self.services.network()?.set_wifi_enabled(enabled)?)
    }

    /// Asks the platform to join a wifi network.
    ///
    /// The network must appear in the latest scan results. Its key
    /// management is derived from the scan entry's capabilities.
    ///
    /// # Errors
    ///
    /// Returns an error if the network service is missing or refuses the
    /// connection request.
    pub fn request_wifi_connection(
        &self,
        ssid: &str,
        passphrase: &str,
    ) -> Result<WifiConnectOutcome, Error> {
        let network = self.services.network()?;

        let results = network.scan_results()?;
        let Some(entry) = results.iter().find(|e| e.ssid.as_deref() == Some(ssid)) else {
            tracing::debug!(%ssid, "SSID not in scan results");
            return Ok(WifiConnectOutcome::SsidNotFound);
        };

        let connected = network.connection_info()?;
        if connected.and_then(|c| c.ssid).as_deref() == Some(ssid) {
            return Ok(WifiConnectOutcome::AlreadyConnected);
        }

        if entry.capabilities.is_empty() {
            tracing::debug!(%ssid, "Security type unknown");
            return Ok(WifiConnectOutcome::SecurityUnknown);
        }

        let key = KeyManagement::from_capabilities(&entry.capabilities);
        network.connect(ssid, key, passphrase)?;
        tracing::debug!(%ssid, ?key, "Wifi connection requested");
        Ok(WifiConnectOutcome::Requested)
    }

    // =========================================================================
    // Bluetooth adapter
    // =========================================================================

    /// Returns the Bluetooth adapter state.
    ///
    /// A device without Bluetooth support reports [`AdapterState::Absent`].
    ///
    /// # Errors
    ///
    /// Returns an error if the adapter cannot be queried.
    pub fn bluetooth_adapter_state(&self) -> Result<AdapterState, Error> {
        match self.services.bluetooth() {
            Ok(control) => Ok(control.adapter_state()?),
            Err(ProbeError::Unavailable { .. }) => Ok(AdapterState::Absent),
            Err(e) => Err(e.into()),
        }
    }

    /// Enables or disables the adapter. Does nothing if it is already in the
    /// requested state.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no adapter or the platform refuses.
    pub fn enable_bluetooth(&self, enabled: bool) -> Result<(), Error> {
        let control = self.services.bluetooth()?;
        match control.adapter_state()? {
            AdapterState::Absent => Err(ProbeError::unavailable("bluetooth").into()),
            state if state.is_on() == enabled => Ok(()),
            _ => Ok(control.set_enabled(enabled)?),
        }
    }

    /// Returns the adapter's advertised name.
    ///
    /// # Errors
    ///
    /// Returns an error if the adapter cannot be queried.
    pub fn device_name(&self) -> Result<String, Error> {
        Ok(self.services.bluetooth()?.name()?)
    }

    /// Sets the adapter's advertised name.
    ///
    /// The name is only applied while the adapter is on; otherwise the call
    /// does nothing.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::Empty` for an empty name, or an error if the
    /// adapter cannot be queried or refuses the change.
    pub fn set_device_name(&self, name: &str) -> Result<(), Error> {
        if name.is_empty() {
            return Err(ValueError::Empty("device name").into());
        }
        let control = self.services.bluetooth()?;
        if !control.adapter_state()?.is_on() {
            tracing::info!(%name, "Bluetooth adapter is off, device name not changed");
            return Ok(());
        }
        control.set_name(name)?;
        Ok(())
    }

    /// Returns the named devices bonded with the adapter.
    ///
    /// # Errors
    ///
    /// Returns an error if the adapter cannot be queried.
    pub fn bonded_devices(&self) -> Result<Vec<BluetoothDeviceRecord>, Error> {
        let devices = self.services.bluetooth()?.bonded_devices()?;
        Ok(devices.iter().filter_map(PeerDevice::record).collect())
    }

    // =========================================================================
    // Storage and memory
    // =========================================================================

    /// Returns the free space of a partition in GiB.
    ///
    /// # Errors
    ///
    /// Returns an error if the partition cannot be inspected.
    pub fn free_storage(&self, partition: Partition) -> Result<f64, Error> {
        Ok(bytes_to_gib(self.free_storage_bytes(partition)?))
    }

    /// Returns the capacity of a partition in GiB.
    ///
    /// # Errors
    ///
    /// Returns an error if the partition cannot be inspected.
    pub fn total_storage(&self, partition: Partition) -> Result<f64, Error> {
        let stats = self.services.storage()?.stats(partition)?;
        Ok(bytes_to_gib(stats.total_bytes))
    }

    /// Returns the free space of a partition in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the partition cannot be inspected.
    pub fn free_storage_bytes(&self, partition: Partition) -> Result<u64, Error> {
        Ok(self.services.storage()?.stats(partition)?.free_bytes)
    }

    /// Returns the total RAM in GiB.
    ///
    /// # Errors
    ///
    /// Returns an error if memory information is unavailable.
    pub fn total_memory_gib(&self) -> Result<f64, Error> {
        Ok(bytes_to_gib(self.services.storage()?.total_memory_bytes()?))
    }

    // =========================================================================
    // System and display
    // =========================================================================

    /// Returns the build identification of the system image.
    ///
    /// # Errors
    ///
    /// Returns an error if the system service is missing or fails.
    pub fn build_info(&self) -> Result<BuildInfo, Error> {
        Ok(self.services.system()?.build_info()?)
    }

    /// Returns `model$display$sdk$incremental`.
    ///
    /// # Errors
    ///
    /// Returns an error if the system service is missing or fails.
    pub fn device_and_system_info(&self) -> Result<String, Error> {
        Ok(self.build_info()?.summary())
    }

    /// Returns the system version taken from the build fingerprint, or
    /// `None` if the fingerprint has no version segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the system service is missing or fails.
    pub fn system_version(&self) -> Result<Option<String>, Error> {
        let info = self.build_info()?;
        let version = info.system_version().map(str::to_string);
        if version.is_none() {
            tracing::warn!(fingerprint = %info.fingerprint, "No version in build fingerprint");
        }
        Ok(version)
    }

    /// Returns the screen brightness setting.
    ///
    /// # Errors
    ///
    /// Returns an error if the display service is missing or fails.
    pub fn brightness(&self) -> Result<Brightness, Error> {
        Ok(self.services.display()?.brightness()?)
    }

    /// Sets the screen brightness, clamping `value` into `[0, 2048]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the display service is missing or refuses the
    /// write.
    pub fn set_brightness(&self, value: i32) -> Result<Brightness, Error> {
        let brightness = Brightness::clamped(value);
        self.services.display()?.set_brightness(brightness)?;
        tracing::debug!(requested = value, %brightness, "Brightness set");
        Ok(brightness)
    }

    // =========================================================================
    // Packages
    // =========================================================================

    /// Returns true if `package` is installed.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::Empty` for an empty name, or an error if the
    /// package service is missing or fails.
    pub fn is_package_installed(&self, package: &str) -> Result<bool, Error> {
        if package.is_empty() {
            return Err(ValueError::Empty("package name").into());
        }
        Ok(self.services.packages()?.is_installed(package)?)
    }

    /// Force-stops another application by package name.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::Empty` for an empty name, or an error if the
    /// process control is missing or refuses.
    pub fn force_stop_package(&self, package: &str) -> Result<(), Error> {
        if package.is_empty() {
            return Err(ValueError::Empty("package name").into());
        }
        self.services.processes()?.force_stop(package)?;
        tracing::info!(%package, "Package force-stopped");
        Ok(())
    }

    // =========================================================================
    // Time zone
    // =========================================================================

    /// Returns the selectable time zone labels in display order.
    #[must_use]
    pub fn time_zone_labels(&self) -> Vec<&'static str> {
        self.time_zones.labels()
    }

    /// Sets the system time zone from one of [`time_zone_labels`](Self::time_zone_labels).
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownTimeZone` for labels outside the table,
    /// without calling the platform, or an error if the platform refuses.
    pub fn set_time_zone(&self, label: &str) -> Result<(), Error> {
        let zone = self.time_zones.canonical(label)?;
        self.services.time()?.set_time_zone(zone)?;
        tracing::debug!(%zone, "Time zone set");
        Ok(())
    }

    /// Returns the canonical identifier of the current time zone.
    ///
    /// # Errors
    ///
    /// Returns an error if the time service is missing or fails.
    pub fn current_time_zone(&self) -> Result<String, Error> {
        Ok(self.services.time()?.time_zone()?)
    }

    /// Returns the display label of a canonical zone identifier, falling
    /// back to the London label for zones outside the table.
    #[must_use]
    pub fn readable_time_zone(&self, canonical: &str) -> &'static str {
        self.time_zones.label_for(canonical)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::platform::InMemoryPlatform;
    use crate::types::{NetworkInfo, NetworkKind, ScanEntry, StorageStats};

    const GIB: u64 = 1024 * 1024 * 1024;

    fn probes() -> (Arc<InMemoryPlatform>, SystemProbes) {
        let platform = Arc::new(InMemoryPlatform::new());
        let probes = SystemProbes::new(PlatformServices::from_platform(&platform));
        (platform, probes)
    }

    #[test]
    fn version_is_crate_version() {
        assert_eq!(SystemProbes::version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn battery() {
        let (platform, probes) = probes();
        platform.set_battery(BatteryLevel::new(33).unwrap(), true);

        assert_eq!(probes.battery_percent().unwrap().value(), 33);
        assert!(probes.is_charging().unwrap());
    }

    #[test]
    fn missing_service_is_unavailable() {
        let probes = SystemProbes::new(PlatformServices::default());

        assert!(matches!(
            probes.battery_percent(),
            Err(Error::Probe(ProbeError::Unavailable { service: "power" }))
        ));
        assert!(matches!(
            probes.audio_volume(),
            Err(Error::Probe(ProbeError::Unavailable { service: "audio" }))
        ));
        assert_eq!(probes.bluetooth_adapter_state().unwrap(), AdapterState::Absent);
    }

    #[test]
    fn volume_out_of_range_is_rejected() {
        let (platform, probes) = probes();
        platform.set_current_volume(5);

        for value in [-1, 16] {
            assert!(matches!(
                probes.set_audio_volume(value),
                Err(Error::Value(ValueError::OutOfRange { min: 0, max: 15, .. }))
            ));
            assert_eq!(probes.audio_volume().unwrap(), 5);
        }

        probes.set_audio_volume(15).unwrap();
        assert_eq!(probes.audio_volume().unwrap(), 15);
        probes.set_audio_volume(0).unwrap();
        assert_eq!(probes.audio_volume().unwrap(), 0);
    }

    #[test]
    fn microphone() {
        let (_platform, probes) = probes();
        probes.set_microphone_mute(true).unwrap();
        assert!(probes.is_microphone_muted().unwrap());
    }

    #[test]
    fn network_summary_code() {
        let (platform, probes) = probes();
        platform.set_networks(vec![
            NetworkInfo {
                kind: NetworkKind::Wifi,
                connected: true,
            },
            NetworkInfo {
                kind: NetworkKind::Mobile,
                connected: false,
            },
        ]);

        let summary = probes.network_summary().unwrap();
        assert!(summary.wifi);
        assert!(summary.mobile);
        assert_eq!(summary.code(), 3);
    }

    #[test]
    fn wifi_scan_observations() {
        let (platform, probes) = probes();
        platform.set_scan_results(vec![
            ScanEntry::new("Home", -50, "[WPA2-PSK-CCMP][ESS]"),
            ScanEntry {
                ssid: None,
                rssi: -60,
                capabilities: String::new(),
            },
            ScanEntry::new("Cafe", -95, "[ESS]"),
        ]);

        assert_eq!(probes.wifi_ssids().unwrap(), vec!["Home", "Cafe"]);

        let observations = probes.wifi_observations().unwrap();
        assert_eq!(observations[0].signal_level.value(), 4);
        assert_eq!(observations[0].security.code(), 1);
        assert_eq!(observations[1].signal_level.value(), 0);
        assert_eq!(observations[1].security.code(), 0);
    }

    #[test]
    fn current_wifi() {
        let (platform, probes) = probes();
        assert_eq!(probes.current_ssid().unwrap(), None);

        platform.set_connection(Some(ScanEntry::new("Home", -70, "[WPA2-PSK-CCMP]")));
        assert_eq!(probes.current_ssid().unwrap().as_deref(), Some("Home"));
        assert_eq!(probes.current_wifi().unwrap().unwrap().signal_level.value(), 2);
    }

    #[test]
    fn wifi_connection_outcomes() {
        let (platform, probes) = probes();
        platform.set_scan_results(vec![
            ScanEntry::new("Home", -50, "[WPA2-PSK-CCMP][ESS]"),
            ScanEntry::new("Legacy", -50, "[WEP]"),
            ScanEntry::new("Hidden", -50, ""),
        ]);
        platform.set_connection(Some(ScanEntry::new("Home", -50, "[WPA2-PSK-CCMP][ESS]")));

        let outcome = |ssid| probes.request_wifi_connection(ssid, "secret").unwrap();

        assert_eq!(outcome("Missing"), WifiConnectOutcome::SsidNotFound);
        assert_eq!(outcome("Home"), WifiConnectOutcome::AlreadyConnected);
        assert_eq!(outcome("Hidden"), WifiConnectOutcome::SecurityUnknown);
        assert_eq!(outcome("Legacy"), WifiConnectOutcome::Requested);
        assert_eq!(outcome("Missing").code(), 500);

        assert_eq!(
            platform.wifi_requests(),
            vec![("Legacy".to_string(), KeyManagement::Wep)]
        );
    }

    #[test]
    fn enable_wifi() {
        let (platform, probes) = probes();
        probes.enable_wifi(false).unwrap();
        assert!(!platform.is_wifi_enabled());
    }

    #[test]
    fn enable_bluetooth_skips_same_state() {
        let (platform, probes) = probes();
        platform.reject("set_enabled");

        // Already on; the rejected call is never made
        probes.enable_bluetooth(true).unwrap();
        assert!(probes.enable_bluetooth(false).is_err());

        platform.allow("set_enabled");
        probes.enable_bluetooth(false).unwrap();
        assert_eq!(probes.bluetooth_adapter_state().unwrap(), AdapterState::Off);
    }

    #[test]
    fn enable_bluetooth_without_adapter() {
        let (platform, probes) = probes();
        platform.set_adapter_state(AdapterState::Absent);
        assert!(probes.enable_bluetooth(true).is_err());
        assert_eq!(probes.bluetooth_adapter_state().unwrap().code(), -1);
    }

    #[test]
    fn device_name_rules() {
        let (platform, probes) = probes();

        assert!(matches!(
            probes.set_device_name(""),
            Err(Error::Value(ValueError::Empty(_)))
        ));

        probes.set_device_name("Arcade").unwrap();
        assert_eq!(probes.device_name().unwrap(), "Arcade");

        platform.set_adapter_state(AdapterState::Off);
        probes.set_device_name("Ignored").unwrap();
        assert_eq!(probes.device_name().unwrap(), "Arcade");
    }

    #[test]
    fn bonded_devices_skip_unnamed() {
        let (platform, probes) = probes();
        let mut unnamed = PeerDevice::new("CC", "", 0);
        unnamed.name = None;
        platform.set_bonded_devices(vec![PeerDevice::new("AA", "Phone", 0x0200), unnamed]);

        let devices = probes.bonded_devices().unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].name, "Phone");
        assert_eq!(devices[0].device_type.code(), 1);
    }

    #[test]
    fn storage_in_gib() {
        let (platform, probes) = probes();
        platform.set_storage(Partition::Internal, StorageStats::new(2 * GIB, 8 * GIB));
        platform.set_total_memory(4 * GIB);

        assert!((probes.free_storage(Partition::Internal).unwrap() - 2.0).abs() < f64::EPSILON);
        assert!((probes.total_storage(Partition::Internal).unwrap() - 8.0).abs() < f64::EPSILON);
        assert_eq!(probes.free_storage_bytes(Partition::Internal).unwrap(), 2 * GIB);
        assert!((probes.total_memory_gib().unwrap() - 4.0).abs() < f64::EPSILON);
        assert!(probes.free_storage(Partition::External).is_err());
    }

    #[test]
    fn build_identification() {
        let (platform, probes) = probes();
        platform.set_build_info(BuildInfo {
            model: "Lynx-R1".to_string(),
            display: "kona-user".to_string(),
            sdk_level: 31,
            incremental: "eng.20230509".to_string(),
            fingerprint: "Lynx-R/kona/kona:12/v1.1.2/eng.20230509:userdebug/test-keys"
                .to_string(),
        });

        assert_eq!(
            probes.device_and_system_info().unwrap(),
            "Lynx-R1$kona-user$31$eng.20230509"
        );
        assert_eq!(probes.system_version().unwrap().as_deref(), Some("v1.1.2"));
    }

    #[test]
    fn system_version_missing_segment() {
        let (platform, probes) = probes();
        let mut info = probes.build_info().unwrap();
        info.fingerprint = "unknown".to_string();
        platform.set_build_info(info);

        assert_eq!(probes.system_version().unwrap(), None);
    }

    #[test]
    fn brightness_is_clamped() {
        let (_platform, probes) = probes();

        assert_eq!(probes.set_brightness(300).unwrap().value(), 300);
        assert_eq!(probes.brightness().unwrap().value(), 300);

        probes.set_brightness(-20).unwrap();
        assert_eq!(probes.brightness().unwrap(), Brightness::MIN);
        probes.set_brightness(4096).unwrap();
        assert_eq!(probes.brightness().unwrap(), Brightness::MAX);
    }

    #[test]
    fn brightness_write_refused() {
        let (platform, probes) = probes();
        probes.set_brightness(100).unwrap();
        platform.reject("set_brightness");

        assert!(matches!(
            probes.set_brightness(500),
            Err(Error::Probe(ProbeError::Rejected { service: "display", .. }))
        ));
        assert_eq!(probes.brightness().unwrap().value(), 100);
    }

    #[test]
    fn package_queries() {
        let (platform, probes) = probes();
        platform.install_package("com.example.game");

        assert!(probes.is_package_installed("com.example.game").unwrap());
        assert!(!probes.is_package_installed("com.example.missing").unwrap());
        assert!(matches!(
            probes.is_package_installed(""),
            Err(Error::Value(ValueError::Empty(_)))
        ));
    }

    #[test]
    fn force_stop_package() {
        let (platform, probes) = probes();

        probes.force_stop_package("com.example.game").unwrap();
        assert_eq!(platform.force_stopped(), vec!["com.example.game"]);

        assert!(probes.force_stop_package("").is_err());
        platform.reject("force_stop");
        assert!(matches!(
            probes.force_stop_package("com.example.other"),
            Err(Error::Probe(ProbeError::Rejected { service: "processes", .. }))
        ));
        assert_eq!(platform.force_stopped().len(), 1);
    }

    #[test]
    fn missing_system_services_are_unavailable() {
        let probes = SystemProbes::new(PlatformServices::default());

        assert!(matches!(
            probes.build_info(),
            Err(Error::Probe(ProbeError::Unavailable { service: "system" }))
        ));
        assert!(matches!(
            probes.brightness(),
            Err(Error::Probe(ProbeError::Unavailable { service: "display" }))
        ));
        assert!(matches!(
            probes.is_package_installed("a"),
            Err(Error::Probe(ProbeError::Unavailable { service: "packages" }))
        ));
        assert!(matches!(
            probes.force_stop_package("a"),
            Err(Error::Probe(ProbeError::Unavailable { service: "processes" }))
        ));
    }

    #[test]
    fn time_zone_round_trip() {
        let (_platform, probes) = probes();

        assert_eq!(probes.time_zone_labels().len(), 25);
        probes.set_time_zone("08- GMT+8 Asia/Tokyo").unwrap();
        assert_eq!(probes.current_time_zone().unwrap(), "Asia/Tokyo");
        assert_eq!(probes.readable_time_zone("Asia/Tokyo"), "08- GMT+8 Asia/Tokyo");
        assert_eq!(probes.readable_time_zone("Mars/Olympus"), "00- GMT+0 Europe/London");
    }

    #[test]
    fn unknown_time_zone_label() {
        let (platform, probes) = probes();
        platform.reject("set_time_zone");

        // Rejected before reaching the platform
        assert!(matches!(
            probes.set_time_zone("Asia/Tokyo"),
            Err(Error::Value(ValueError::UnknownTimeZone(_)))
        ));
        assert_eq!(probes.current_time_zone().unwrap(), "Europe/London");
    }
}
