// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `SysCom` Lib - Device state events and capability probes for a game engine
//! running on Android.
//!
//! This library sits between the operating system and the engine. It turns
//! OS broadcasts into named events for an engine object, answers synchronous
//! capability queries, and sequences Bluetooth discovery and pairing.
//!
//! # Supported Features
//!
//! - **Event sources**: Battery, audio volume, network state and package
//!   install/remove notifications
//! - **Capability probes**: Battery, audio, Wi-Fi, Bluetooth adapter, storage,
//!   memory, build identification, brightness, packages and time zone
//! - **Bluetooth**: Discovery with name deduplication, pair and unpair
//!   requests with a timeout
//! - **Dispatch**: Stable event names and payload encodings for the engine
//!
//! The host platform is reached through the traits in [`platform`]. The
//! [`InMemoryPlatform`](platform::InMemoryPlatform) implementation backs the
//! examples and tests.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use syscom_lib::{BridgeConfig, SystemContext};
//! use syscom_lib::platform::{InMemoryPlatform, PlatformServices};
//!
//! # fn main() -> syscom_lib::Result<()> {
//! let platform = Arc::new(InMemoryPlatform::new());
//! let (ctx, mut pump) = SystemContext::new(
//!     PlatformServices::from_platform(&platform),
//!     BridgeConfig::new().with_sink_identity("Launcher"),
//! );
//!
//! // Subscribe to battery, volume, network and package broadcasts
//! ctx.register_all()?;
//!
//! // Synchronous queries
//! let battery = ctx.probes().battery_percent()?;
//! assert_eq!(battery.value(), 100);
//!
//! // Events are forwarded to the engine while the pump is driven
//! ctx.emit(syscom_lib::DeviceEvent::volume(7));
//! assert_eq!(pump.pump_pending(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Async Hosts
//!
//! ```no_run
//! use std::sync::Arc;
//! use syscom_lib::{BridgeConfig, SystemContext};
//! use syscom_lib::platform::{InMemoryPlatform, PlatformServices};
//!
//! #[tokio::main]
//! async fn main() -> syscom_lib::Result<()> {
//!     let platform = Arc::new(InMemoryPlatform::new());
//!     let (ctx, pump) = SystemContext::new(
//!         PlatformServices::from_platform(&platform),
//!         BridgeConfig::from_json(r#"{"sink_identity":"Launcher"}"#)?,
//!     );
//!     tokio::spawn(pump.run());
//!
//!     ctx.bluetooth().start_discovery()?;
//!     let mut ticket = ctx.bluetooth().request_pair("Headset")?;
//!     let phase = ticket.wait().await;
//!     println!("{} ended as {phase}", ticket.device_name());
//!     Ok(())
//! }
//! ```

pub mod bluetooth;
pub mod config;
mod context;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod platform;
pub mod probe;
pub mod registry;
pub mod source;
pub mod types;

pub use bluetooth::{BluetoothSequencer, BondPhase, BondTicket, DiscoveryState};
pub use config::{BatteryPayloadFormat, BridgeConfig};
pub use context::SystemContext;
pub use dispatch::{Dispatcher, EventPump, WireMessage};
pub use error::{BluetoothError, ConfigError, Error, ParseError, ProbeError, Result, ValueError};
pub use event::{DeviceEvent, Notification, RequestId};
pub use probe::SystemProbes;
pub use types::{
    AdapterState, BatteryLevel, BluetoothDeviceRecord, BondState, Brightness, BuildInfo, Partition,
    Volume, WifiConnectOutcome,
};
