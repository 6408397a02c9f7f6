// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event delivery to the engine.
//!
//! - [`WireMessage`] - Encoding of a [`DeviceEvent`](crate::event::DeviceEvent)
//!   into an engine method name and payload
//! - [`Dispatcher`] - Sink identity and delivery counters
//! - [`EventSender`] / [`EventPump`] - Ordered channel from sources to the
//!   dispatcher

mod channel;
mod dispatcher;
mod wire;

pub use channel::{EventPump, EventSender, event_channel};
pub use dispatcher::Dispatcher;
pub use wire::{
    AUDIO_VOLUME_CHANGE, BATTERY_LEVEL_CHANGE, BLUETOOTH_BONDED, BLUETOOTH_DEVICE_FOUND,
    BLUETOOTH_UNBONDED, NETWORK_STATE_CHANGE, PACKAGE_INSTALLED, PACKAGE_REMOVED, WireMessage,
};
