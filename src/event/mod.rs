// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Events and the raw notifications they are derived from.
//!
//! Platform receivers hand [`Notification`]s to the library. Event sources
//! turn them into [`DeviceEvent`]s, which the dispatcher serializes for the
//! engine.
//!
//! # Examples
//!
//! ```
//! use syscom_lib::event::{DeviceEvent, Notification, action, extra};
//!
//! let notification = Notification::new(action::PACKAGE_ADDED)
//!     .with_data("package:com.example.game");
//! assert_eq!(notification.data(), Some("package:com.example.game"));
//!
//! let event = DeviceEvent::package_added("package:com.example.game");
//! assert!(!event.is_bluetooth());
//! ```

mod device_event;
mod notification;
mod request_id;

pub use device_event::{DeviceEvent, PackageAction};
pub use notification::{Extra, Notification, action, extra};
pub use request_id::RequestId;
