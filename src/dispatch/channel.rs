// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event channel between sources and the dispatcher.
//!
//! Sources run on platform callback threads and must never block, so they
//! push events into an unbounded channel. The [`EventPump`] owns the
//! receiving end and forwards events to the [`Dispatcher`] in order, either
//! from an async task ([`EventPump::run`]) or synchronously from the host's
//! main loop ([`EventPump::pump_pending`]).

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::event::DeviceEvent;

use super::Dispatcher;

/// Sending half of the event channel.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<DeviceEvent>,
}

impl EventSender {
    /// Queues an event. Events sent after the pump is gone are discarded.
    pub fn send(&self, event: DeviceEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("Event pump closed, event discarded");
        }
    }
}

/// Receiving half of the event channel, bound to a dispatcher.
#[derive(Debug)]
pub struct EventPump {
    rx: mpsc::UnboundedReceiver<DeviceEvent>,
    dispatcher: Arc<Dispatcher>,
}

impl EventPump {
    /// Forwards events until every sender is dropped.
    pub async fn run(mut self) {
        while let Some(event) = self.rx.recv().await {
            self.dispatcher.emit(&event);
        }
        tracing::debug!("Event pump stopped");
    }

    /// Forwards the events queued so far and returns how many were handled.
    pub fn pump_pending(&mut self) -> usize {
        let mut count = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.dispatcher.emit(&event);
            count += 1;
        }
        count
    }

    /// Returns the dispatcher events are forwarded to.
    #[must_use]
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }
}

/// Creates a channel draining into `dispatcher`.
#[must_use]
pub fn event_channel(dispatcher: Arc<Dispatcher>) -> (EventSender, EventPump) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, EventPump { rx, dispatcher })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BridgeConfig;
    use crate::platform::InMemoryPlatform;

    fn setup() -> (Arc<InMemoryPlatform>, EventSender, EventPump) {
        let platform = Arc::new(InMemoryPlatform::new());
        let dispatcher = Arc::new(Dispatcher::new(
            Some(platform.clone()),
            BridgeConfig::new().with_sink_identity("Launcher"),
        ));
        let (tx, pump) = event_channel(dispatcher);
        (platform, tx, pump)
    }

    #[test]
    fn pump_pending_preserves_order() {
        let (platform, tx, mut pump) = setup();

        tx.send(DeviceEvent::volume(1));
        tx.send(DeviceEvent::volume(2));
        tx.send(DeviceEvent::volume(3));

        assert_eq!(pump.pump_pending(), 3);
        assert_eq!(pump.pump_pending(), 0);

        let payloads: Vec<_> = platform.messages().into_iter().map(|m| m.payload).collect();
        assert_eq!(payloads, vec!["1", "2", "3"]);
    }

    #[test]
    fn send_after_pump_dropped_is_silent() {
        let (_platform, tx, pump) = setup();
        drop(pump);
        tx.send(DeviceEvent::volume(1));
    }

    #[tokio::test]
    async fn run_stops_when_senders_dropped() {
        let (platform, tx, pump) = setup();
        let dispatcher = Arc::clone(pump.dispatcher());

        let task = tokio::spawn(pump.run());
        tx.send(DeviceEvent::package_removed("package:a"));
        drop(tx);
        task.await.unwrap();

        assert_eq!(dispatcher.delivered_count(), 1);
        assert_eq!(platform.messages()[0].method, "AndroidPackageRemoved");
    }
}
