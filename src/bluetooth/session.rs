// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bond and unbond request sessions.

use std::fmt;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::event::RequestId;
use crate::types::{BondState, PeerDevice};

/// Progress of a bond or unbond request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondPhase {
    /// Bond requested, waiting for the platform to report `Bonded`.
    AwaitingBond,
    /// Unbond requested, waiting for the platform to report `Unbonded`.
    AwaitingUnbond,
    /// The device is bonded.
    Bonded,
    /// The device is no longer bonded.
    Unbonded,
    /// The request was abandoned, refused or timed out.
    Failed,
}

impl BondPhase {
    /// Returns true for phases that end the request.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Bonded | Self::Unbonded | Self::Failed)
    }
}

impl fmt::Display for BondPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::AwaitingBond => "awaiting bond",
            Self::AwaitingUnbond => "awaiting unbond",
            Self::Bonded => "bonded",
            Self::Unbonded => "unbonded",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Which terminal state a session waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BondTarget {
    Bond,
    Unbond,
}

impl BondTarget {
    pub(crate) fn initial_phase(self) -> BondPhase {
        match self {
            Self::Bond => BondPhase::AwaitingBond,
            Self::Unbond => BondPhase::AwaitingUnbond,
        }
    }
}

/// Outcome of feeding a bond state into a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Keep waiting.
    Pending,
    /// The session ended in the given phase.
    Finished(BondPhase),
}

/// State of one outstanding bond or unbond request.
pub(crate) struct BondSession {
    pub(crate) id: RequestId,
    pub(crate) device: PeerDevice,
    pub(crate) name: String,
    pub(crate) target: BondTarget,
    last_observed: Option<BondState>,
    phase: watch::Sender<BondPhase>,
    pub(crate) timeout: Option<JoinHandle<()>>,
}

impl BondSession {
    pub(crate) fn new(
        device: PeerDevice,
        name: String,
        target: BondTarget,
    ) -> (Self, watch::Receiver<BondPhase>) {
        let (phase, rx) = watch::channel(target.initial_phase());
        let session = Self {
            id: RequestId::new(),
            device,
            name,
            target,
            last_observed: None,
            phase,
            timeout: None,
        };
        (session, rx)
    }

    /// Applies a reported bond state.
    ///
    /// Awaiting a bond, `Unbonded` only fails the request once `Bonding` has
    /// been seen; before that it is the device's state prior to the request.
    pub(crate) fn observe(&mut self, state: BondState) -> Step {
        let previous = self.last_observed.replace(state);
        match (self.target, state) {
            (BondTarget::Bond, BondState::Bonded) => Step::Finished(BondPhase::Bonded),
            (BondTarget::Bond, BondState::Unbonded) if previous == Some(BondState::Bonding) => {
                Step::Finished(BondPhase::Failed)
            }
            (BondTarget::Unbond, BondState::Unbonded) => Step::Finished(BondPhase::Unbonded),
            _ => Step::Pending,
        }
    }

    /// Publishes the final phase and cancels the timeout.
    pub(crate) fn finish(mut self, phase: BondPhase) {
        if let Some(timeout) = self.timeout.take() {
            timeout.abort();
        }
        self.phase.send_replace(phase);
    }
}

impl fmt::Debug for BondSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BondSession")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("target", &self.target)
            .field("last_observed", &self.last_observed)
            .finish_non_exhaustive()
    }
}

/// Handle on an outstanding bond or unbond request.
///
/// Dropping the ticket does not cancel the request.
#[derive(Debug, Clone)]
pub struct BondTicket {
    id: RequestId,
    device_name: String,
    phase: watch::Receiver<BondPhase>,
}

impl BondTicket {
    pub(crate) fn new(
        id: RequestId,
        device_name: String,
        phase: watch::Receiver<BondPhase>,
    ) -> Self {
        Self {
            id,
            device_name,
            phase,
        }
    }

    /// Returns the request identifier.
    #[must_use]
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Returns the target device name.
    #[must_use]
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> BondPhase {
        *self.phase.borrow()
    }

    /// Waits until the request reaches a terminal phase and returns it.
    pub async fn wait(&mut self) -> BondPhase {
        match self.phase.wait_for(BondPhase::is_terminal).await {
            Ok(phase) => *phase,
            // Session dropped without a terminal phase
            Err(_) => BondPhase::Failed,
        }
    }
}
