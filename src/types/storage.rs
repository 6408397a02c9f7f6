// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Storage partitions and size conversion.

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// A storage partition the platform can report on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    /// Application data partition.
    Internal,
    /// Shared/external storage (SD card or emulated).
    External,
    /// Read-only system partition.
    System,
}

/// Free and total capacity of a partition, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StorageStats {
    /// Bytes available to applications.
    pub free_bytes: u64,
    /// Partition capacity.
    pub total_bytes: u64,
}

impl StorageStats {
    /// Creates storage stats.
    #[must_use]
    pub const fn new(free_bytes: u64, total_bytes: u64) -> Self {
        Self {
            free_bytes,
            total_bytes,
        }
    }
}

/// Converts a byte count to GiB.
///
/// ```
/// use syscom_lib::types::bytes_to_gib;
///
/// assert!((bytes_to_gib(3 * 1024 * 1024 * 1024) - 3.0).abs() < f64::EPSILON);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn bytes_to_gib(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GIB
}
