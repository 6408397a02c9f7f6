// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Human-readable time zone labels.
//!
//! The engine presents a fixed list of labels such as
//! `"01- GMT+1 Europe/Paris"`. Each label maps to one canonical zone
//! identifier understood by the platform. The numeric prefix keeps the
//! list ordered when sorted as strings.

use crate::error::ValueError;

/// Label shown when the current zone has no entry in the table.
pub const DEFAULT_LABEL: &str = "00- GMT+0 Europe/London";

/// Label to canonical identifier pairs, in label order.
const ENTRIES: &[(&str, &str)] = &[
    ("00- GMT+0 Europe/London", "Europe/London"),
    ("01- GMT+1 Europe/Paris", "Europe/Paris"),
    ("02- GMT+2 Europe/Moscow", "Europe/Moscow"),
    ("03- GMT+3 Asia/Dubai", "Asia/Dubai"),
    ("04- GMT+4 Asia/Karachi", "Asia/Karachi"),
    ("05- GMT+5 Asia/Omsk", "Asia/Omsk"),
    ("06- GMT+6 Asia/Novosibirsk", "Asia/Novosibirsk"),
    ("07- GMT+7 Asia/Hong Kong", "Asia/Hong_Kong"),
    ("08- GMT+8 Asia/Tokyo", "Asia/Tokyo"),
    ("09- GMT+9 Australia/Sydney", "Australia/Sydney"),
    ("10- GMT+10 Asia/Sakhalin", "Asia/Sakhalin"),
    ("11- GMT+11 Pacific/Auckland", "Pacific/Auckland"),
    ("12- GMT+12 Pacific/Apia", "Pacific/Apia"),
    ("13- GMT-1 Atlantic/Reykjavik", "Atlantic/Reykjavik"),
    ("14- GMT-2 Atlantic/Azores", "Atlantic/Azores"),
    ("15- GMT-3 America/Nuuk", "America/Nuuk"),
    ("16- GMT-4 Atlantic/South Georgia", "Atlantic/South_Georgia"),
    ("17- GMT-5 America/New York", "America/New_York"),
    ("18- GMT-6 America/Bogota", "America/Bogota"),
    ("19- GMT-7 America/Denver", "America/Denver"),
    ("20- GMT-8 America/Los Angeles", "America/Los_Angeles"),
    ("21- GMT-9 America/Anchorage", "America/Anchorage"),
    ("22- GMT-10 Pacific/Gambier", "Pacific/Gambier"),
    ("23- GMT-11 Pacific/Honolulu", "Pacific/Honolulu"),
    ("24- GMT-12 Pacific/Niue", "Pacific/Niue"),
];

/// The fixed label table.
///
/// # Examples
///
/// ```
/// use syscom_lib::types::TimeZoneTable;
///
/// let table = TimeZoneTable::standard();
/// assert_eq!(table.canonical("01- GMT+1 Europe/Paris").unwrap(), "Europe/Paris");
/// assert_eq!(table.label_for("Asia/Tokyo"), "08- GMT+8 Asia/Tokyo");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeZoneTable;

impl TimeZoneTable {
    /// Returns the standard table.
    #[must_use]
    pub const fn standard() -> Self {
        Self
    }

    /// Returns all labels in display order.
    #[must_use]
    pub fn labels(&self) -> Vec<&'static str> {
        ENTRIES.iter().map(|(label, _)| *label).collect()
    }

    /// Returns the canonical zone identifier for a label.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownTimeZone` if the label is not in the table.
    pub fn canonical(&self, label: &str) -> Result<&'static str, ValueError> {
        ENTRIES
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, zone)| *zone)
            .ok_or_else(|| ValueError::UnknownTimeZone(label.to_string()))
    }

    /// Returns the label for a canonical identifier, or [`DEFAULT_LABEL`].
    #[must_use]
    pub fn label_for(&self, canonical: &str) -> &'static str {
        ENTRIES
            .iter()
            .find(|(_, zone)| *zone == canonical)
            .map_or(DEFAULT_LABEL, |(label, _)| *label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_sorted_and_complete() {
        let labels = TimeZoneTable::standard().labels();
        assert_eq!(labels.len(), 25);
        let mut sorted = labels.clone();
        sorted.sort_unstable();
        assert_eq!(labels, sorted);
        assert_eq!(labels[0], DEFAULT_LABEL);
    }

    #[test]
    fn every_label_round_trips() {
        let table = TimeZoneTable::standard();
        for label in table.labels() {
            let zone = table.canonical(label).unwrap();
            assert_eq!(table.label_for(zone), label);
        }
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = TimeZoneTable::standard().canonical("GMT+13").unwrap_err();
        assert_eq!(err, ValueError::UnknownTimeZone("GMT+13".to_string()));
    }

    #[test]
    fn unknown_zone_falls_back_to_default() {
        assert_eq!(TimeZoneTable::standard().label_for("Africa/Cairo"), DEFAULT_LABEL);
    }
}
