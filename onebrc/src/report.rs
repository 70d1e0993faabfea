//! Sorted, rounded rendering of the final result.

use crate::chunk::Stations;
use crate::station::{round_tenth, StationSummary};
use std::collections::BTreeMap;
use std::fmt;

/// Final per-station summaries, sorted by station name.
///
/// `Display` renders `{name=min/mean/max, ...}` with every number rounded to
/// one decimal (see [`round_tenth`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    rows: BTreeMap<String, StationSummary>,
}

impl Report {
    /// Finalizes every station of a merged map.
    pub fn from_stations(stations: Stations) -> Self {
        let rows = stations
            .into_iter()
            .map(|(name, station)| (name, station.finalize()))
            .collect();

        Self { rows }
    }

    /// Summary for `station`, if present.
    pub fn get(&self, station: &str) -> Option<&StationSummary> {
        self.rows.get(station)
    }

    /// Rows in ascending station order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StationSummary)> {
        self.rows.iter().map(|(name, row)| (name.as_str(), row))
    }

    /// Number of stations.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no station was seen.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for StationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}/{:.1}/{:.1}",
            round_tenth(self.min),
            round_tenth(self.mean),
            round_tenth(self.max)
        )
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;

        for (i, (name, row)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={row}")?;
        }

        f.write_str("}")
    }
}
