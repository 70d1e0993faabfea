//! Per-station accumulator and its finalized summary.

/// Running min/max/sum/count for one station.
///
/// Merging is associative and commutative for min, max and count. The sum may
/// differ in its last bits depending on merge order; the one-decimal rounding
/// in [`Station::finalize`] absorbs that.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Station {
    min: f64,
    max: f64,
    sum: f64,
    count: u64,
}

impl Default for Station {
    fn default() -> Self {
        Self::new()
    }
}

impl Station {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sum: 0.0,
            count: 0,
        }
    }

    /// Creates an accumulator holding a single reading.
    pub fn from_value(value: f64) -> Self {
        Self {
            min: value,
            max: value,
            sum: value,
            count: 1,
        }
    }

    /// Folds one reading in.
    pub fn update(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
        self.count += 1;
    }

    /// Folds another accumulator for the same station in, consuming it.
    pub fn merge(&mut self, other: Station) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.count += other.count;
    }

    /// Smallest reading seen.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest reading seen.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Sum of all readings.
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Number of readings.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Computes the summary row.
    ///
    /// The sum is rounded to one decimal *before* dividing by the count; this
    /// is not the same as rounding the mean. Min and max are left unrounded.
    pub fn finalize(&self) -> StationSummary {
        debug_assert!(self.count > 0, "finalize on an empty station");

        StationSummary {
            min: self.min,
            mean: round_tenth(self.sum) / self.count as f64,
            max: self.max,
        }
    }
}

/// Finalized `min/mean/max` for one station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationSummary {
    /// Smallest reading.
    pub min: f64,
    /// Mean, computed from the one-decimal rounded sum.
    pub mean: f64,
    /// Largest reading.
    pub max: f64,
}

/// Rounds to one decimal place as `round(x * 10) / 10`.
///
/// Ties round half away from zero, so `5.35` gives `5.4` and `-5.35` gives
/// `-5.4`. Reports built on Java's `Math.round` (half up) print `-5.3` for
/// the latter; negative ties deliberately do not match that output. A result
/// of negative zero is normalized to `0.0`.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0 + 0.0
}
