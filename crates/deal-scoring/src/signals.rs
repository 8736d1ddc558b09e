//! Per-deal risk signals.

use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Median};

/// Bounds of the sales cycle column used for min-max normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRange {
    pub min: i64,
    pub max: i64,
}

impl CycleRange {
    /// Compute bounds over a set of cycle lengths. Returns `None` when empty.
    pub fn from_days(days: &[i64]) -> Option<Self> {
        let min = *days.iter().min()?;
        let max = *days.iter().max()?;
        Some(Self { min, max })
    }

    /// Width of the range in days.
    #[inline]
    pub fn width(&self) -> i64 {
        self.max - self.min
    }

    /// Check whether every cycle in the dataset has the same length.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width() == 0
    }

    /// Normalize a cycle length into [0, 1].
    ///
    /// A zero-width range carries no information, so every deal gets 0.
    pub fn normalize(&self, days: i64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        (days - self.min) as f64 / self.width() as f64
    }
}

/// Median cycle length. Even-sized sets average the two middle values.
pub fn median_cycle_days(days: &[i64]) -> Option<f64> {
    if days.is_empty() {
        return None;
    }
    let values: Vec<f64> = days.iter().map(|&d| d as f64).collect();
    Some(Data::new(values).median())
}

/// 1.0 when `days` is strictly above `threshold`, else 0.0.
#[inline]
pub fn stagnation_flag(days: i64, threshold: f64) -> f64 {
    if days as f64 > threshold {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_normalization() {
        let range = CycleRange::from_days(&[10, 20, 30]).unwrap();
        assert_eq!(range.normalize(10), 0.0);
        assert_eq!(range.normalize(20), 0.5);
        assert_eq!(range.normalize(30), 1.0);
    }

    #[test]
    fn test_negative_cycles_in_range() {
        let range = CycleRange::from_days(&[-5, 5, 15]).unwrap();
        assert_eq!(range.min, -5);
        assert_eq!(range.normalize(-5), 0.0);
        assert_eq!(range.normalize(15), 1.0);
    }

    #[test]
    fn test_degenerate_range_is_zero() {
        let range = CycleRange::from_days(&[12, 12, 12]).unwrap();
        assert!(range.is_degenerate());
        assert_eq!(range.normalize(12), 0.0);
    }

    #[test]
    fn test_empty_range() {
        assert!(CycleRange::from_days(&[]).is_none());
        assert!(median_cycle_days(&[]).is_none());
    }

    #[test]
    fn test_median() {
        assert_eq!(median_cycle_days(&[30, 10, 20]), Some(20.0));
        assert_eq!(median_cycle_days(&[40, 10, 20, 30]), Some(25.0));
    }

    #[test]
    fn test_stagnation_is_strict() {
        assert_eq!(stagnation_flag(15, 15.0), 0.0);
        assert_eq!(stagnation_flag(16, 15.0), 1.0);
        assert_eq!(stagnation_flag(1, 0.0), 1.0);
        assert_eq!(stagnation_flag(0, 0.0), 0.0);
    }
}
