//! Construction parameters shared by both table variants

use crate::error::{Error, Result};

/// Default number of slots / buckets for a new table
pub const DEFAULT_CAPACITY: usize = 8;

/// Default load-factor threshold that triggers a rehash
pub const DEFAULT_LOAD_FACTOR: f64 = 0.9;

/// Table configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    /// Capacity the table starts with
    pub initial_capacity: usize,

    /// `size / capacity` must stay strictly below this after every insert
    pub load_factor_threshold: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            load_factor_threshold: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl TableConfig {
    /// Create a config with the given capacity and threshold
    pub fn new(initial_capacity: usize, load_factor_threshold: f64) -> Self {
        Self {
            initial_capacity,
            load_factor_threshold,
        }
    }

    /// Reject zero capacity and thresholds outside (0, 1)
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(Error::InvalidCapacity(self.initial_capacity));
        }
        // NaN fails both comparisons and lands here too
        if !(self.load_factor_threshold > 0.0 && self.load_factor_threshold < 1.0) {
            return Err(Error::InvalidLoadFactor(self.load_factor_threshold));
        }
        Ok(())
    }

    /// Would holding `len` live entries in `capacity` slots break the threshold?
    pub(crate) fn exceeded(&self, len: usize, capacity: usize) -> bool {
        len as f64 / capacity as f64 >= self.load_factor_threshold
    }

    /// Smallest doubling of `capacity` that holds `len` entries under the threshold
    pub(crate) fn grown(&self, len: usize, capacity: usize) -> Result<usize> {
        let mut capacity = capacity;
        while self.exceeded(len, capacity) {
            capacity = doubled(capacity)?;
        }
        Ok(capacity)
    }
}

/// Next capacity after one doubling
pub(crate) fn doubled(capacity: usize) -> Result<usize> {
    capacity.checked_mul(2).ok_or(Error::CapacityOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TableConfig::default();
        assert_eq!(config.initial_capacity, 8);
        assert_eq!(config.load_factor_threshold, 0.9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = TableConfig::new(0, 0.9);
        assert_eq!(config.validate(), Err(Error::InvalidCapacity(0)));
    }

    #[test]
    fn test_threshold_bounds() {
        assert!(TableConfig::new(8, 0.0).validate().is_err());
        assert!(TableConfig::new(8, 1.0).validate().is_err());
        assert!(TableConfig::new(8, -0.5).validate().is_err());
        assert!(TableConfig::new(8, f64::NAN).validate().is_err());
        assert!(TableConfig::new(8, 0.5).validate().is_ok());
    }

    #[test]
    fn test_exceeded() {
        let config = TableConfig::default();
        assert!(!config.exceeded(7, 8));
        assert!(config.exceeded(8, 8));
    }

    #[test]
    fn test_grown() {
        let config = TableConfig::default();
        assert_eq!(config.grown(7, 8), Ok(8));
        assert_eq!(config.grown(8, 8), Ok(16));

        // several doublings resolved in one step
        assert_eq!(TableConfig::new(4, 0.05).grown(1, 4), Ok(32));
    }

    #[test]
    fn test_grown_overflow() {
        let config = TableConfig::new(8, f64::MIN_POSITIVE);
        assert_eq!(config.grown(1, 8), Err(Error::CapacityOverflow));
    }

    #[test]
    fn test_doubled_overflow() {
        assert_eq!(doubled(8), Ok(16));
        assert_eq!(doubled(usize::MAX), Err(Error::CapacityOverflow));
    }
}
