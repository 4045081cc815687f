//! Table sizing: initial bucket count, load factor and the growth sequence.

use crate::error::TableError;

/// Bucket counts a table steps through as it grows.
pub const BUCKET_PRIMES: [usize; 13] = [
    17, 31, 67, 127, 257, 509, 1021, 2053, 4099, 8191, 16381, 32009, 65269,
];

pub const DEFAULT_BUCKETS: usize = 17;
pub const DEFAULT_LOAD_FACTOR: f64 = 14.0;

/// Construction parameters for `HashTable`.
///
/// The default load factor is high, so chains grow long before a
/// resize kicks in. Lower it to trade memory and rehash work for shorter
/// chains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    pub initial_buckets: usize,
    pub load_factor: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_buckets: DEFAULT_BUCKETS,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl TableConfig {
    pub fn with_initial_buckets(mut self, buckets: usize) -> Self {
        self.initial_buckets = buckets;
        self
    }

    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    pub fn validate(&self) -> Result<(), TableError> {
        if self.initial_buckets == 0 {
            return Err(TableError::InvalidConfig("initial_buckets must be non-zero"));
        }
        if !(self.load_factor.is_finite() && self.load_factor > 0.0) {
            return Err(TableError::InvalidConfig(
                "load_factor must be a positive finite number",
            ));
        }
        Ok(())
    }
}

/// First bucket count in `BUCKET_PRIMES` strictly larger than `current`.
pub fn next_bucket_count(current: usize) -> Option<usize> {
    BUCKET_PRIMES.iter().copied().find(|&p| p > current)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: Growth steps through the prime sequence one entry at a time.
    #[test]
    fn next_bucket_count_follows_sequence() {
        for pair in BUCKET_PRIMES.windows(2) {
            assert_eq!(next_bucket_count(pair[0]), Some(pair[1]));
        }
        assert_eq!(next_bucket_count(65269), None);
    }

    /// Invariant: A bucket count outside the sequence jumps to the next larger prime.
    #[test]
    fn next_bucket_count_from_custom_size() {
        assert_eq!(next_bucket_count(1), Some(17));
        assert_eq!(next_bucket_count(100), Some(127));
        assert_eq!(next_bucket_count(70_000), None);
    }

    #[test]
    fn default_is_valid() {
        let c = TableConfig::default();
        assert_eq!(c.initial_buckets, 17);
        assert_eq!(c.load_factor, 14.0);
        assert!(c.validate().is_ok());
    }

    /// Invariant: Zero buckets and non-positive or non-finite load factors are rejected.
    #[test]
    fn validate_rejects_bad_parameters() {
        let zero = TableConfig::default().with_initial_buckets(0);
        assert!(matches!(zero.validate(), Err(TableError::InvalidConfig(_))));

        for lf in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let c = TableConfig::default().with_load_factor(lf);
            assert!(c.validate().is_err(), "load factor {lf} must be rejected");
        }
    }
}
