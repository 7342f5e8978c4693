//! Configuration for [`HashIndex`](crate::HashIndex).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Bucket count used when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 16;

/// Ratio of entries to buckets above which the bucket array doubles.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// Smallest accepted load factor. At or above it a single doubling always
/// brings `len / capacity` back under the threshold.
pub const MIN_LOAD_FACTOR: f64 = 0.5;

/// Configuration for a hash index.
///
/// Missing fields fall back to [`DEFAULT_CAPACITY`] and
/// [`DEFAULT_LOAD_FACTOR`] when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashIndexConfig {
    /// Initial number of buckets
    pub initial_capacity: usize,
    /// Resize threshold for `len / capacity`
    pub load_factor: f64,
}

impl Default for HashIndexConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl HashIndexConfig {
    /// Check that the configuration describes a usable table.
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(Error::InvalidCapacity);
        }
        if !self.load_factor.is_finite() || self.load_factor < MIN_LOAD_FACTOR {
            return Err(Error::InvalidLoadFactor(self.load_factor));
        }
        Ok(())
    }
}
