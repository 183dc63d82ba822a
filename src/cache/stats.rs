//! Cache Statistics Module
//!
//! Introspection snapshot for operational visibility.

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time view of the cache contents and lookup counters.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CacheStats {
    /// Number of stored entries, expired-but-unswept ones included
    pub size: usize,
    /// Stored keys, sorted
    pub keys: Vec<String>,
    /// Lookups that found a fresh entry
    pub hits: u64,
    /// Lookups that found nothing or an expired entry
    pub misses: u64,
}

impl CacheStats {
    /// Returns hits / (hits + misses), or 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
