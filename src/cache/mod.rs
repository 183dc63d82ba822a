//! Cache Module
//!
//! In-memory memoization with per-entry TTL, lazy eviction on lookup and
//! periodic sweeping.

mod entry;
mod shared;
mod stats;
mod store;


pub use entry::CacheEntry;
pub use shared::TtlCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Default lifetime of an entry stored without an explicit TTL
pub const DEFAULT_TTL_SECS: u64 = 60;

/// Default interval between background sweeps
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
