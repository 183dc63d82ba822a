//! Rate Limiting Module
//!
//! Fixed-window request counting per client token with a bounded,
//! least-recently-used token table.
//!
//! A client can spend a full budget just before a window ends and another
//! right after it, so bursts of up to twice the limit are possible across
//! a boundary.

mod client;
mod limiter;
mod lru;
mod table;


pub use crate::error::RateLimitExceeded;
pub use client::{client_token, client_token_at, ClientToken, FORWARDED_FOR, REAL_IP};
pub use limiter::{Gate, RateLimiter};
pub use lru::LruOrder;
pub use table::{RateLimitStatus, TokenTable};

// == Public Constants ==
/// Default window length
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Default bound on tracked client tokens per limiter
pub const DEFAULT_MAX_TRACKED_TOKENS: usize = 500;

/// Calls per window allowed through the strict gate
pub const DEFAULT_STRICT_LIMIT: u32 = 3;

/// Calls per window allowed through the lenient gate
pub const DEFAULT_LENIENT_LIMIT: u32 = 60;
