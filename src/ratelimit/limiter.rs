//! Rate Limiter Handle
//!
//! Cloneable, independently budgeted limiter shared by request handlers.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::warn;

use crate::error::RateLimitExceeded;
use crate::ratelimit::{RateLimitStatus, TokenTable};

// == Rate Limiter ==
/// A named fixed-window limiter. Clones share one token table; separate
/// instances keep separate budgets for the same client.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    name: &'static str,
    table: Arc<Mutex<TokenTable>>,
}

impl RateLimiter {
    /// Creates a limiter whose windows last `interval` and which tracks at
    /// most `max_tracked_tokens` clients.
    pub fn new(name: &'static str, interval: Duration, max_tracked_tokens: usize) -> Self {
        Self {
            name,
            table: Arc::new(Mutex::new(TokenTable::new(interval, max_tracked_tokens))),
        }
    }

    /// Counts one call by `token` against `limit`.
    pub async fn check(&self, limit: u32, token: &str) -> Result<RateLimitStatus, RateLimitExceeded> {
        let result = self.table.lock().await.check(limit, token);

        if let Err(err) = &result {
            warn!(
                limiter = self.name,
                token,
                limit,
                retry_after_secs = err.retry_after.as_secs(),
                "rate limit exceeded"
            );
        }

        result
    }

    /// Number of client tokens currently tracked.
    pub async fn tracked_tokens(&self) -> usize {
        self.table.lock().await.len()
    }
}

// == Gate ==
/// A limiter paired with the per-request limit enforced on a group of routes.
#[derive(Debug, Clone)]
pub struct Gate {
    limiter: RateLimiter,
    limit: u32,
}

impl Gate {
    pub fn new(limiter: RateLimiter, limit: u32) -> Self {
        Self { limiter, limit }
    }

    pub async fn check(&self, token: &str) -> Result<RateLimitStatus, RateLimitExceeded> {
        self.limiter.check(self.limit, token).await
    }
}
