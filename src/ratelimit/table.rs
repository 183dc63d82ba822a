//! Token Table Module
//!
//! Fixed-window request counters keyed by client token, bounded in size.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::RateLimitExceeded;
use crate::ratelimit::LruOrder;

// == Counter ==
#[derive(Debug, Clone, Copy)]
struct Counter {
    count: u32,
    window_start: Instant,
}

// == Rate Limit Status ==
/// Budget left after an accepted check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Limit the check was made against
    pub limit: u32,
    /// Calls still allowed in the current window
    pub remaining: u32,
    /// Time until the window closes and the count resets
    pub reset_after: Duration,
}

// == Token Table ==
/// Per-token fixed-window counters.
///
/// A window opens on the first accepted call for a token and lasts `interval`.
/// Once it has elapsed the counter is treated as absent. At most
/// `max_tracked_tokens` counters are held; the least recently used one is
/// dropped to make room for a new token.
#[derive(Debug)]
pub struct TokenTable {
    counters: HashMap<String, Counter>,
    lru: LruOrder,
    interval: Duration,
    max_tracked_tokens: usize,
}

impl TokenTable {
    /// Creates an empty table. `max_tracked_tokens` is raised to 1 if zero.
    pub fn new(interval: Duration, max_tracked_tokens: usize) -> Self {
        Self {
            counters: HashMap::new(),
            lru: LruOrder::new(),
            interval,
            max_tracked_tokens: max_tracked_tokens.max(1),
        }
    }

    pub fn max_tracked_tokens(&self) -> usize {
        self.max_tracked_tokens
    }

    // == Check ==
    /// Counts one call for `token` against `limit`.
    ///
    /// Rejections leave the table untouched apart from dropping a counter
    /// whose window already ended. A `limit` of zero rejects every call.
    pub fn check(&mut self, limit: u32, token: &str) -> Result<RateLimitStatus, RateLimitExceeded> {
        let now = Instant::now();
        self.expire(token, now);

        if let Some(counter) = self.counters.get_mut(token) {
            let reset_after = self
                .interval
                .saturating_sub(now.duration_since(counter.window_start));

            if counter.count >= limit {
                return Err(RateLimitExceeded {
                    limit,
                    retry_after: reset_after,
                });
            }

            counter.count += 1;
            let remaining = limit - counter.count;
            self.lru.touch(token);

            return Ok(RateLimitStatus {
                limit,
                remaining,
                reset_after,
            });
        }

        if limit == 0 {
            return Err(RateLimitExceeded {
                limit,
                retry_after: self.interval,
            });
        }

        if self.counters.len() >= self.max_tracked_tokens {
            if let Some(oldest) = self.lru.pop_oldest() {
                self.counters.remove(&oldest);
            }
        }

        self.counters.insert(
            token.to_string(),
            Counter {
                count: 1,
                window_start: now,
            },
        );
        self.lru.touch(token);

        Ok(RateLimitStatus {
            limit,
            remaining: limit - 1,
            reset_after: self.interval,
        })
    }

    /// Calls recorded for `token` in its current window, 0 if none.
    pub fn count(&self, token: &str) -> u32 {
        let now = Instant::now();
        self.counters
            .get(token)
            .filter(|c| now.duration_since(c.window_start) < self.interval)
            .map_or(0, |c| c.count)
    }

    /// Number of tokens currently held, including ones whose window ended.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Forgets every counter.
    pub fn clear(&mut self) {
        self.counters.clear();
        self.lru.clear();
    }

    fn expire(&mut self, token: &str, now: Instant) {
        let ended = self
            .counters
            .get(token)
            .is_some_and(|c| now.duration_since(c.window_start) >= self.interval);

        if ended {
            self.counters.remove(token);
            self.lru.remove(token);
        }
    }
}
