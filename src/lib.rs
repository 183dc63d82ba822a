//! API Guard - TTL caching and request throttling for backend API routes
//!
//! Route handlers derive a client token, pass a rate-limit gate, then consult
//! the cache before invoking the expensive backend.

pub mod api;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod ratelimit;
pub mod tasks;

pub use api::AppState;
pub use cache::TtlCache;
pub use config::Config;
pub use ratelimit::{RateLimitExceeded, RateLimiter};
pub use tasks::{spawn_sweep_task, SweepTask};
