//! API Module
//!
//! HTTP handlers and routing for the guarded backup API.
//!
//! # Endpoints
//! - `GET /api/backups` - List backups (lenient gate, cached 60s)
//! - `POST /api/backups` - Create a backup (strict gate, invalidates views)
//! - `GET /api/backups/stats` - Aggregate backup numbers (lenient gate, cached 5min)
//! - `GET /api/system/status` - System status (lenient gate, cached 30s)
//! - `GET /api/cache/stats` - Cache introspection
//! - `DELETE /api/cache` - Clear the cache (strict gate)
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
