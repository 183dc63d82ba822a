//! Request and Response models for the guarded API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

pub use requests::{CreateBackupRequest, StatusQuery, MAX_LABEL_LENGTH};
pub use responses::{CacheStatsResponse, ClearCacheResponse, ErrorResponse, HealthResponse};
