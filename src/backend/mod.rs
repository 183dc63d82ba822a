//! Backend Module
//!
//! The expensive operations the guarded routes front: backup listing,
//! aggregate statistics, system status and backup creation. Production
//! deployments wrap the backup CLI behind [`Backend`]; [`InMemoryBackend`]
//! serves local runs and tests.

mod memory;

pub use memory::InMemoryBackend;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BackendError;

// == Records ==
/// One stored backup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupRecord {
    pub id: String,
    pub label: Option<String>,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
}

/// Aggregate numbers over all backups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupStats {
    pub total: usize,
    pub total_bytes: u64,
    pub latest: Option<DateTime<Utc>>,
}

/// Health of the backup system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub healthy: bool,
    pub backups: usize,
    /// Per-component detail, only filled for verbose requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<ComponentStatus>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub name: String,
    pub healthy: bool,
}

// == Backend Trait ==
/// Expensive operations behind the guarded routes.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_backups(&self) -> Result<Vec<BackupRecord>, BackendError>;

    async fn backup_stats(&self) -> Result<BackupStats, BackendError>;

    async fn system_status(&self, verbose: bool) -> Result<SystemStatus, BackendError>;

    async fn create_backup(&self, label: Option<String>) -> Result<BackupRecord, BackendError>;
}
