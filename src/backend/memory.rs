//! In-memory backend used for local runs and tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use super::{Backend, BackupRecord, BackupStats, ComponentStatus, SystemStatus};
use crate::error::BackendError;

/// Size recorded for each backup created in memory
const BACKUP_SIZE_BYTES: u64 = 4096;

/// Keeps backups in a vector and counts every call, so callers can observe
/// how often the cache let requests through.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    backups: RwLock<Vec<BackupRecord>>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of backend operations invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes every subsequent operation fail with `Unavailable` (or recover).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn enter(&self) -> Result<(), BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("backup service offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn list_backups(&self) -> Result<Vec<BackupRecord>, BackendError> {
        self.enter()?;
        Ok(self.backups.read().await.clone())
    }

    async fn backup_stats(&self) -> Result<BackupStats, BackendError> {
        self.enter()?;
        let backups = self.backups.read().await;

        Ok(BackupStats {
            total: backups.len(),
            total_bytes: backups.iter().map(|b| b.size_bytes).sum(),
            latest: backups.iter().map(|b| b.created_at).max(),
        })
    }

    async fn system_status(&self, verbose: bool) -> Result<SystemStatus, BackendError> {
        self.enter()?;
        let backups = self.backups.read().await.len();

        let components = verbose.then(|| {
            vec![
                ComponentStatus {
                    name: "storage".to_string(),
                    healthy: true,
                },
                ComponentStatus {
                    name: "scheduler".to_string(),
                    healthy: true,
                },
            ]
        });

        Ok(SystemStatus {
            healthy: true,
            backups,
            components,
        })
    }

    async fn create_backup(&self, label: Option<String>) -> Result<BackupRecord, BackendError> {
        self.enter()?;
        let mut backups = self.backups.write().await;

        let record = BackupRecord {
            id: format!("backup-{}", backups.len() + 1),
            label,
            created_at: Utc::now(),
            size_bytes: BACKUP_SIZE_BYTES,
        };
        backups.push(record.clone());
        info!(id = %record.id, "backup created");

        Ok(record)
    }
}
