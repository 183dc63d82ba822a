//! Request DTOs for the guarded API

use serde::Deserialize;

/// Longest accepted backup label, in bytes
pub const MAX_LABEL_LENGTH: usize = 128;

/// Request body for POST /api/backups
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBackupRequest {
    /// Optional human-readable label
    #[serde(default)]
    pub label: Option<String>,
}

impl CreateBackupRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        let label = self.label.as_deref()?;
        if label.trim().is_empty() {
            return Some("Label cannot be blank".to_string());
        }
        if label.len() > MAX_LABEL_LENGTH {
            return Some(format!(
                "Label exceeds maximum length of {} bytes",
                MAX_LABEL_LENGTH
            ));
        }
        None
    }
}

/// Query string for GET /api/system/status
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub verbose: bool,
}

impl StatusQuery {
    /// Cache key for this status variant.
    pub fn cache_key(&self) -> &'static str {
        if self.verbose {
            "system:status:verbose"
        } else {
            "system:status:brief"
        }
    }
}
