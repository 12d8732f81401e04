use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::backups::BackupEntity;

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupView {
    pub filename: String,
    pub backup_type: String,
    pub size_bytes: i64,
    pub size: String,
    pub storage_location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<BackupEntity> for BackupView {
    fn from(value: BackupEntity) -> Self {
        Self {
            size: human_size(value.size_bytes),
            filename: value.filename,
            backup_type: value.backup_type,
            size_bytes: value.size_bytes,
            storage_location: value.storage_location,
            created_at: value.created_at,
        }
    }
}

/// `512 B`, `1.50 KB`, `48.60 MB` ...
pub fn human_size(size_bytes: i64) -> String {
    let mut size = size_bytes.max(0) as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", size as i64, SIZE_UNITS[unit])
    } else {
        format!("{size:.2} {}", SIZE_UNITS[unit])
    }
}
