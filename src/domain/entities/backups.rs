use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::backups;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = backups)]
pub struct BackupEntity {
    pub id: Uuid,
    pub filename: String,
    pub backup_type: String,
    pub size_bytes: i64,
    pub storage_location: Option<String>,
    pub created_at: DateTime<Utc>,
}
