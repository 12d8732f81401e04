use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::backups::BackupEntity, value_objects::enums::backup_types::BackupType,
};

#[automock]
#[async_trait]
pub trait BackupRepository {
    async fn list_backups(&self, backup_type: Option<BackupType>) -> Result<Vec<BackupEntity>>;
}
