use std::sync::Arc;

use tracing::error;

use crate::domain::{
    errors::{ReportingError, ReportingResult},
    repositories::backups::BackupRepository,
    value_objects::{backups::BackupView, enums::backup_types::BackupType},
};

pub struct BackupUseCase<B>
where
    B: BackupRepository + Send + Sync + 'static,
{
    backup_repo: Arc<B>,
}

impl<B> BackupUseCase<B>
where
    B: BackupRepository + Send + Sync + 'static,
{
    pub fn new(backup_repo: Arc<B>) -> Self {
        Self { backup_repo }
    }

    pub async fn list(&self, backup_type: Option<BackupType>) -> ReportingResult<Vec<BackupView>> {
        let mut backups = self
            .backup_repo
            .list_backups(backup_type)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "backups: failed to list backups");
                ReportingError::Upstream(err)
            })?;

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(backups.into_iter().map(BackupView::from).collect())
    }
}
