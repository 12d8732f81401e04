use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*};
use std::sync::Arc;
use tokio::task;

use crate::{
    domain::{
        entities::backups::BackupEntity, repositories::backups::BackupRepository,
        value_objects::enums::backup_types::BackupType,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::backups},
};

pub struct BackupPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl BackupPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl BackupRepository for BackupPostgres {
    async fn list_backups(&self, backup_type: Option<BackupType>) -> Result<Vec<BackupEntity>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Vec<BackupEntity>> {
            let mut conn = db_pool.get()?;

            let mut query = backups::table
                .select(BackupEntity::as_select())
                .order(backups::created_at.desc())
                .into_boxed();

            if let Some(backup_type) = backup_type {
                query = query.filter(backups::backup_type.eq(backup_type.as_str()));
            }

            Ok(query.load::<BackupEntity>(&mut conn)?)
        })
        .await?
    }
}
