use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::system_logs::LogEntry,
    value_objects::{
        enums::log_levels::LogLevel, log_filters::LogFilters, system_logs::LevelCounts,
    },
};

#[automock]
#[async_trait]
pub trait SystemLogRepository {
    /// One page, newest first, plus the total matching count.
    async fn find_logs(
        &self,
        filters: LogFilters,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<LogEntry>, i64)>;
    async fn find_log(&self, id: Uuid) -> Result<Option<LogEntry>>;
    async fn count_logs(&self, filters: LogFilters) -> Result<i64>;
    async fn count_by_level(&self, filters: LogFilters) -> Result<LevelCounts>;
    async fn list_level_points(
        &self,
        filters: LogFilters,
        limit: i64,
    ) -> Result<Vec<(DateTime<Utc>, LogLevel)>>;
    async fn list_logs(&self, filters: LogFilters, limit: i64) -> Result<Vec<LogEntry>>;
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize>;
}
