use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::activity_logs::ActivityLogEntity,
    value_objects::{activity_filters::ActivityFilters, activity_logs::ActivityCount},
};

#[automock]
#[async_trait]
pub trait ActivityLogRepository {
    async fn find_user_activity(
        &self,
        user_id: Uuid,
        filters: ActivityFilters,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<ActivityLogEntity>, i64)>;
    /// Row counts per stored (type, status) pair since `since`.
    async fn count_user_activity_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<ActivityCount>>;
    /// Timestamps since `since`, newest first, at most `limit` of them.
    async fn list_user_activity_times(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<DateTime<Utc>>>;
}
