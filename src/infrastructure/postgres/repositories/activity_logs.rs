use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, dsl::count_star, pg::Pg, prelude::*};
use std::sync::Arc;
use tokio::task;
use uuid::Uuid;

use crate::{
    domain::{
        entities::activity_logs::ActivityLogEntity,
        repositories::activity_logs::ActivityLogRepository,
        value_objects::{activity_filters::ActivityFilters, activity_logs::ActivityCount},
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::activity_logs},
};

pub struct ActivityLogPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ActivityLogPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn filtered(user_id: Uuid, filters: &ActivityFilters) -> activity_logs::BoxedQuery<'static, Pg> {
    let mut query = activity_logs::table
        .filter(activity_logs::user_id.eq(user_id))
        .into_boxed();

    if let Some(activity_type) = filters.activity_type {
        query = query.filter(activity_logs::activity_type.eq(activity_type.as_str()));
    }
    if let Some(status) = filters.status {
        query = query.filter(activity_logs::status.eq(status.as_str()));
    }

    query
}

#[async_trait]
impl ActivityLogRepository for ActivityLogPostgres {
    async fn find_user_activity(
        &self,
        user_id: Uuid,
        filters: ActivityFilters,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<ActivityLogEntity>, i64)> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<(Vec<ActivityLogEntity>, i64)> {
            let mut conn = db_pool.get()?;

            let total = filtered(user_id, &filters)
                .count()
                .get_result::<i64>(&mut conn)?;
            let rows = filtered(user_id, &filters)
                .select(ActivityLogEntity::as_select())
                .order((activity_logs::logged_at.desc(), activity_logs::id.desc()))
                .offset(offset)
                .limit(limit)
                .load::<ActivityLogEntity>(&mut conn)?;

            Ok((rows, total))
        })
        .await?
    }

    async fn count_user_activity_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<ActivityCount>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Vec<ActivityCount>> {
            let mut conn = db_pool.get()?;

            let counts = activity_logs::table
                .filter(activity_logs::user_id.eq(user_id))
                .filter(activity_logs::logged_at.ge(since))
                .group_by((activity_logs::activity_type, activity_logs::status))
                .select((
                    activity_logs::activity_type,
                    activity_logs::status,
                    count_star(),
                ))
                .load::<(String, String, i64)>(&mut conn)?;

            Ok(counts
                .into_iter()
                .map(|(activity_type, status, count)| ActivityCount {
                    activity_type,
                    status,
                    count,
                })
                .collect())
        })
        .await?
    }

    async fn list_user_activity_times(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<DateTime<Utc>>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Vec<DateTime<Utc>>> {
            let mut conn = db_pool.get()?;

            let times = activity_logs::table
                .filter(activity_logs::user_id.eq(user_id))
                .filter(activity_logs::logged_at.ge(since))
                .select(activity_logs::logged_at)
                .order(activity_logs::logged_at.desc())
                .limit(limit)
                .load::<DateTime<Utc>>(&mut conn)?;

            Ok(times)
        })
        .await?
    }
}
