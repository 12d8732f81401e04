use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, delete, dsl::not, pg::Pg, prelude::*, sql_types::Text};
use std::sync::Arc;
use tokio::task;
use uuid::Uuid;

use crate::{
    domain::{
        entities::system_logs::{LogEntry, LogRow},
        repositories::system_logs::SystemLogRepository,
        value_objects::{
            enums::log_levels::LogLevel, log_filters::LogFilters, system_logs::LevelCounts,
        },
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::system_logs},
};

diesel::define_sql_function!(fn lower(value: Text) -> Text);

pub struct SystemLogPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SystemLogPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

/// Stored spellings for each level.
fn stored_levels(level: LogLevel) -> Vec<&'static str> {
    match level {
        LogLevel::Info => vec!["info"],
        LogLevel::Warning => vec!["warning", "warn"],
        LogLevel::Error => vec!["error"],
        LogLevel::Debug => vec!["debug"],
    }
}

/// Spellings owned by every level except `level`.
fn spellings_outside(level: LogLevel) -> Vec<&'static str> {
    LogLevel::ALL
        .into_iter()
        .filter(|other| *other != level)
        .flat_map(stored_levels)
        .collect()
}

/// Unknown spellings load as `Info`, so the `Info` predicate is "none of the other levels".
fn with_level(
    query: system_logs::BoxedQuery<'static, Pg>,
    level: LogLevel,
) -> system_logs::BoxedQuery<'static, Pg> {
    match level {
        LogLevel::Info => query.filter(not(
            lower(system_logs::level).eq_any(spellings_outside(LogLevel::Info)),
        )),
        level => query.filter(lower(system_logs::level).eq_any(stored_levels(level))),
    }
}

pub(crate) fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn filtered(filters: &LogFilters) -> system_logs::BoxedQuery<'static, Pg> {
    let mut query = system_logs::table.into_boxed();

    if let Some(level) = filters.level {
        query = with_level(query, level);
    }
    if let Some(user) = filters.user.as_deref() {
        query = query.filter(system_logs::username.ilike(like_pattern(user)));
    }
    if let Some(category) = filters.category.clone() {
        query = query.filter(system_logs::category.eq(category));
    }
    if let Some(since) = filters.window.since {
        query = query.filter(system_logs::logged_at.ge(since));
    }
    if let Some(until) = filters.window.until {
        query = query.filter(system_logs::logged_at.lt(until));
    }

    query
}

#[async_trait]
impl SystemLogRepository for SystemLogPostgres {
    async fn find_logs(
        &self,
        filters: LogFilters,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<LogEntry>, i64)> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<(Vec<LogEntry>, i64)> {
            let mut conn = db_pool.get()?;

            let total = filtered(&filters).count().get_result::<i64>(&mut conn)?;
            let rows = filtered(&filters)
                .order((system_logs::logged_at.desc(), system_logs::id.desc()))
                .offset(offset)
                .limit(limit)
                .load::<LogRow>(&mut conn)?;

            Ok((rows.into_iter().map(LogEntry::from).collect(), total))
        })
        .await?
    }

    async fn find_log(&self, id: Uuid) -> Result<Option<LogEntry>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Option<LogEntry>> {
            let mut conn = db_pool.get()?;

            let row = system_logs::table
                .filter(system_logs::id.eq(id))
                .first::<LogRow>(&mut conn)
                .optional()?;

            Ok(row.map(LogEntry::from))
        })
        .await?
    }

    async fn count_logs(&self, filters: LogFilters) -> Result<i64> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<i64> {
            let mut conn = db_pool.get()?;
            let total = filtered(&filters).count().get_result::<i64>(&mut conn)?;
            Ok(total)
        })
        .await?
    }

    async fn count_by_level(&self, filters: LogFilters) -> Result<LevelCounts> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<LevelCounts> {
            let mut conn = db_pool.get()?;

            let mut count = |level: LogLevel| -> Result<i64> {
                let total = with_level(filtered(&filters), level)
                    .count()
                    .get_result::<i64>(&mut conn)?;
                Ok(total)
            };

            Ok(LevelCounts {
                info: count(LogLevel::Info)?,
                warning: count(LogLevel::Warning)?,
                error: count(LogLevel::Error)?,
                debug: count(LogLevel::Debug)?,
            })
        })
        .await?
    }

    async fn list_level_points(
        &self,
        filters: LogFilters,
        limit: i64,
    ) -> Result<Vec<(DateTime<Utc>, LogLevel)>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Vec<(DateTime<Utc>, LogLevel)>> {
            let mut conn = db_pool.get()?;

            let points = filtered(&filters)
                .select((system_logs::logged_at, system_logs::level))
                .order(system_logs::logged_at.desc())
                .limit(limit)
                .load::<(DateTime<Utc>, String)>(&mut conn)?;

            Ok(points
                .into_iter()
                .map(|(at, level)| (at, LogLevel::from_stored(&level)))
                .collect())
        })
        .await?
    }

    async fn list_logs(&self, filters: LogFilters, limit: i64) -> Result<Vec<LogEntry>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Vec<LogEntry>> {
            let mut conn = db_pool.get()?;

            let rows = filtered(&filters)
                .order((system_logs::logged_at.desc(), system_logs::id.desc()))
                .limit(limit)
                .load::<LogRow>(&mut conn)?;

            Ok(rows.into_iter().map(LogEntry::from).collect())
        })
        .await?
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<usize> {
            let mut conn = db_pool.get()?;

            let deleted = delete(system_logs::table.filter(system_logs::logged_at.lt(cutoff)))
                .execute(&mut conn)?;

            Ok(deleted)
        })
        .await?
    }
}
