use anyhow::Result;
use async_trait::async_trait;
use diesel::{
    RunQueryDsl,
    dsl::{count_star, sql},
    pg::Pg,
    prelude::*,
    sql_types::BigInt,
};
use std::sync::Arc;
use tokio::task;
use uuid::Uuid;

use crate::{
    domain::{
        entities::transactions::TransactionEntity,
        repositories::transactions::TransactionRepository,
        value_objects::{
            enums::transaction_statuses::TransactionStatus, time_windows::TimeWindow,
            transaction_filters::TransactionFilters, transactions::PeriodTotals,
        },
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::transactions},
};

pub struct TransactionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl TransactionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn in_window(window: &TimeWindow) -> transactions::BoxedQuery<'static, Pg> {
    let mut query = transactions::table.into_boxed();

    if let Some(since) = window.since {
        query = query.filter(transactions::created_at.ge(since));
    }
    if let Some(until) = window.until {
        query = query.filter(transactions::created_at.lt(until));
    }

    query
}

fn filtered(filters: &TransactionFilters) -> transactions::BoxedQuery<'static, Pg> {
    let mut query = in_window(&filters.window);

    if let Some(status) = filters.status {
        query = query.filter(transactions::status.eq(status.as_str()));
    }
    if let Some(user_id) = filters.user_id {
        query = query.filter(transactions::user_id.eq(user_id));
    }

    query
}

#[async_trait]
impl TransactionRepository for TransactionPostgres {
    async fn find_transactions(
        &self,
        filters: TransactionFilters,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<TransactionEntity>, i64)> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<(Vec<TransactionEntity>, i64)> {
            let mut conn = db_pool.get()?;

            let total = filtered(&filters).count().get_result::<i64>(&mut conn)?;
            let rows = filtered(&filters)
                .select(TransactionEntity::as_select())
                .order((transactions::created_at.desc(), transactions::id.desc()))
                .offset(offset)
                .limit(limit)
                .load::<TransactionEntity>(&mut conn)?;

            Ok((rows, total))
        })
        .await?
    }

    async fn find_transaction(&self, id: Uuid) -> Result<Option<TransactionEntity>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Option<TransactionEntity>> {
            let mut conn = db_pool.get()?;

            let row = transactions::table
                .filter(transactions::id.eq(id))
                .select(TransactionEntity::as_select())
                .first::<TransactionEntity>(&mut conn)
                .optional()?;

            Ok(row)
        })
        .await?
    }

    async fn list_transactions(
        &self,
        filters: TransactionFilters,
        limit: i64,
    ) -> Result<Vec<TransactionEntity>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Vec<TransactionEntity>> {
            let mut conn = db_pool.get()?;

            let rows = filtered(&filters)
                .select(TransactionEntity::as_select())
                .order((transactions::created_at.desc(), transactions::id.desc()))
                .limit(limit)
                .load::<TransactionEntity>(&mut conn)?;

            Ok(rows)
        })
        .await?
    }

    async fn count_transactions(&self, filters: TransactionFilters) -> Result<i64> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<i64> {
            let mut conn = db_pool.get()?;
            Ok(filtered(&filters).count().get_result::<i64>(&mut conn)?)
        })
        .await?
    }

    async fn count_by_status(&self) -> Result<Vec<(String, i64)>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Vec<(String, i64)>> {
            let mut conn = db_pool.get()?;

            let counts = transactions::table
                .group_by(transactions::status)
                .select((transactions::status, count_star()))
                .load::<(String, i64)>(&mut conn)?;

            Ok(counts)
        })
        .await?
    }

    async fn list_user_transactions(&self, user_id: Uuid) -> Result<Vec<TransactionEntity>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Vec<TransactionEntity>> {
            let mut conn = db_pool.get()?;

            let rows = transactions::table
                .filter(transactions::user_id.eq(user_id))
                .order(transactions::created_at.desc())
                .select(TransactionEntity::as_select())
                .load::<TransactionEntity>(&mut conn)?;

            Ok(rows)
        })
        .await?
    }

    async fn period_totals(&self, window: TimeWindow) -> Result<PeriodTotals> {
        let db_pool = Arc::clone(&self.db_pool);
        let completed = TransactionStatus::Completed.as_str();

        task::spawn_blocking(move || -> Result<PeriodTotals> {
            let mut conn = db_pool.get()?;

            let total = in_window(&window).count().get_result::<i64>(&mut conn)?;
            let completed_count = in_window(&window)
                .filter(transactions::status.eq(completed))
                .count()
                .get_result::<i64>(&mut conn)?;
            let completed_amount_minor = in_window(&window)
                .filter(transactions::status.eq(completed))
                .select(sql::<BigInt>("COALESCE(SUM(amount_minor), 0)::BIGINT"))
                .get_result::<i64>(&mut conn)?;

            Ok(PeriodTotals {
                transactions: total,
                completed: completed_count,
                completed_amount_minor,
            })
        })
        .await?
    }
}
