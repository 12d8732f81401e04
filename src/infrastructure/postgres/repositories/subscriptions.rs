use anyhow::Result;
use async_trait::async_trait;
use diesel::{
    RunQueryDsl,
    dsl::{count_star, not},
    pg::Pg,
    prelude::*,
    sql_types::Text,
};
use std::sync::Arc;
use tokio::task;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            plans::{PlanEntity, PlanRow},
            subscriptions::SubscriptionEntity,
        },
        repositories::subscriptions::{PlanRepository, SubscriptionRepository},
        value_objects::enums::subscription_statuses::SubscriptionStatus,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{plans, subscriptions},
    },
};

diesel::define_sql_function!(fn lower(value: Text) -> Text);

/// Unknown stored statuses read as inactive, so `Inactive` matches "neither active nor cancelled".
fn with_status(status: Option<SubscriptionStatus>) -> subscriptions::BoxedQuery<'static, Pg> {
    let query = subscriptions::table.into_boxed();

    match status {
        None => query,
        Some(SubscriptionStatus::Inactive) => {
            let known: Vec<&'static str> = [SubscriptionStatus::Active, SubscriptionStatus::Cancelled]
                .iter()
                .flat_map(|known| known.stored_spellings().iter().copied())
                .collect();
            query.filter(not(lower(subscriptions::status).eq_any(known)))
        }
        Some(status) => query.filter(
            lower(subscriptions::status).eq_any(status.stored_spellings().to_vec()),
        ),
    }
}

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn find_subscription(&self, user_id: Uuid) -> Result<Option<SubscriptionEntity>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Option<SubscriptionEntity>> {
            let mut conn = db_pool.get()?;

            let subscription = subscriptions::table
                .filter(subscriptions::user_id.eq(user_id))
                .order(subscriptions::updated_at.desc())
                .select(SubscriptionEntity::as_select())
                .first::<SubscriptionEntity>(&mut conn)
                .optional()?;

            Ok(subscription)
        })
        .await?
    }

    async fn find_subscriptions(
        &self,
        status: Option<SubscriptionStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<SubscriptionEntity>, i64)> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<(Vec<SubscriptionEntity>, i64)> {
            let mut conn = db_pool.get()?;

            let total = with_status(status).count().get_result::<i64>(&mut conn)?;
            let rows = with_status(status)
                .select(SubscriptionEntity::as_select())
                .order((subscriptions::updated_at.desc(), subscriptions::id.desc()))
                .offset(offset)
                .limit(limit)
                .load::<SubscriptionEntity>(&mut conn)?;

            Ok((rows, total))
        })
        .await?
    }

    async fn count_by_status(&self) -> Result<Vec<(String, i64)>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Vec<(String, i64)>> {
            let mut conn = db_pool.get()?;

            let counts = subscriptions::table
                .group_by(subscriptions::status)
                .select((subscriptions::status, count_star()))
                .load::<(String, i64)>(&mut conn)?;

            Ok(counts)
        })
        .await?
    }

    async fn count_active_by_plan(&self) -> Result<Vec<(Uuid, i64)>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Vec<(Uuid, i64)>> {
            let mut conn = db_pool.get()?;

            let counts = subscriptions::table
                .filter(subscriptions::status.eq(SubscriptionStatus::Active.to_string()))
                .filter(subscriptions::plan_id.is_not_null())
                .group_by(subscriptions::plan_id)
                .select((subscriptions::plan_id, count_star()))
                .load::<(Option<Uuid>, i64)>(&mut conn)?;

            Ok(counts
                .into_iter()
                .filter_map(|(plan_id, count)| plan_id.map(|plan_id| (plan_id, count)))
                .collect())
        })
        .await?
    }
}

pub struct PlanPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PlanPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PlanRepository for PlanPostgres {
    async fn find_plans(&self) -> Result<Vec<PlanEntity>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Vec<PlanEntity>> {
            let mut conn = db_pool.get()?;

            let rows = plans::table
                .order((plans::monthly_price_minor.asc(), plans::name.asc()))
                .select(PlanRow::as_select())
                .load::<PlanRow>(&mut conn)?;

            Ok(rows.into_iter().map(PlanEntity::from).collect())
        })
        .await?
    }
}
