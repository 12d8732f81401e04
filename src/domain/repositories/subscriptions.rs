use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::{plans::PlanEntity, subscriptions::SubscriptionEntity},
    value_objects::enums::subscription_statuses::SubscriptionStatus,
};

#[automock]
#[async_trait]
pub trait SubscriptionRepository {
    async fn find_subscription(&self, user_id: Uuid) -> Result<Option<SubscriptionEntity>>;
    /// One page, most recently updated first, plus the total matching count.
    async fn find_subscriptions(
        &self,
        status: Option<SubscriptionStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<SubscriptionEntity>, i64)>;
    /// Raw status strings with their row counts.
    async fn count_by_status(&self) -> Result<Vec<(String, i64)>>;
    async fn count_active_by_plan(&self) -> Result<Vec<(Uuid, i64)>>;
}

#[automock]
#[async_trait]
pub trait PlanRepository {
    async fn find_plans(&self) -> Result<Vec<PlanEntity>>;
}
