use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    application::usecases::{
        log_query::{page_offset, validate_page},
        subscription_projector::{self, remaining_days},
    },
    config::config_model::Reporting,
    domain::{
        entities::{plans::PlanEntity, subscriptions::SubscriptionEntity},
        errors::{ReportingError, ReportingResult},
        repositories::{
            subscriptions::{PlanRepository, SubscriptionRepository},
            transactions::TransactionRepository,
        },
        value_objects::{
            enums::{
                billing_periods::BillingPeriod, subscription_statuses::SubscriptionStatus,
                transaction_statuses::TransactionStatus,
            },
            pagination::PageMeta,
            plans::format_money,
            subscriptions::{
                NO_PLAN_NAME, PlanCard, PlanUsage, SubscriptionListItem, SubscriptionPage,
                SubscriptionStats, SubscriptionSummary, SubscriptionViewModel,
            },
        },
    },
};

pub const NOT_AVAILABLE: &str = "N/A";
pub const NEXT_PAYMENT_FREE_PLAN: &str = "None - Free plan";
pub const NEXT_PAYMENT_CANCELLED: &str = "None - Subscription cancelled";
pub const NEXT_PAYMENT_INACTIVE: &str = "None - No active subscription";

pub struct SubscriptionUseCase<S, P, T>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    T: TransactionRepository + Send + Sync + 'static,
{
    subscription_repo: Arc<S>,
    plan_repo: Arc<P>,
    transaction_repo: Arc<T>,
    limits: Reporting,
}

impl<S, P, T> SubscriptionUseCase<S, P, T>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    T: TransactionRepository + Send + Sync + 'static,
{
    pub fn new(
        subscription_repo: Arc<S>,
        plan_repo: Arc<P>,
        transaction_repo: Arc<T>,
        limits: Reporting,
    ) -> Self {
        Self {
            subscription_repo,
            plan_repo,
            transaction_repo,
            limits,
        }
    }

    pub fn default_page_size(&self) -> i64 {
        self.limits.default_page_size
    }

    pub async fn current(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> ReportingResult<SubscriptionViewModel> {
        let subscription = self.load_subscription(user_id).await?;
        let catalog = self.load_plans().await?;

        let view = subscription_projector::project(subscription.as_ref(), &catalog, now);
        info!(%user_id, status = %view.status, "subscriptions: projected current subscription");

        Ok(view)
    }

    pub async fn plan_cards(&self, user_id: Uuid) -> ReportingResult<Vec<PlanCard>> {
        let subscription = self.load_subscription(user_id).await?;
        let catalog = self.load_plans().await?;

        let current = subscription
            .filter(|sub| SubscriptionStatus::from_str(&sub.status) == SubscriptionStatus::Active)
            .and_then(|sub| subscription_projector::resolve_plan(sub.plan_id, &catalog).ok());

        Ok(catalog
            .iter()
            .filter(|plan| plan.is_active)
            .map(|plan| subscription_projector::plan_card(current, plan))
            .collect())
    }

    pub async fn summary(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> ReportingResult<SubscriptionSummary> {
        let subscription = self.load_subscription(user_id).await?;
        let catalog = self.load_plans().await?;
        let transactions = self
            .transaction_repo
            .list_user_transactions(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: failed to load transactions");
                ReportingError::Upstream(err)
            })?;

        let total_spent_minor: i64 = transactions
            .iter()
            .filter(|tx| TransactionStatus::from_str(&tx.status) == Some(TransactionStatus::Completed))
            .map(|tx| tx.amount_minor)
            .sum();

        Ok(build_summary(
            subscription.as_ref(),
            &catalog,
            total_spent_minor,
            transactions.len(),
            now,
        ))
    }

    pub async fn stats(&self) -> ReportingResult<SubscriptionStats> {
        let by_status = self
            .subscription_repo
            .count_by_status()
            .await
            .map_err(|err| {
                error!(db_error = ?err, "subscriptions: failed to count subscriptions");
                ReportingError::Upstream(err)
            })?;
        let by_plan = self
            .subscription_repo
            .count_active_by_plan()
            .await
            .map_err(|err| {
                error!(db_error = ?err, "subscriptions: failed to count plan users");
                ReportingError::Upstream(err)
            })?;
        let catalog = self.load_plans().await?;

        let (mut active, mut cancelled, mut inactive) = (0, 0, 0);
        for (status, count) in by_status {
            match SubscriptionStatus::from_str(&status) {
                SubscriptionStatus::Active => active += count,
                SubscriptionStatus::Cancelled => cancelled += count,
                SubscriptionStatus::Inactive => inactive += count,
            }
        }

        let mut monthly_revenue_minor = 0;
        let plans = catalog
            .iter()
            .map(|plan| {
                let active_users = by_plan
                    .iter()
                    .filter(|(plan_id, _)| *plan_id == plan.id)
                    .map(|(_, count)| *count)
                    .sum::<i64>();
                let revenue = active_users * plan.monthly_price_minor;
                monthly_revenue_minor += revenue;

                PlanUsage {
                    plan_id: plan.id,
                    plan_name: plan.name.clone(),
                    active_users,
                    monthly_revenue: format_money(revenue),
                }
            })
            .collect();

        Ok(SubscriptionStats {
            active,
            cancelled,
            inactive,
            total: active + cancelled + inactive,
            plans,
            monthly_revenue: format_money(monthly_revenue_minor),
            annual_revenue: format_money(monthly_revenue_minor * 12),
        })
    }

    pub async fn list(
        &self,
        status: Option<SubscriptionStatus>,
        page: i64,
        page_size: i64,
    ) -> ReportingResult<SubscriptionPage> {
        validate_page(page, page_size, self.limits.max_page_size)?;

        let offset = page_offset(page, page_size)?;
        let (mut rows, total) = self.load_page(status, offset, page_size).await?;

        let meta = PageMeta::new(total, page, page_size);
        if meta.page != page && total > 0 {
            let (clamped, _) = self.load_page(status, meta.offset(), page_size).await?;
            rows = clamped;
        }

        let catalog = self.load_plans().await?;
        let entries = rows
            .into_iter()
            .map(|row| SubscriptionListItem {
                plan_name: catalog
                    .iter()
                    .find(|plan| Some(plan.id) == row.plan_id)
                    .map(|plan| plan.name.clone())
                    .unwrap_or_else(|| NO_PLAN_NAME.to_string()),
                status: SubscriptionStatus::from_str(&row.status),
                billing_period: BillingPeriod::from_str(&row.billing_period),
                id: row.id,
                user_id: row.user_id,
                start_date: row.starts_at,
                end_date: row.ends_at,
                auto_renew: row.auto_renew,
                updated_at: row.updated_at,
            })
            .collect();

        Ok(SubscriptionPage { entries, meta })
    }

    async fn load_page(
        &self,
        status: Option<SubscriptionStatus>,
        offset: i64,
        limit: i64,
    ) -> ReportingResult<(Vec<SubscriptionEntity>, i64)> {
        self.subscription_repo
            .find_subscriptions(status, offset, limit)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "subscriptions: failed to list subscriptions");
                ReportingError::Upstream(err)
            })
    }

    async fn load_subscription(&self, user_id: Uuid) -> ReportingResult<Option<SubscriptionEntity>> {
        self.subscription_repo
            .find_subscription(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: failed to load subscription");
                ReportingError::Upstream(err)
            })
    }

    async fn load_plans(&self) -> ReportingResult<Vec<PlanEntity>> {
        self.plan_repo.find_plans().await.map_err(|err| {
            error!(db_error = ?err, "subscriptions: failed to load plans");
            ReportingError::Upstream(err)
        })
    }
}

pub fn build_summary(
    subscription: Option<&SubscriptionEntity>,
    catalog: &[PlanEntity],
    total_spent_minor: i64,
    transaction_count: usize,
    now: DateTime<Utc>,
) -> SubscriptionSummary {
    let status = subscription
        .map(|sub| SubscriptionStatus::from_str(&sub.status))
        .unwrap_or_default();
    let starts_at = subscription.and_then(|sub| sub.starts_at);
    let ends_at = subscription.and_then(|sub| sub.ends_at);
    let date_text = |at: Option<DateTime<Utc>>| {
        at.map_or_else(|| NOT_AVAILABLE.to_string(), |at| at.format("%Y-%m-%d").to_string())
    };

    let next_payment = match status {
        SubscriptionStatus::Cancelled => NEXT_PAYMENT_CANCELLED.to_string(),
        SubscriptionStatus::Inactive => NEXT_PAYMENT_INACTIVE.to_string(),
        SubscriptionStatus::Active if total_spent_minor == 0 => NEXT_PAYMENT_FREE_PLAN.to_string(),
        SubscriptionStatus::Active => date_text(ends_at),
    };

    let plan_name = subscription
        .and_then(|sub| subscription_projector::resolve_plan(sub.plan_id, catalog).ok())
        .map_or_else(|| NO_PLAN_NAME.to_string(), |plan| plan.name.clone());

    SubscriptionSummary {
        status,
        plan_name,
        start_date: date_text(starts_at),
        end_date: date_text(ends_at),
        next_payment,
        total_spent: format_money(total_spent_minor),
        transaction_count,
        subscription_age_days: starts_at.map_or(0, |start| (now - start).num_days().max(0)),
        remaining_days: ends_at.map_or(0, |end| remaining_days(end, now)),
        auto_renew: subscription.is_some_and(|sub| sub.auto_renew),
    }
}
