use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::value_objects::{
    enums::{billing_periods::BillingPeriod, subscription_statuses::SubscriptionStatus},
    pagination::PageMeta,
    plans::{PlanSummary, PriceDisplay},
};

pub const NO_PLAN_NAME: &str = "None";
pub const SELECT_PLAN_CALL_TO_ACTION: &str = "Select a Plan";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanAction {
    Upgrade,
    Downgrade,
    Current,
    Subscribe,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureAvailability {
    pub key: &'static str,
    pub label: &'static str,
    pub included: bool,
    /// Only set for numeric limits (villages, tasks).
    pub limit: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanActionItem {
    pub plan_id: Uuid,
    pub plan_name: String,
    pub action: PlanAction,
}

/// Display-ready projection of a user's subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionViewModel {
    pub status: SubscriptionStatus,
    pub plan_name: String,
    pub plan: Option<PlanSummary>,
    pub billing_period: Option<BillingPeriod>,
    pub start_date: Option<DateTime<Utc>>,
    pub next_payment: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub remaining_days: Option<i64>,
    pub features: Vec<FeatureAvailability>,
    pub actions: Vec<PlanActionItem>,
    pub call_to_action: Option<&'static str>,
    pub show_plan_selector: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanCard {
    pub plan: PlanSummary,
    pub features: Vec<FeatureAvailability>,
    pub monthly: PriceDisplay,
    pub yearly: PriceDisplay,
    pub action: PlanAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionSummary {
    pub status: SubscriptionStatus,
    pub plan_name: String,
    pub start_date: String,
    pub end_date: String,
    pub next_payment: String,
    pub total_spent: String,
    pub transaction_count: usize,
    pub subscription_age_days: i64,
    pub remaining_days: i64,
    pub auto_renew: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanUsage {
    pub plan_id: Uuid,
    pub plan_name: String,
    pub active_users: i64,
    pub monthly_revenue: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionStats {
    pub active: i64,
    pub cancelled: i64,
    pub inactive: i64,
    pub total: i64,
    pub plans: Vec<PlanUsage>,
    pub monthly_revenue: String,
    pub annual_revenue: String,
}

/// One row of the admin subscription list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionListItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_name: String,
    pub status: SubscriptionStatus,
    pub billing_period: Option<BillingPeriod>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub auto_renew: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionPage {
    pub entries: Vec<SubscriptionListItem>,
    #[serde(flatten)]
    pub meta: PageMeta,
}
