use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::transactions::TransactionEntity,
    value_objects::{
        enums::{payment_methods::PaymentMethod, transaction_statuses::transaction_status_badge_class},
        pagination::PageMeta,
        plans::format_minor_units,
    },
};

/// Export and API shape of a transaction. Field names double as CSV column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub plan_name: String,
    pub amount: String,
    pub status: String,
    pub payment_method: String,
    pub payment_id: Option<String>,
    pub billing_period: String,
}

impl From<TransactionEntity> for TransactionRecord {
    fn from(value: TransactionEntity) -> Self {
        Self {
            transaction_id: value.id,
            created_at: value.created_at,
            user_id: value.user_id,
            plan_name: value.plan_name,
            amount: format_minor_units(value.amount_minor),
            status: value.status,
            payment_method: value.payment_method,
            payment_id: value.payment_id,
            billing_period: value.billing_period,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionView {
    #[serde(flatten)]
    pub record: TransactionRecord,
    pub payment_method_label: &'static str,
    pub status_badge: &'static str,
}

impl From<TransactionEntity> for TransactionView {
    fn from(value: TransactionEntity) -> Self {
        let payment_method_label = PaymentMethod::from_str(&value.payment_method).label();
        let status_badge = transaction_status_badge_class(&value.status);

        Self {
            record: value.into(),
            payment_method_label,
            status_badge,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionPage {
    pub entries: Vec<TransactionView>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

/// Totals over one time window as returned by the repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodTotals {
    pub transactions: i64,
    pub completed: i64,
    pub completed_amount_minor: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransactionStatusCounts {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
    pub failed: i64,
    pub refunded: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTransactions {
    pub total: i64,
    pub completed: i64,
    pub amount: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Growth {
    pub payments: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionStats {
    pub overall: TransactionStatusCounts,
    pub revenue: String,
    pub monthly: MonthlyTransactions,
    pub growth: Growth,
}

/// Percentage change, 0 when there is no previous value to compare with.
pub fn growth_percent(current: i64, previous: i64) -> f64 {
    if previous <= 0 {
        return 0.0;
    }
    ((current - previous) as f64 / previous as f64) * 100.0
}
