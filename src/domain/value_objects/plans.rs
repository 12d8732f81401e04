use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_MAX_VILLAGES: i32 = 1;
pub const DEFAULT_MAX_TASKS: i32 = 1;

/// Feature flags stored in the `plans.features` JSON column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFeatures {
    #[serde(default)]
    pub auto_farm: bool,
    #[serde(default)]
    pub trainer: bool,
    #[serde(default)]
    pub advanced: bool,
    #[serde(default)]
    pub notification: bool,
    pub max_villages: Option<i32>,
    pub max_tasks: Option<i32>,
}

impl PlanFeatures {
    pub fn max_villages_or_default(&self) -> i32 {
        self.max_villages.unwrap_or(DEFAULT_MAX_VILLAGES)
    }

    pub fn max_tasks_or_default(&self) -> i32 {
        self.max_tasks.unwrap_or(DEFAULT_MAX_TASKS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearlySavings {
    pub percent: i64,
    /// Set when the monthly price is zero or the yearly price costs more than twelve months.
    pub mispriced: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceDisplay {
    pub price_text: String,
    pub save_badge: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub id: Uuid,
    pub name: String,
    pub monthly_price: String,
    pub yearly_price: String,
    pub yearly_savings: YearlySavings,
}

/// Renders minor currency units with two decimals, e.g. `1050` -> `"10.50"`.
pub fn format_minor_units(amount_minor: i64) -> String {
    let sign = if amount_minor < 0 { "-" } else { "" };
    let abs = amount_minor.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

pub fn format_money(amount_minor: i64) -> String {
    format!("${}", format_minor_units(amount_minor))
}
