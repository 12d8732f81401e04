use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    entities::activity_logs::ActivityLogEntity,
    value_objects::{
        enums::{activity_statuses::activity_status_badge_class, activity_types::ActivityType},
        pagination::PageMeta,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityItem {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub activity_type: ActivityType,
    pub icon: &'static str,
    pub label: &'static str,
    pub details: String,
    pub village: Option<String>,
    pub status: String,
    pub badge_class: &'static str,
}

impl From<ActivityLogEntity> for ActivityItem {
    fn from(value: ActivityLogEntity) -> Self {
        let activity_type = ActivityType::from_str(&value.activity_type);
        let badge_class = activity_status_badge_class(&value.status);

        Self {
            id: value.id,
            timestamp: value.logged_at,
            activity_type,
            icon: activity_type.icon(),
            label: activity_type.label(),
            details: value.details,
            village: value.village,
            status: value.status,
            badge_class,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityPage {
    pub entries: Vec<ActivityItem>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivityStats {
    pub days: i64,
    pub total: i64,
    pub by_type: BTreeMap<String, i64>,
    pub by_status: BTreeMap<String, i64>,
}

/// One grouped row as counted by the database, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityCount {
    pub activity_type: String,
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrendGrouping {
    #[default]
    Day,
    Week,
    Month,
}

impl TrendGrouping {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            _ => None,
        }
    }

    pub fn period_label(&self, at: DateTime<Utc>) -> String {
        match self {
            Self::Day => at.format("%Y-%m-%d").to_string(),
            Self::Week => at.format("%G-W%V").to_string(),
            Self::Month => at.format("%Y-%m").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub period: String,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn period_labels_per_grouping() {
        let at = Utc.with_ymd_and_hms(2025, 1, 2, 10, 0, 0).unwrap();

        assert_eq!(TrendGrouping::Day.period_label(at), "2025-01-02");
        assert_eq!(TrendGrouping::Week.period_label(at), "2025-W01");
        assert_eq!(TrendGrouping::Month.period_label(at), "2025-01");
        assert_eq!(TrendGrouping::from_str("Week"), Some(TrendGrouping::Week));
        assert_eq!(TrendGrouping::from_str("year"), None);
    }

    #[test]
    fn unknown_activity_falls_back_to_defaults() {
        let item = ActivityItem::from(ActivityLogEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            logged_at: Utc::now(),
            activity_type: "gold-club".to_string(),
            details: "x".to_string(),
            village: None,
            status: "weird".to_string(),
        });

        assert_eq!(item.activity_type, ActivityType::Other);
        assert_eq!(item.icon, ActivityType::Other.icon());
        assert_eq!(item.badge_class, "bg-secondary");
    }
}
