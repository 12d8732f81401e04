use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
    #[default]
    Inactive,
}

impl Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::Inactive => "inactive",
        };
        write!(f, "{}", status)
    }
}

impl SubscriptionStatus {
    /// Lenient read of a stored status; anything unrecognized is `Inactive`.
    pub fn from_str(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }

    /// Strict parse for user input.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Some(SubscriptionStatus::Active),
            "cancelled" | "canceled" => Some(SubscriptionStatus::Cancelled),
            "inactive" => Some(SubscriptionStatus::Inactive),
            _ => None,
        }
    }

    pub fn stored_spellings(&self) -> &'static [&'static str] {
        match self {
            SubscriptionStatus::Active => &["active"],
            SubscriptionStatus::Cancelled => &["cancelled", "canceled"],
            SubscriptionStatus::Inactive => &["inactive"],
        }
    }
}
