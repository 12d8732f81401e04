use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::log_levels::FALLBACK_BADGE_CLASS;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
    Pending,
    Failed,
    Refunded,
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 4] = [
        TransactionStatus::Completed,
        TransactionStatus::Pending,
        TransactionStatus::Failed,
        TransactionStatus::Refunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "completed",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Refunded => "refunded",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "completed" => Some(TransactionStatus::Completed),
            "pending" => Some(TransactionStatus::Pending),
            "failed" => Some(TransactionStatus::Failed),
            "refunded" => Some(TransactionStatus::Refunded),
            _ => None,
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "bg-success",
            TransactionStatus::Pending => "bg-warning",
            TransactionStatus::Failed => "bg-danger",
            TransactionStatus::Refunded => "bg-info",
        }
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn transaction_status_badge_class(raw: &str) -> &'static str {
    TransactionStatus::from_str(raw)
        .map(|status| status.badge_class())
        .unwrap_or(FALLBACK_BADGE_CLASS)
}
