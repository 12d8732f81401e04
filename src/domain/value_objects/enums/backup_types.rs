use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackupType {
    Full,
    Users,
    Transactions,
    Subscriptions,
}

impl BackupType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupType::Full => "full",
            BackupType::Users => "users",
            BackupType::Transactions => "transactions",
            BackupType::Subscriptions => "subscriptions",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "full" => Some(BackupType::Full),
            "users" => Some(BackupType::Users),
            "transactions" => Some(BackupType::Transactions),
            "subscriptions" => Some(BackupType::Subscriptions),
            _ => None,
        }
    }
}

impl Display for BackupType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
