use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityType {
    AutoFarm,
    TroopTraining,
    Login,
    VillageUpdate,
    VillageExtract,
    ProfileUpdate,
    System,
    #[default]
    Other,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::AutoFarm => "auto-farm",
            ActivityType::TroopTraining => "troop-training",
            ActivityType::Login => "login",
            ActivityType::VillageUpdate => "village-update",
            ActivityType::VillageExtract => "village-extract",
            ActivityType::ProfileUpdate => "profile-update",
            ActivityType::System => "system",
            ActivityType::Other => "other",
        }
    }

    /// Unrecognized activity types collapse into `Other`.
    pub fn from_str(value: &str) -> Self {
        match value.trim() {
            "auto-farm" => ActivityType::AutoFarm,
            "troop-training" => ActivityType::TroopTraining,
            "login" => ActivityType::Login,
            "village-update" => ActivityType::VillageUpdate,
            "village-extract" => ActivityType::VillageExtract,
            "profile-update" => ActivityType::ProfileUpdate,
            "system" => ActivityType::System,
            _ => ActivityType::Other,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ActivityType::AutoFarm => "bi-arrow-repeat",
            ActivityType::TroopTraining => "bi-shield-fill",
            ActivityType::Login => "bi-box-arrow-in-right",
            ActivityType::VillageUpdate => "bi-house-gear",
            ActivityType::VillageExtract => "bi-download",
            ActivityType::ProfileUpdate => "bi-person-gear",
            ActivityType::System => "bi-gear",
            ActivityType::Other => "bi-activity",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityType::AutoFarm => "Auto Farm",
            ActivityType::TroopTraining => "Troop Training",
            ActivityType::Login => "Login",
            ActivityType::VillageUpdate => "Village Update",
            ActivityType::VillageExtract => "Village Extract",
            ActivityType::ProfileUpdate => "Profile Update",
            ActivityType::System => "System",
            ActivityType::Other => "Other",
        }
    }
}

impl Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
