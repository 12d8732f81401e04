use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRangePreset {
    Today,
    Yesterday,
    Last7Days,
    Last30Days,
    ThisMonth,
    LastMonth,
    All,
    Custom,
}

impl DateRangePreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateRangePreset::Today => "today",
            DateRangePreset::Yesterday => "yesterday",
            DateRangePreset::Last7Days => "last7days",
            DateRangePreset::Last30Days => "last30days",
            DateRangePreset::ThisMonth => "thisMonth",
            DateRangePreset::LastMonth => "lastMonth",
            DateRangePreset::All => "all",
            DateRangePreset::Custom => "custom",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "today" => Some(DateRangePreset::Today),
            "yesterday" => Some(DateRangePreset::Yesterday),
            "last7days" => Some(DateRangePreset::Last7Days),
            "last30days" => Some(DateRangePreset::Last30Days),
            "thismonth" => Some(DateRangePreset::ThisMonth),
            "lastmonth" => Some(DateRangePreset::LastMonth),
            "all" => Some(DateRangePreset::All),
            "custom" => Some(DateRangePreset::Custom),
            _ => None,
        }
    }
}

impl Display for DateRangePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
