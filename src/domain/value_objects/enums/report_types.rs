use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    Logs,
    Transactions,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Logs => "logs",
            ReportType::Transactions => "transactions",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "logs" | "system_logs" => Some(ReportType::Logs),
            "transactions" => Some(ReportType::Transactions),
            _ => None,
        }
    }
}

impl Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
