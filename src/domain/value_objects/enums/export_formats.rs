use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Download formats offered on the log and transaction screens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogExportFormat {
    Csv,
    Json,
    Txt,
}

impl LogExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogExportFormat::Csv => "csv",
            LogExportFormat::Json => "json",
            LogExportFormat::Txt => "txt",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(LogExportFormat::Csv),
            "json" => Some(LogExportFormat::Json),
            "txt" | "text" => Some(LogExportFormat::Txt),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            LogExportFormat::Csv => "text/csv; charset=utf-8",
            LogExportFormat::Json => "application/json",
            LogExportFormat::Txt => "text/plain; charset=utf-8",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl Display for LogExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats offered for system reports. Kept apart from [`LogExportFormat`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Pdf,
    Csv,
    Excel,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Csv => "csv",
            ReportFormat::Excel => "excel",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pdf" => Some(ReportFormat::Pdf),
            "csv" => Some(ReportFormat::Csv),
            "excel" | "xls" => Some(ReportFormat::Excel),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "application/pdf",
            ReportFormat::Csv => "text/csv; charset=utf-8",
            ReportFormat::Excel => "application/vnd.ms-excel",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Csv => "csv",
            ReportFormat::Excel => "xls",
        }
    }
}

impl Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
