//! Raw query strings are parsed here so malformed input becomes a field-level 400.

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{
    errors::{ReportingError, ReportingResult},
    value_objects::{
        date_ranges::DateRange,
        enums::{
            date_range_presets::DateRangePreset,
            export_formats::{LogExportFormat, ReportFormat},
            log_levels::LogLevel,
            transaction_statuses::TransactionStatus,
        },
        log_filters::LogFilters,
        time_windows::TimeWindow,
        timeline::{MAX_TRAILING_HOURS, TimelineBucketing},
        transaction_filters::TransactionFilters,
    },
};

pub const DEFAULT_TRAILING_HOURS: u32 = 24;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl PageQuery {
    pub fn resolve(&self, default_page_size: i64) -> ReportingResult<(i64, i64)> {
        let page = parse_number("page", self.page.as_deref())?.unwrap_or(1);
        let page_size = parse_number("page_size", self.page_size.as_deref())?
            .unwrap_or(default_page_size);
        Ok((page, page_size))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LogFilterQuery {
    pub level: Option<String>,
    pub user: Option<String>,
    pub category: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl LogFilterQuery {
    pub fn to_filters(&self) -> ReportingResult<LogFilters> {
        let level = match non_empty(self.level.as_deref()) {
            Some(raw) => Some(LogLevel::from_str(raw).ok_or_else(|| {
                ReportingError::validation("level", format!("unknown log level `{raw}`"))
            })?),
            None => None,
        };

        Ok(LogFilters {
            level,
            user: non_empty(self.user.as_deref()).map(str::to_string),
            category: non_empty(self.category.as_deref()).map(str::to_string),
            window: parse_window(self.date_from.as_deref(), self.date_to.as_deref())?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TimelineQuery {
    pub bucket: Option<String>,
    pub hours: Option<String>,
}

impl TimelineQuery {
    pub fn bucketing(&self) -> ReportingResult<TimelineBucketing> {
        match non_empty(self.bucket.as_deref()).map(str::to_ascii_lowercase).as_deref() {
            None | Some("trailing_hours") => {
                let hours = parse_number("hours", self.hours.as_deref())?
                    .unwrap_or(i64::from(DEFAULT_TRAILING_HOURS));
                if !(1..=i64::from(MAX_TRAILING_HOURS)).contains(&hours) {
                    return Err(ReportingError::validation(
                        "hours",
                        format!("hours must be between 1 and {MAX_TRAILING_HOURS}"),
                    ));
                }
                Ok(TimelineBucketing::TrailingHours(hours as u32))
            }
            Some("hour_of_day") => Ok(TimelineBucketing::HourOfDay),
            Some("daily") => Ok(TimelineBucketing::Daily),
            Some(other) => Err(ReportingError::validation(
                "bucket",
                format!("unknown bucket `{other}`, expected hour_of_day, trailing_hours or daily"),
            )),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub range: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl RangeQuery {
    pub fn to_range(&self) -> ReportingResult<DateRange> {
        let preset = match non_empty(self.range.as_deref()) {
            Some(raw) => DateRangePreset::from_str(raw).ok_or_else(|| {
                ReportingError::validation("range", format!("unknown date range `{raw}`"))
            })?,
            None => DateRangePreset::All,
        };

        Ok(DateRange {
            preset,
            start: parse_date("start_date", self.start_date.as_deref())?,
            end: parse_date("end_date", self.end_date.as_deref())?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FormatQuery {
    pub format: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TransactionFilterQuery {
    pub status: Option<String>,
    pub user_id: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl TransactionFilterQuery {
    pub fn to_filters(&self) -> ReportingResult<TransactionFilters> {
        let status = match non_empty(self.status.as_deref()) {
            Some(raw) => Some(TransactionStatus::from_str(raw).ok_or_else(|| {
                ReportingError::validation("status", format!("unknown transaction status `{raw}`"))
            })?),
            None => None,
        };
        let user_id = match non_empty(self.user_id.as_deref()) {
            Some(raw) => Some(Uuid::parse_str(raw).map_err(|_| {
                ReportingError::validation("user_id", format!("`{raw}` is not a valid id"))
            })?),
            None => None,
        };

        Ok(TransactionFilters {
            status,
            user_id,
            window: parse_window(self.date_from.as_deref(), self.date_to.as_deref())?,
        })
    }
}

pub fn parse_log_export_format(raw: Option<&str>) -> ReportingResult<LogExportFormat> {
    let raw = non_empty(raw).unwrap_or("csv");
    LogExportFormat::from_str(raw).ok_or_else(|| {
        ReportingError::validation("format", format!("unsupported export format `{raw}`"))
    })
}

pub fn parse_report_format(raw: Option<&str>) -> ReportingResult<ReportFormat> {
    let raw = non_empty(raw).unwrap_or("csv");
    ReportFormat::from_str(raw).ok_or_else(|| {
        ReportingError::validation("format", format!("unsupported report format `{raw}`"))
    })
}

pub fn parse_number(field: &'static str, raw: Option<&str>) -> ReportingResult<Option<i64>> {
    match non_empty(raw) {
        Some(raw) => raw
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ReportingError::validation(field, format!("`{raw}` is not a number"))),
        None => Ok(None),
    }
}

pub fn parse_date(field: &'static str, raw: Option<&str>) -> ReportingResult<Option<NaiveDate>> {
    match non_empty(raw) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ReportingError::validation(field, format!("`{raw}` is not a YYYY-MM-DD date"))),
        None => Ok(None),
    }
}

fn parse_window(date_from: Option<&str>, date_to: Option<&str>) -> ReportingResult<TimeWindow> {
    let from = parse_date("date_from", date_from)?;
    let to = parse_date("date_to", date_to)?;

    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(ReportingError::validation(
                "date_from",
                "date_from must not be after date_to",
            ));
        }
    }

    Ok(TimeWindow::from_dates(from, to))
}

pub fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}
