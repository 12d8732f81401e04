use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::{
    errors::{ReportingError, ReportingResult},
    value_objects::{enums::date_range_presets::DateRangePreset, time_windows::TimeWindow},
};

/// Export range as selected on the admin screens. Custom bounds are only read for `custom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub preset: DateRangePreset,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn preset(preset: DateRangePreset) -> Self {
        Self {
            preset,
            start: None,
            end: None,
        }
    }

    pub fn custom(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            preset: DateRangePreset::Custom,
            start,
            end,
        }
    }

    pub fn window(&self, today: NaiveDate) -> ReportingResult<TimeWindow> {
        let days = |from: NaiveDate, to: NaiveDate| TimeWindow::from_dates(Some(from), Some(to));

        let window = match self.preset {
            DateRangePreset::Today => days(today, today),
            DateRangePreset::Yesterday => {
                let yesterday = today - Duration::days(1);
                days(yesterday, yesterday)
            }
            DateRangePreset::Last7Days => days(today - Duration::days(6), today),
            DateRangePreset::Last30Days => days(today - Duration::days(29), today),
            DateRangePreset::ThisMonth => days(first_of_month(today), today),
            DateRangePreset::LastMonth => {
                let last_day = first_of_month(today) - Duration::days(1);
                days(first_of_month(last_day), last_day)
            }
            DateRangePreset::All => TimeWindow::default(),
            DateRangePreset::Custom => {
                let (Some(start), Some(end)) = (self.start, self.end) else {
                    return Err(ReportingError::validation(
                        "date_range",
                        "custom range requires both start_date and end_date",
                    ));
                };
                if start > end {
                    return Err(ReportingError::validation(
                        "date_range",
                        "start_date must not be after end_date",
                    ));
                }
                days(start, end)
            }
        };

        Ok(window)
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.day0() as i64)
}
