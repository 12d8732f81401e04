use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

/// Half-open interval `[since, until)`. A missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn new(since: Option<DateTime<Utc>>, until: Option<DateTime<Utc>>) -> Self {
        Self { since, until }
    }

    /// `date_from` counts from midnight, `date_to` runs through the end of that day.
    pub fn from_dates(date_from: Option<NaiveDate>, date_to: Option<NaiveDate>) -> Self {
        Self {
            since: date_from.map(start_of_day),
            until: date_to.map(|date| start_of_day(date) + Duration::days(1)),
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.since.is_none_or(|since| at >= since) && self.until.is_none_or(|until| at < until)
    }

    pub fn intersect(&self, other: &TimeWindow) -> TimeWindow {
        let since = match (self.since, other.since) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        let until = match (self.until, other.until) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        TimeWindow { since, until }
    }
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn date_window_includes_the_whole_last_day() {
        let window = TimeWindow::from_dates(
            NaiveDate::from_ymd_opt(2025, 1, 1),
            NaiveDate::from_ymd_opt(2025, 1, 31),
        );

        let last_minute = Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 59).unwrap();
        let next_day = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let first_moment = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

        assert!(window.contains(first_moment));
        assert!(window.contains(last_minute));
        assert!(!window.contains(next_day));
    }

    #[test]
    fn intersect_keeps_the_tighter_bounds() {
        let a = TimeWindow::new(
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
            None,
        );
        let b = TimeWindow::new(
            Some(Utc.with_ymd_and_hms(2025, 1, 5, 0, 0, 0).unwrap()),
            Some(Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap()),
        );

        let merged = a.intersect(&b);
        assert_eq!(merged.since, b.since);
        assert_eq!(merged.until, b.until);
    }
}
