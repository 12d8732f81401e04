use chrono::{DateTime, Duration, DurationRound, NaiveDate, Timelike, Utc};
use serde::Serialize;

use crate::domain::value_objects::enums::log_levels::LogLevel;

pub const MAX_TRAILING_HOURS: u32 = 24 * 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineBucketing {
    /// 24 buckets, one per hour of the day, folded across dates.
    HourOfDay,
    /// One bucket per clock hour ending with the current hour.
    TrailingHours(u32),
    /// One bucket per calendar day between the first and last point.
    Daily,
}

/// Parallel series for the log timeline chart. All vectors always share one length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimelineChart {
    pub labels: Vec<String>,
    pub info_data: Vec<i64>,
    pub warning_data: Vec<i64>,
    pub error_data: Vec<i64>,
}

impl TimelineChart {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn with_labels(labels: Vec<String>) -> Self {
        let len = labels.len();
        Self {
            labels,
            info_data: vec![0; len],
            warning_data: vec![0; len],
            error_data: vec![0; len],
        }
    }

    fn record(&mut self, bucket: usize, level: LogLevel) {
        let series = match level {
            LogLevel::Info => &mut self.info_data,
            LogLevel::Warning => &mut self.warning_data,
            LogLevel::Error => &mut self.error_data,
            LogLevel::Debug => return,
        };
        if let Some(slot) = series.get_mut(bucket) {
            *slot += 1;
        }
    }

    pub fn build(
        points: &[(DateTime<Utc>, LogLevel)],
        bucketing: TimelineBucketing,
        now: DateTime<Utc>,
    ) -> Self {
        if points.is_empty() {
            return Self::empty();
        }

        match bucketing {
            TimelineBucketing::HourOfDay => {
                let labels = (0..24).map(|hour| format!("{hour:02}:00")).collect();
                let mut chart = Self::with_labels(labels);
                for (at, level) in points {
                    chart.record(at.hour() as usize, *level);
                }
                chart
            }
            TimelineBucketing::TrailingHours(hours) => {
                let hours = hours.clamp(1, MAX_TRAILING_HOURS) as i64;
                let current_hour = now
                    .duration_trunc(Duration::hours(1))
                    .unwrap_or(now);
                let first_hour = current_hour - Duration::hours(hours - 1);

                let labels = (0..hours)
                    .map(|offset| {
                        (first_hour + Duration::hours(offset))
                            .format("%Y-%m-%d %H:00")
                            .to_string()
                    })
                    .collect();
                let mut chart = Self::with_labels(labels);

                for (at, level) in points {
                    if *at < first_hour {
                        continue;
                    }
                    let bucket = (*at - first_hour).num_hours();
                    if bucket < hours {
                        chart.record(bucket as usize, *level);
                    }
                }
                chart
            }
            TimelineBucketing::Daily => {
                let first = points.iter().map(|(at, _)| at.date_naive()).min();
                let last = points.iter().map(|(at, _)| at.date_naive()).max();
                let (Some(first), Some(last)) = (first, last) else {
                    return Self::empty();
                };

                let labels = first
                    .iter_days()
                    .take_while(|day| *day <= last)
                    .map(|day| day.format("%Y-%m-%d").to_string())
                    .collect();
                let mut chart = Self::with_labels(labels);

                for (at, level) in points {
                    let bucket = days_between(first, at.date_naive());
                    chart.record(bucket as usize, *level);
                }
                chart
            }
        }
    }
}

fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 15, 0).unwrap()
    }

    fn assert_parallel(chart: &TimelineChart) {
        assert_eq!(chart.labels.len(), chart.info_data.len());
        assert_eq!(chart.labels.len(), chart.warning_data.len());
        assert_eq!(chart.labels.len(), chart.error_data.len());
    }

    #[test]
    fn no_points_means_empty_series_for_every_bucketing() {
        for bucketing in [
            TimelineBucketing::HourOfDay,
            TimelineBucketing::TrailingHours(24),
            TimelineBucketing::Daily,
        ] {
            let chart = TimelineChart::build(&[], bucketing, at(1, 0));
            assert!(chart.is_empty());
            assert_parallel(&chart);
            assert!(chart.info_data.is_empty());
        }
    }

    #[test]
    fn hour_of_day_folds_dates_together() {
        let points = vec![
            (at(1, 9), LogLevel::Info),
            (at(2, 9), LogLevel::Info),
            (at(2, 9), LogLevel::Error),
            (at(3, 23), LogLevel::Warning),
            (at(3, 23), LogLevel::Debug),
        ];

        let chart = TimelineChart::build(&points, TimelineBucketing::HourOfDay, at(3, 23));

        assert_parallel(&chart);
        assert_eq!(chart.labels.len(), 24);
        assert_eq!(chart.labels[9], "09:00");
        assert_eq!(chart.info_data[9], 2);
        assert_eq!(chart.error_data[9], 1);
        assert_eq!(chart.warning_data[23], 1);
        assert_eq!(chart.info_data.iter().sum::<i64>(), 2);
    }

    #[test]
    fn trailing_hours_ignores_points_outside_the_window() {
        let now = at(5, 12);
        let points = vec![
            (at(5, 12), LogLevel::Error),
            (at(5, 10), LogLevel::Info),
            (at(4, 1), LogLevel::Info),
        ];

        let chart = TimelineChart::build(&points, TimelineBucketing::TrailingHours(3), now);

        assert_parallel(&chart);
        assert_eq!(
            chart.labels,
            vec!["2025-03-05 10:00", "2025-03-05 11:00", "2025-03-05 12:00"]
        );
        assert_eq!(chart.info_data, vec![1, 0, 0]);
        assert_eq!(chart.error_data, vec![0, 0, 1]);
    }

    #[test]
    fn daily_spans_first_to_last_day() {
        let points = vec![(at(2, 8), LogLevel::Warning), (at(4, 8), LogLevel::Info)];

        let chart = TimelineChart::build(&points, TimelineBucketing::Daily, at(4, 9));

        assert_parallel(&chart);
        assert_eq!(chart.labels, vec!["2025-03-02", "2025-03-03", "2025-03-04"]);
        assert_eq!(chart.warning_data, vec![1, 0, 0]);
        assert_eq!(chart.info_data, vec![0, 0, 1]);
    }
}
