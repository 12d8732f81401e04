use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::usecases::export_formatter,
    config::config_model::Reporting,
    domain::{
        entities::system_logs::LogEntry,
        errors::{ReportingError, ReportingResult},
        repositories::system_logs::SystemLogRepository,
        value_objects::{
            date_ranges::DateRange,
            enums::export_formats::{LogExportFormat, ReportFormat},
            exports::ExportPayload,
            log_filters::LogFilters,
            pagination::PageMeta,
            system_logs::{LogEntryView, LogListView, LogPage, LogStats, PurgeOutcome},
            time_windows::TimeWindow,
            timeline::{TimelineBucketing, TimelineChart},
        },
    },
};

pub const MIN_RETENTION_DAYS: i64 = 1;
pub const MAX_RETENTION_DAYS: i64 = 365;
const EXPORT_BASE_NAME: &str = "system_logs";
const REPORT_BASE_NAME: &str = "system_logs_report";

pub struct LogQueryUseCase<R>
where
    R: SystemLogRepository + Send + Sync + 'static,
{
    log_repo: Arc<R>,
    limits: Reporting,
}

impl<R> LogQueryUseCase<R>
where
    R: SystemLogRepository + Send + Sync + 'static,
{
    pub fn new(log_repo: Arc<R>, limits: Reporting) -> Self {
        Self { log_repo, limits }
    }

    pub fn default_page_size(&self) -> i64 {
        self.limits.default_page_size
    }

    pub async fn query(
        &self,
        filters: LogFilters,
        page: i64,
        page_size: i64,
    ) -> ReportingResult<LogPage> {
        validate_page(page, page_size, self.limits.max_page_size)?;

        let offset = page_offset(page, page_size)?;
        let (mut entries, total) = self
            .log_repo
            .find_logs(filters.clone(), offset, page_size)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "log_query: failed to load logs");
                ReportingError::Upstream(err)
            })?;

        let meta = PageMeta::new(total, page, page_size);

        if meta.page != page && total > 0 {
            info!(
                requested_page = page,
                page = meta.page,
                "log_query: page beyond the end, clamped to last page"
            );
            let (clamped_entries, _) = self
                .log_repo
                .find_logs(filters, meta.offset(), page_size)
                .await
                .map_err(|err| {
                    error!(db_error = ?err, "log_query: failed to load clamped page");
                    ReportingError::Upstream(err)
                })?;
            entries = clamped_entries;
        }

        sort_newest_first(&mut entries);

        Ok(LogPage { entries, meta })
    }

    pub async fn detail(&self, id: Uuid) -> ReportingResult<LogEntryView> {
        let entry = self
            .log_repo
            .find_log(id)
            .await
            .map_err(|err| {
                error!(%id, db_error = ?err, "log_query: failed to load log entry");
                ReportingError::Upstream(err)
            })?;

        entry
            .map(LogEntryView::from)
            .ok_or_else(|| ReportingError::NotFound(format!("log {id}")))
    }

    pub async fn aggregate_stats(&self, filters: LogFilters) -> ReportingResult<LogStats> {
        let total = self
            .log_repo
            .count_logs(filters.clone())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "log_query: failed to count logs");
                ReportingError::Upstream(err)
            })?;

        let counts = self
            .log_repo
            .count_by_level(filters)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "log_query: failed to count logs by level");
                ReportingError::Upstream(err)
            })?;

        Ok(LogStats::from_counts(total, counts))
    }

    /// Never fails: a broken series is logged and rendered as an empty chart.
    pub async fn timeline_series(
        &self,
        filters: LogFilters,
        bucketing: TimelineBucketing,
        now: DateTime<Utc>,
    ) -> TimelineChart {
        let filters = match bucketing {
            TimelineBucketing::TrailingHours(hours) => {
                let since = now - Duration::hours(i64::from(hours));
                filters.narrowed_to(&TimeWindow::new(Some(since), None))
            }
            TimelineBucketing::HourOfDay | TimelineBucketing::Daily => filters,
        };

        match self
            .log_repo
            .list_level_points(filters, self.limits.timeline_point_limit)
            .await
        {
            Ok(points) => TimelineChart::build(&points, bucketing, now),
            Err(err) => {
                warn!(db_error = ?err, "log_query: timeline unavailable, rendering empty chart");
                TimelineChart::empty()
            }
        }
    }

    pub async fn list_view(
        &self,
        filters: LogFilters,
        page: i64,
        page_size: i64,
        bucketing: TimelineBucketing,
        now: DateTime<Utc>,
    ) -> ReportingResult<LogListView> {
        let page = self.query(filters.clone(), page, page_size).await?;
        let stats = self.aggregate_stats(filters.clone()).await?;
        let chart = self.timeline_series(filters, bucketing, now).await;

        Ok(LogListView {
            entries: page.entries.into_iter().map(LogEntryView::from).collect(),
            meta: page.meta,
            stats,
            chart,
        })
    }

    pub async fn purge_older_than(
        &self,
        retention_days: i64,
        now: DateTime<Utc>,
    ) -> ReportingResult<PurgeOutcome> {
        if !(MIN_RETENTION_DAYS..=MAX_RETENTION_DAYS).contains(&retention_days) {
            return Err(ReportingError::validation(
                "days",
                format!(
                    "retention must be between {MIN_RETENTION_DAYS} and {MAX_RETENTION_DAYS} days"
                ),
            ));
        }

        let cutoff = now - Duration::days(retention_days);
        let deleted = self
            .log_repo
            .delete_older_than(cutoff)
            .await
            .map_err(|err| {
                error!(%cutoff, db_error = ?err, "log_query: failed to purge logs");
                ReportingError::Upstream(err)
            })?;

        info!(retention_days, deleted, %cutoff, "log_query: purged old logs");

        Ok(PurgeOutcome {
            retention_days,
            deleted,
        })
    }

    pub async fn export_formatted(
        &self,
        filters: LogFilters,
        range: DateRange,
        format: LogExportFormat,
        now: DateTime<Utc>,
    ) -> ReportingResult<ExportPayload> {
        let entries = self.bounded_entries(filters, range, now).await?;
        info!(rows = entries.len(), %format, "log_query: exporting logs");
        export_formatter::format_records(&entries, format, EXPORT_BASE_NAME, now)
    }

    pub async fn report(
        &self,
        range: DateRange,
        format: ReportFormat,
        now: DateTime<Utc>,
    ) -> ReportingResult<ExportPayload> {
        if format == ReportFormat::Pdf {
            return Err(ReportingError::Unsupported("pdf report"));
        }
        let entries = self
            .bounded_entries(LogFilters::default(), range, now)
            .await?;
        export_formatter::format_report(&entries, format, REPORT_BASE_NAME, now)
    }

    async fn bounded_entries(
        &self,
        filters: LogFilters,
        range: DateRange,
        now: DateTime<Utc>,
    ) -> ReportingResult<Vec<LogEntry>> {
        let window = range.window(now.date_naive())?;
        let filters = filters.narrowed_to(&window);

        let matching = self
            .log_repo
            .count_logs(filters.clone())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "log_query: failed to count logs for export");
                ReportingError::Upstream(err)
            })?;

        check_export_size(matching, self.limits.export_row_limit)?;

        let mut entries = self
            .log_repo
            .list_logs(filters, self.limits.export_row_limit)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "log_query: failed to load logs for export");
                ReportingError::Upstream(err)
            })?;
        sort_newest_first(&mut entries);

        Ok(entries)
    }
}

pub fn validate_page(page: i64, page_size: i64, max_page_size: i64) -> ReportingResult<()> {
    if page < 1 {
        return Err(ReportingError::validation("page", "page must be at least 1"));
    }
    if page_size < 1 || page_size > max_page_size {
        return Err(ReportingError::validation(
            "page_size",
            format!("page_size must be between 1 and {max_page_size}"),
        ));
    }
    Ok(())
}

/// Row offset of a 1-based page. Pages too far out to address are rejected.
pub fn page_offset(page: i64, page_size: i64) -> ReportingResult<i64> {
    (page - 1)
        .checked_mul(page_size)
        .ok_or_else(|| ReportingError::validation("page", "page is out of range"))
}

pub fn check_export_size(matching: i64, row_limit: i64) -> ReportingResult<()> {
    if matching > row_limit {
        return Err(ReportingError::validation(
            "range",
            format!(
                "{matching} rows match, more than the export limit of {row_limit}; narrow the filter"
            ),
        ));
    }
    Ok(())
}

pub fn sort_newest_first(entries: &mut [LogEntry]) {
    entries.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        repositories::system_logs::MockSystemLogRepository,
        value_objects::{
            enums::{date_range_presets::DateRangePreset, log_levels::LogLevel},
            system_logs::LevelCounts,
        },
    };
    use chrono::{NaiveDate, TimeZone};
    use mockall::predicate::{always, eq};
    use std::sync::Mutex;

    fn limits() -> Reporting {
        Reporting::default()
    }

    fn entry(level: LogLevel, at: DateTime<Utc>) -> LogEntry {
        LogEntry {
            id: Uuid::new_v4(),
            timestamp: at,
            level,
            user: "alice".to_string(),
            action: "Task".to_string(),
            ip_address: None,
            details: String::new(),
            stack_trace: None,
            category: None,
        }
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, d, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn error_filter_over_january_returns_only_matching_page() {
        let filters = LogFilters {
            level: Some(LogLevel::Error),
            window: TimeWindow::from_dates(
                NaiveDate::from_ymd_opt(2025, 1, 1),
                NaiveDate::from_ymd_opt(2025, 1, 31),
            ),
            ..LogFilters::default()
        };

        let stored = vec![
            entry(LogLevel::Error, day(3)),
            entry(LogLevel::Info, day(4)),
            entry(LogLevel::Error, day(20)),
            entry(LogLevel::Error, Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()),
        ];

        let mut repo = MockSystemLogRepository::new();
        repo.expect_find_logs()
            .with(eq(filters.clone()), eq(0), eq(20))
            .times(1)
            .returning(move |filters, _, limit| {
                let matching: Vec<LogEntry> = stored
                    .iter()
                    .filter(|entry| filters.matches(entry))
                    .cloned()
                    .collect();
                let total = matching.len() as i64;
                Ok((matching.into_iter().take(limit as usize).collect(), total))
            });

        let usecase = LogQueryUseCase::new(Arc::new(repo), limits());
        let page = usecase.query(filters, 1, 20).await.unwrap();

        assert_eq!(page.meta.total, 2);
        assert_eq!(page.meta.total_pages, 1);
        assert!(page.entries.iter().all(|e| e.level == LogLevel::Error));
        assert_eq!(page.entries[0].timestamp, day(20));
        assert_eq!(page.entries[1].timestamp, day(3));
    }

    #[tokio::test]
    async fn empty_log_set_is_not_an_error() {
        let mut repo = MockSystemLogRepository::new();
        repo.expect_find_logs()
            .times(1)
            .returning(|_, _, _| Ok((vec![], 0)));

        let usecase = LogQueryUseCase::new(Arc::new(repo), limits());
        let page = usecase.query(LogFilters::default(), 1, 20).await.unwrap();

        assert!(page.entries.is_empty());
        assert_eq!(page.meta.total, 0);
        assert_eq!(page.meta.total_pages, 0);
        assert_eq!(page.meta.page, 1);
    }

    #[tokio::test]
    async fn page_past_the_end_is_clamped_and_refetched() {
        let mut repo = MockSystemLogRepository::new();
        repo.expect_find_logs()
            .with(always(), eq(180), eq(20))
            .times(1)
            .returning(|_, _, _| Ok((vec![], 45)));
        repo.expect_find_logs()
            .with(always(), eq(40), eq(20))
            .times(1)
            .returning(|_, _, _| {
                Ok((
                    (0..5).map(|d| entry(LogLevel::Info, day(d + 1))).collect(),
                    45,
                ))
            });

        let usecase = LogQueryUseCase::new(Arc::new(repo), limits());
        let page = usecase.query(LogFilters::default(), 10, 20).await.unwrap();

        assert_eq!(page.meta.page, 3);
        assert_eq!(page.meta.total_pages, 3);
        assert_eq!(page.entries.len(), 5);
        assert!(
            page.entries
                .windows(2)
                .all(|pair| pair[0].timestamp >= pair[1].timestamp)
        );
    }

    #[tokio::test]
    async fn invalid_paging_is_rejected_before_querying() {
        let repo = MockSystemLogRepository::new();
        let usecase = LogQueryUseCase::new(Arc::new(repo), limits());

        for (page, size) in [(0, 20), (1, 0), (1, 101), (-3, 20)] {
            let result = usecase.query(LogFilters::default(), page, size).await;
            assert!(matches!(result, Err(ReportingError::Validation { .. })));
        }
    }

    #[tokio::test]
    async fn unaddressable_page_is_rejected_without_querying() {
        let mut repo = MockSystemLogRepository::new();
        repo.expect_find_logs().never();

        let usecase = LogQueryUseCase::new(Arc::new(repo), limits());
        let result = usecase.query(LogFilters::default(), i64::MAX, 20).await;

        assert!(matches!(
            result,
            Err(ReportingError::Validation { field: "page", .. })
        ));
    }

    #[test]
    fn page_offset_is_checked() {
        assert_eq!(page_offset(1, 20).unwrap(), 0);
        assert_eq!(page_offset(3, 20).unwrap(), 40);
        assert!(page_offset(i64::MAX, 2).is_err());
    }

    #[tokio::test]
    async fn detail_returns_the_entry_with_its_badge() {
        let stored = entry(LogLevel::Warning, day(2));
        let id = stored.id;

        let mut repo = MockSystemLogRepository::new();
        repo.expect_find_log()
            .with(eq(id))
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let usecase = LogQueryUseCase::new(Arc::new(repo), limits());
        let view = usecase.detail(id).await.unwrap();

        assert_eq!(view.entry.id, id);
        assert_eq!(view.badge_class, "bg-warning");
    }

    #[tokio::test]
    async fn detail_of_a_missing_entry_is_not_found() {
        let mut repo = MockSystemLogRepository::new();
        repo.expect_find_log().returning(|_| Ok(None));

        let usecase = LogQueryUseCase::new(Arc::new(repo), limits());
        let result = usecase.detail(Uuid::new_v4()).await;

        assert!(matches!(result, Err(ReportingError::NotFound(_))));
    }

    #[tokio::test]
    async fn stats_total_equals_sum_of_buckets() {
        let mut repo = MockSystemLogRepository::new();
        repo.expect_count_logs().returning(|_| Ok(12));
        repo.expect_count_by_level().returning(|_| {
            Ok(LevelCounts {
                info: 6,
                warning: 2,
                error: 2,
                debug: 1,
            })
        });

        let usecase = LogQueryUseCase::new(Arc::new(repo), limits());
        let stats = usecase
            .aggregate_stats(LogFilters::default())
            .await
            .unwrap();

        assert_eq!(stats.other, 1);
        assert_eq!(
            stats.total,
            stats.info + stats.warning + stats.error + stats.debug + stats.other
        );
    }

    #[tokio::test]
    async fn timeline_failure_degrades_to_empty_series() {
        let mut repo = MockSystemLogRepository::new();
        repo.expect_list_level_points()
            .returning(|_, _| Err(anyhow::anyhow!("connection reset")));

        let usecase = LogQueryUseCase::new(Arc::new(repo), limits());
        let chart = usecase
            .timeline_series(LogFilters::default(), TimelineBucketing::HourOfDay, day(5))
            .await;

        assert!(chart.is_empty());
        assert!(chart.info_data.is_empty());
        assert!(chart.warning_data.is_empty());
        assert!(chart.error_data.is_empty());
    }

    #[tokio::test]
    async fn trailing_hours_narrows_the_query_window() {
        let now = day(5);
        let mut repo = MockSystemLogRepository::new();
        repo.expect_list_level_points()
            .withf(move |filters, limit| {
                filters.window.since == Some(now - Duration::hours(24)) && *limit == 50_000
            })
            .returning(move |_, _| Ok(vec![(now, LogLevel::Warning)]));

        let usecase = LogQueryUseCase::new(Arc::new(repo), limits());
        let chart = usecase
            .timeline_series(LogFilters::default(), TimelineBucketing::TrailingHours(24), now)
            .await;

        assert_eq!(chart.labels.len(), 24);
        assert_eq!(chart.warning_data.iter().sum::<i64>(), 1);
    }

    #[tokio::test]
    async fn purge_twice_deletes_nothing_the_second_time() {
        let now = day(31);
        let store = Arc::new(Mutex::new(vec![
            entry(LogLevel::Info, Utc.with_ymd_and_hms(2024, 11, 1, 0, 0, 0).unwrap()),
            entry(LogLevel::Error, Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap()),
            entry(LogLevel::Info, day(20)),
        ]));

        let mut repo = MockSystemLogRepository::new();
        let shared = Arc::clone(&store);
        repo.expect_delete_older_than().returning(move |cutoff| {
            let mut rows = shared.lock().unwrap();
            let before = rows.len();
            rows.retain(|entry| entry.timestamp >= cutoff);
            Ok(before - rows.len())
        });

        let usecase = LogQueryUseCase::new(Arc::new(repo), limits());

        let first = usecase.purge_older_than(30, now).await.unwrap();
        let second = usecase.purge_older_than(30, now).await.unwrap();

        assert_eq!(first.deleted, 2);
        assert_eq!(second.deleted, 0);
        assert_eq!(store.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn purge_rejects_out_of_range_retention() {
        let usecase = LogQueryUseCase::new(Arc::new(MockSystemLogRepository::new()), limits());

        for days in [0, -1, 366] {
            let result = usecase.purge_older_than(days, day(1)).await;
            assert!(matches!(
                result,
                Err(ReportingError::Validation { field: "days", .. })
            ));
        }
    }

    #[tokio::test]
    async fn export_over_the_row_limit_is_rejected() {
        let mut repo = MockSystemLogRepository::new();
        repo.expect_count_logs().returning(|_| Ok(10_001));
        repo.expect_list_logs().never();

        let usecase = LogQueryUseCase::new(Arc::new(repo), limits());
        let result = usecase
            .export_formatted(
                LogFilters::default(),
                DateRange::preset(DateRangePreset::All),
                LogExportFormat::Csv,
                day(1),
            )
            .await;

        assert!(matches!(
            result,
            Err(ReportingError::Validation { field: "range", .. })
        ));
    }

    #[tokio::test]
    async fn custom_export_without_end_date_is_rejected() {
        let usecase = LogQueryUseCase::new(Arc::new(MockSystemLogRepository::new()), limits());

        let result = usecase
            .export_formatted(
                LogFilters::default(),
                DateRange::custom(NaiveDate::from_ymd_opt(2025, 1, 1), None),
                LogExportFormat::Json,
                day(1),
            )
            .await;

        assert!(matches!(result, Err(ReportingError::Validation { .. })));
    }

    #[tokio::test]
    async fn export_uses_the_preset_window() {
        let now = day(15);
        let mut repo = MockSystemLogRepository::new();
        repo.expect_count_logs()
            .withf(move |filters| {
                filters.window.since == Some(Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap())
            })
            .returning(|_| Ok(1));
        repo.expect_list_logs()
            .with(always(), eq(10_000))
            .returning(move |_, _| Ok(vec![entry(LogLevel::Info, now)]));

        let usecase = LogQueryUseCase::new(Arc::new(repo), limits());
        let payload = usecase
            .export_formatted(
                LogFilters::default(),
                DateRange::preset(DateRangePreset::Today),
                LogExportFormat::Txt,
                now,
            )
            .await
            .unwrap();

        assert_eq!(payload.content_type, "text/plain; charset=utf-8");
        assert_eq!(String::from_utf8(payload.bytes).unwrap().lines().count(), 1);
    }
}
