use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use tracing::{error, warn};
use uuid::Uuid;

use crate::{
    application::usecases::log_query::{page_offset, validate_page},
    config::config_model::Reporting,
    domain::{
        errors::{ReportingError, ReportingResult},
        repositories::activity_logs::ActivityLogRepository,
        value_objects::{
            activity_filters::ActivityFilters,
            activity_logs::{ActivityPage, ActivityStats, TrendGrouping, TrendPoint},
            enums::activity_types::ActivityType,
            pagination::PageMeta,
        },
    },
};

pub const MAX_ACTIVITY_WINDOW_DAYS: i64 = 365;

pub struct ActivityLogUseCase<A>
where
    A: ActivityLogRepository + Send + Sync + 'static,
{
    activity_repo: Arc<A>,
    limits: Reporting,
}

impl<A> ActivityLogUseCase<A>
where
    A: ActivityLogRepository + Send + Sync + 'static,
{
    pub fn new(activity_repo: Arc<A>, limits: Reporting) -> Self {
        Self {
            activity_repo,
            limits,
        }
    }

    pub fn default_page_size(&self) -> i64 {
        self.limits.default_page_size
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        filters: ActivityFilters,
        page: i64,
        page_size: i64,
    ) -> ReportingResult<ActivityPage> {
        validate_page(page, page_size, self.limits.max_page_size)?;

        let offset = page_offset(page, page_size)?;
        let (mut rows, total) = self
            .activity_repo
            .find_user_activity(user_id, filters.clone(), offset, page_size)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "activity_logs: failed to load activity");
                ReportingError::Upstream(err)
            })?;

        let meta = PageMeta::new(total, page, page_size);
        if meta.page != page && total > 0 {
            let (clamped, _) = self
                .activity_repo
                .find_user_activity(user_id, filters, meta.offset(), page_size)
                .await
                .map_err(|err| {
                    error!(%user_id, db_error = ?err, "activity_logs: failed to load clamped page");
                    ReportingError::Upstream(err)
                })?;
            rows = clamped;
        }

        rows.sort_by(|a, b| b.logged_at.cmp(&a.logged_at).then_with(|| b.id.cmp(&a.id)));

        Ok(ActivityPage {
            entries: rows.into_iter().map(Into::into).collect(),
            meta,
        })
    }

    pub async fn stats(
        &self,
        user_id: Uuid,
        days: i64,
        now: DateTime<Utc>,
    ) -> ReportingResult<ActivityStats> {
        let since = window_start(days, now)?;
        let counts = self
            .activity_repo
            .count_user_activity_since(user_id, since)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "activity_logs: failed to count activity");
                ReportingError::Upstream(err)
            })?;

        let mut stats = ActivityStats {
            days,
            ..ActivityStats::default()
        };
        for row in counts {
            stats.total += row.count;
            let kind = ActivityType::from_str(&row.activity_type);
            *stats.by_type.entry(kind.as_str().to_string()).or_default() += row.count;
            *stats
                .by_status
                .entry(row.status.trim().to_ascii_lowercase())
                .or_default() += row.count;
        }

        Ok(stats)
    }

    /// Buckets the newest `timeline_point_limit` events; older ones past the cap are left out.
    pub async fn trends(
        &self,
        user_id: Uuid,
        days: i64,
        grouping: TrendGrouping,
        now: DateTime<Utc>,
    ) -> ReportingResult<Vec<TrendPoint>> {
        let since = window_start(days, now)?;
        let limit = self.limits.timeline_point_limit;
        let times = self
            .activity_repo
            .list_user_activity_times(user_id, since, limit)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "activity_logs: failed to load activity times");
                ReportingError::Upstream(err)
            })?;

        if times.len() as i64 >= limit {
            warn!(%user_id, days, limit, "activity_logs: trend input hit the point cap");
        }

        let mut buckets: BTreeMap<String, i64> = BTreeMap::new();
        for logged_at in times {
            *buckets.entry(grouping.period_label(logged_at)).or_default() += 1;
        }

        Ok(buckets
            .into_iter()
            .map(|(period, count)| TrendPoint { period, count })
            .collect())
    }
}

fn window_start(days: i64, now: DateTime<Utc>) -> ReportingResult<DateTime<Utc>> {
    if !(1..=MAX_ACTIVITY_WINDOW_DAYS).contains(&days) {
        return Err(ReportingError::validation(
            "days",
            format!("days must be between 1 and {MAX_ACTIVITY_WINDOW_DAYS}"),
        ));
    }
    Ok(now - Duration::days(days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::activity_logs::ActivityLogEntity,
        repositories::activity_logs::MockActivityLogRepository,
        value_objects::activity_logs::ActivityCount,
    };
    use chrono::TimeZone;
    use mockall::predicate::eq;

    fn row(user_id: Uuid, kind: &str, status: &str, at: DateTime<Utc>) -> ActivityLogEntity {
        ActivityLogEntity {
            id: Uuid::new_v4(),
            user_id,
            logged_at: at,
            activity_type: kind.to_string(),
            details: "done".to_string(),
            village: Some("Capital".to_string()),
            status: status.to_string(),
        }
    }

    fn count(kind: &str, status: &str, count: i64) -> ActivityCount {
        ActivityCount {
            activity_type: kind.to_string(),
            status: status.to_string(),
            count,
        }
    }

    fn at(m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, m, d, 8, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn stats_count_by_type_and_status() {
        let user_id = Uuid::new_v4();
        let now = at(3, 31);

        let mut repo = MockActivityLogRepository::new();
        repo.expect_list_user_activity_times().never();
        repo.expect_count_user_activity_since()
            .with(eq(user_id), eq(now - Duration::days(30)))
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    count("auto-farm", "success", 1),
                    count("auto-farm", "error", 1),
                    count("login", "success", 1),
                    count("gold-club", "Info", 1),
                ])
            });

        let usecase = ActivityLogUseCase::new(Arc::new(repo), Reporting::default());
        let stats = usecase.stats(user_id, 30, now).await.unwrap();

        assert_eq!(stats.total, 4);
        assert_eq!(stats.by_type["auto-farm"], 2);
        assert_eq!(stats.by_type["other"], 1);
        assert_eq!(stats.by_status["success"], 2);
        assert_eq!(stats.by_status["info"], 1);
    }

    #[tokio::test]
    async fn trends_group_by_month_in_order() {
        let user_id = Uuid::new_v4();
        let mut repo = MockActivityLogRepository::new();
        repo.expect_list_user_activity_times()
            .with(eq(user_id), eq(at(3, 31) - Duration::days(90)), eq(50_000))
            .returning(|_, _, _| Ok(vec![at(3, 9), at(3, 2), at(1, 20)]));

        let usecase = ActivityLogUseCase::new(Arc::new(repo), Reporting::default());
        let trends = usecase
            .trends(user_id, 90, TrendGrouping::Month, at(3, 31))
            .await
            .unwrap();

        assert_eq!(
            trends,
            vec![
                TrendPoint {
                    period: "2025-01".to_string(),
                    count: 1
                },
                TrendPoint {
                    period: "2025-03".to_string(),
                    count: 2
                },
            ]
        );
    }

    #[tokio::test]
    async fn list_decorates_entries() {
        let user_id = Uuid::new_v4();
        let mut repo = MockActivityLogRepository::new();
        repo.expect_find_user_activity()
            .with(eq(user_id), eq(ActivityFilters::default()), eq(0), eq(10))
            .returning(move |user_id, _, _, _| {
                Ok((vec![row(user_id, "troop-training", "warning", at(2, 1))], 1))
            });

        let usecase = ActivityLogUseCase::new(Arc::new(repo), Reporting::default());
        let page = usecase
            .list(user_id, ActivityFilters::default(), 1, 10)
            .await
            .unwrap();

        assert_eq!(page.meta.total_pages, 1);
        assert_eq!(page.entries[0].label, ActivityType::TroopTraining.label());
        assert_eq!(page.entries[0].badge_class, "bg-warning");
    }

    #[tokio::test]
    async fn window_outside_bounds_is_rejected() {
        let usecase =
            ActivityLogUseCase::new(Arc::new(MockActivityLogRepository::new()), Reporting::default());

        let result = usecase.stats(Uuid::new_v4(), 0, at(1, 1)).await;
        assert!(matches!(result, Err(ReportingError::Validation { field: "days", .. })));
    }

    #[tokio::test]
    async fn stats_fold_unknown_types_and_status_spellings_across_groups() {
        let mut repo = MockActivityLogRepository::new();
        repo.expect_count_user_activity_since().returning(|_, _| {
            Ok(vec![
                count("gold-club", "success", 4_000),
                count("hero-adventure", "success", 6_000),
                count("login", "SUCCESS", 2),
                count("login", " success", 3),
            ])
        });

        let usecase = ActivityLogUseCase::new(Arc::new(repo), Reporting::default());
        let stats = usecase.stats(Uuid::new_v4(), 365, at(3, 31)).await.unwrap();

        assert_eq!(stats.total, 10_005);
        assert_eq!(stats.by_type["other"], 10_000);
        assert_eq!(stats.by_type["login"], 5);
        assert_eq!(stats.by_status["success"], 10_005);
        assert_eq!(stats.by_type.values().sum::<i64>(), stats.total);
    }

    #[tokio::test]
    async fn trends_ask_for_a_bounded_number_of_points() {
        let limits = Reporting {
            timeline_point_limit: 2,
            ..Reporting::default()
        };
        let mut repo = MockActivityLogRepository::new();
        repo.expect_list_user_activity_times()
            .withf(|_, _, limit| *limit == 2)
            .returning(|_, _, _| Ok(vec![at(3, 9), at(3, 8)]));

        let usecase = ActivityLogUseCase::new(Arc::new(repo), limits);
        let trends = usecase
            .trends(Uuid::new_v4(), 30, TrendGrouping::Day, at(3, 31))
            .await
            .unwrap();

        assert_eq!(trends.len(), 2);
        assert_eq!(trends.iter().map(|p| p.count).sum::<i64>(), 2);
    }

    #[tokio::test]
    async fn unaddressable_page_is_rejected_without_querying() {
        let mut repo = MockActivityLogRepository::new();
        repo.expect_find_user_activity().never();

        let usecase = ActivityLogUseCase::new(Arc::new(repo), Reporting::default());
        let result = usecase
            .list(Uuid::new_v4(), ActivityFilters::default(), i64::MAX, 20)
            .await;

        assert!(matches!(
            result,
            Err(ReportingError::Validation { field: "page", .. })
        ));
    }
}
