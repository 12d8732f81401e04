use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    application::usecases::activity_logs::ActivityLogUseCase,
    config::config_model::Reporting,
    domain::{
        errors::{ReportingError, ReportingResult},
        repositories::activity_logs::ActivityLogRepository,
        value_objects::{
            activity_filters::ActivityFilters,
            activity_logs::{ActivityPage, ActivityStats, TrendGrouping, TrendPoint},
            enums::{activity_statuses::ActivityStatus, activity_types::ActivityType},
        },
    },
    infrastructure::{
        axum_http::{
            auth::AuthUser,
            error_responses::AppError,
            query_params::{PageQuery, parse_number},
        },
        postgres::{
            postgres_connection::PgPoolSquad, repositories::activity_logs::ActivityLogPostgres,
        },
    },
};

pub const DEFAULT_ACTIVITY_DAYS: i64 = 30;

#[derive(Debug, Default, Deserialize)]
pub struct ActivityFilterQuery {
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    pub status: Option<String>,
}

impl ActivityFilterQuery {
    fn to_filters(&self) -> ReportingResult<ActivityFilters> {
        let status = match self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(ActivityStatus::from_str(raw).ok_or_else(|| {
                ReportingError::validation("status", format!("unknown activity status `{raw}`"))
            })?),
            None => None,
        };

        Ok(ActivityFilters {
            activity_type: self
                .activity_type
                .as_deref()
                .map(str::trim)
                .filter(|raw| !raw.is_empty())
                .map(ActivityType::from_str),
            status,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TrendQuery {
    pub days: Option<String>,
    pub group_by: Option<String>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>, reporting: Reporting) -> Router {
    let activity_repository = ActivityLogPostgres::new(Arc::clone(&db_pool));
    let usecase = ActivityLogUseCase::new(Arc::new(activity_repository), reporting);

    router(Arc::new(usecase))
}

pub fn router<A>(usecase: Arc<ActivityLogUseCase<A>>) -> Router
where
    A: ActivityLogRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list_activity::<A>))
        .route("/stats", get(activity_stats::<A>))
        .route("/trends", get(activity_trends::<A>))
        .with_state(usecase)
}

pub async fn list_activity<A>(
    State(usecase): State<Arc<ActivityLogUseCase<A>>>,
    AuthUser { user_id }: AuthUser,
    Query(filters): Query<ActivityFilterQuery>,
    Query(paging): Query<PageQuery>,
) -> Result<Json<ActivityPage>, AppError>
where
    A: ActivityLogRepository + Send + Sync + 'static,
{
    let filters = filters.to_filters()?;
    let (page, page_size) = paging.resolve(usecase.default_page_size())?;

    Ok(Json(usecase.list(user_id, filters, page, page_size).await?))
}

pub async fn activity_stats<A>(
    State(usecase): State<Arc<ActivityLogUseCase<A>>>,
    AuthUser { user_id }: AuthUser,
    Query(query): Query<TrendQuery>,
) -> Result<Json<ActivityStats>, AppError>
where
    A: ActivityLogRepository + Send + Sync + 'static,
{
    let days = parse_number("days", query.days.as_deref())?.unwrap_or(DEFAULT_ACTIVITY_DAYS);
    Ok(Json(usecase.stats(user_id, days, Utc::now()).await?))
}

pub async fn activity_trends<A>(
    State(usecase): State<Arc<ActivityLogUseCase<A>>>,
    AuthUser { user_id }: AuthUser,
    Query(query): Query<TrendQuery>,
) -> Result<Json<Vec<TrendPoint>>, AppError>
where
    A: ActivityLogRepository + Send + Sync + 'static,
{
    let days = parse_number("days", query.days.as_deref())?.unwrap_or(DEFAULT_ACTIVITY_DAYS);
    let grouping = match query.group_by.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => TrendGrouping::from_str(raw).ok_or_else(|| {
            ReportingError::validation("group_by", format!("unknown grouping `{raw}`"))
        })?,
        None => TrendGrouping::default(),
    };

    Ok(Json(
        usecase.trends(user_id, days, grouping, Utc::now()).await?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            entities::activity_logs::ActivityLogEntity,
            repositories::activity_logs::MockActivityLogRepository,
        },
        infrastructure::axum_http::auth::USER_ID_HEADER,
    };
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app(repo: MockActivityLogRepository) -> Router {
        router(Arc::new(ActivityLogUseCase::new(
            Arc::new(repo),
            Reporting::default(),
        )))
    }

    fn activity(user_id: Uuid, activity_type: &str) -> ActivityLogEntity {
        ActivityLogEntity {
            id: Uuid::new_v4(),
            user_id,
            logged_at: Utc::now(),
            activity_type: activity_type.to_string(),
            details: "ran".to_string(),
            village: None,
            status: "success".to_string(),
        }
    }

    #[tokio::test]
    async fn feed_is_scoped_to_the_caller() {
        let user_id = Uuid::new_v4();
        let mut repo = MockActivityLogRepository::new();
        repo.expect_find_user_activity()
            .withf(move |id, filters, _, _| {
                *id == user_id && filters.activity_type == Some(ActivityType::AutoFarm)
            })
            .returning(move |_, _, _, _| Ok((vec![activity(user_id, "auto-farm")], 1)));

        let response = app(repo)
            .oneshot(
                Request::builder()
                    .uri("/?type=auto-farm")
                    .header(USER_ID_HEADER, user_id.to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["total"], 1);
    }

    #[tokio::test]
    async fn unknown_grouping_is_bad_request() {
        let response = app(MockActivityLogRepository::new())
            .oneshot(
                Request::builder()
                    .uri("/trends?group_by=year")
                    .header(USER_ID_HEADER, Uuid::new_v4().to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
