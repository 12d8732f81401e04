use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::Response,
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    application::usecases::log_query::LogQueryUseCase,
    config::config_model::Reporting,
    domain::{
        repositories::system_logs::SystemLogRepository,
        value_objects::{
            system_logs::{LogEntryView, LogListView, LogStats, PurgeOutcome},
            timeline::TimelineChart,
        },
    },
    infrastructure::{
        axum_http::{
            attachments::attachment,
            error_responses::AppError,
            query_params::{
                FormatQuery, LogFilterQuery, PageQuery, RangeQuery, TimelineQuery,
                parse_log_export_format,
            },
        },
        postgres::{
            postgres_connection::PgPoolSquad, repositories::system_logs::SystemLogPostgres,
        },
    },
};

#[derive(Debug, Deserialize)]
pub struct PurgeRequest {
    pub days: i64,
}

pub fn routes(db_pool: Arc<PgPoolSquad>, reporting: Reporting) -> Router {
    let system_log_repository = SystemLogPostgres::new(Arc::clone(&db_pool));
    let usecase = LogQueryUseCase::new(Arc::new(system_log_repository), reporting);

    router(Arc::new(usecase))
}

pub fn router<R>(usecase: Arc<LogQueryUseCase<R>>) -> Router
where
    R: SystemLogRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list_logs::<R>))
        .route("/stats", get(log_stats::<R>))
        .route("/timeline", get(log_timeline::<R>))
        .route("/export", get(export_logs::<R>))
        .route("/purge", post(purge_logs::<R>))
        .route("/:id", get(log_detail::<R>))
        .with_state(usecase)
}

pub async fn list_logs<R>(
    State(usecase): State<Arc<LogQueryUseCase<R>>>,
    Query(filters): Query<LogFilterQuery>,
    Query(paging): Query<PageQuery>,
    Query(timeline): Query<TimelineQuery>,
) -> Result<Json<LogListView>, AppError>
where
    R: SystemLogRepository + Send + Sync + 'static,
{
    let filters = filters.to_filters()?;
    let (page, page_size) = paging.resolve(usecase.default_page_size())?;
    let bucketing = timeline.bucketing()?;

    let view = usecase
        .list_view(filters, page, page_size, bucketing, Utc::now())
        .await?;

    Ok(Json(view))
}

pub async fn log_detail<R>(
    State(usecase): State<Arc<LogQueryUseCase<R>>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<LogEntryView>, AppError>
where
    R: SystemLogRepository + Send + Sync + 'static,
{
    let Path(id) = id?;
    Ok(Json(usecase.detail(id).await?))
}

pub async fn log_stats<R>(
    State(usecase): State<Arc<LogQueryUseCase<R>>>,
    Query(filters): Query<LogFilterQuery>,
) -> Result<Json<LogStats>, AppError>
where
    R: SystemLogRepository + Send + Sync + 'static,
{
    let stats = usecase.aggregate_stats(filters.to_filters()?).await?;
    Ok(Json(stats))
}

pub async fn log_timeline<R>(
    State(usecase): State<Arc<LogQueryUseCase<R>>>,
    Query(filters): Query<LogFilterQuery>,
    Query(timeline): Query<TimelineQuery>,
) -> Result<Json<TimelineChart>, AppError>
where
    R: SystemLogRepository + Send + Sync + 'static,
{
    let filters = filters.to_filters()?;
    let bucketing = timeline.bucketing()?;

    Ok(Json(
        usecase
            .timeline_series(filters, bucketing, Utc::now())
            .await,
    ))
}

pub async fn export_logs<R>(
    State(usecase): State<Arc<LogQueryUseCase<R>>>,
    Query(filters): Query<LogFilterQuery>,
    Query(range): Query<RangeQuery>,
    Query(format): Query<FormatQuery>,
) -> Result<Response, AppError>
where
    R: SystemLogRepository + Send + Sync + 'static,
{
    let filters = filters.to_filters()?;
    let range = range.to_range()?;
    let format = parse_log_export_format(format.format.as_deref())?;

    let payload = usecase
        .export_formatted(filters, range, format, Utc::now())
        .await?;

    Ok(attachment(payload))
}

pub async fn purge_logs<R>(
    State(usecase): State<Arc<LogQueryUseCase<R>>>,
    request: Result<Json<PurgeRequest>, JsonRejection>,
) -> Result<Json<PurgeOutcome>, AppError>
where
    R: SystemLogRepository + Send + Sync + 'static,
{
    let Json(request) = request?;
    info!(days = request.days, "system_logs: purge requested");
    let outcome = usecase.purge_older_than(request.days, Utc::now()).await?;
    Ok(Json(outcome))
}
