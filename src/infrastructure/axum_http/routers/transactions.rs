use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::PathRejection},
    response::Response,
    routing::get,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::{
    application::usecases::transactions::TransactionUseCase,
    config::config_model::Reporting,
    domain::{
        repositories::transactions::TransactionRepository,
        value_objects::transactions::{TransactionPage, TransactionStats, TransactionView},
    },
    infrastructure::{
        axum_http::{
            attachments::attachment,
            auth::AuthUser,
            error_responses::AppError,
            query_params::{
                FormatQuery, PageQuery, TransactionFilterQuery, parse_log_export_format,
            },
        },
        postgres::{
            postgres_connection::PgPoolSquad, repositories::transactions::TransactionPostgres,
        },
    },
};

fn usecase(
    db_pool: Arc<PgPoolSquad>,
    reporting: Reporting,
) -> Arc<TransactionUseCase<TransactionPostgres>> {
    let transaction_repository = TransactionPostgres::new(Arc::clone(&db_pool));
    Arc::new(TransactionUseCase::new(
        Arc::new(transaction_repository),
        reporting,
    ))
}

pub fn routes(db_pool: Arc<PgPoolSquad>, reporting: Reporting) -> Router {
    router(usecase(db_pool, reporting))
}

/// Routes for the signed-in user's own payment history.
pub fn user_routes(db_pool: Arc<PgPoolSquad>, reporting: Reporting) -> Router {
    user_router(usecase(db_pool, reporting))
}

pub fn router<T>(usecase: Arc<TransactionUseCase<T>>) -> Router
where
    T: TransactionRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list_transactions::<T>))
        .route("/stats", get(transaction_stats::<T>))
        .route("/export", get(export_transactions::<T>))
        .route("/:id", get(transaction_detail::<T>))
        .with_state(usecase)
}

pub fn user_router<T>(usecase: Arc<TransactionUseCase<T>>) -> Router
where
    T: TransactionRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(transaction_history::<T>))
        .route("/:id", get(own_transaction_detail::<T>))
        .with_state(usecase)
}

pub async fn list_transactions<T>(
    State(usecase): State<Arc<TransactionUseCase<T>>>,
    Query(filters): Query<TransactionFilterQuery>,
    Query(paging): Query<PageQuery>,
) -> Result<Json<TransactionPage>, AppError>
where
    T: TransactionRepository + Send + Sync + 'static,
{
    let filters = filters.to_filters()?;
    let (page, page_size) = paging.resolve(usecase.default_page_size())?;

    Ok(Json(usecase.list(filters, page, page_size).await?))
}

pub async fn transaction_detail<T>(
    State(usecase): State<Arc<TransactionUseCase<T>>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<TransactionView>, AppError>
where
    T: TransactionRepository + Send + Sync + 'static,
{
    let Path(id) = id?;
    Ok(Json(usecase.detail(id).await?))
}

pub async fn transaction_history<T>(
    State(usecase): State<Arc<TransactionUseCase<T>>>,
    AuthUser { user_id }: AuthUser,
    Query(filters): Query<TransactionFilterQuery>,
    Query(paging): Query<PageQuery>,
) -> Result<Json<TransactionPage>, AppError>
where
    T: TransactionRepository + Send + Sync + 'static,
{
    let filters = filters.to_filters()?;
    let (page, page_size) = paging.resolve(usecase.default_page_size())?;

    info!(%user_id, page, "transactions: history requested");
    Ok(Json(
        usecase
            .user_history(user_id, filters, page, page_size)
            .await?,
    ))
}

pub async fn own_transaction_detail<T>(
    State(usecase): State<Arc<TransactionUseCase<T>>>,
    AuthUser { user_id }: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<TransactionView>, AppError>
where
    T: TransactionRepository + Send + Sync + 'static,
{
    let Path(id) = id?;
    Ok(Json(usecase.user_detail(user_id, id).await?))
}

pub async fn transaction_stats<T>(
    State(usecase): State<Arc<TransactionUseCase<T>>>,
) -> Result<Json<TransactionStats>, AppError>
where
    T: TransactionRepository + Send + Sync + 'static,
{
    Ok(Json(usecase.stats(Utc::now()).await?))
}

pub async fn export_transactions<T>(
    State(usecase): State<Arc<TransactionUseCase<T>>>,
    Query(filters): Query<TransactionFilterQuery>,
    Query(format): Query<FormatQuery>,
) -> Result<Response, AppError>
where
    T: TransactionRepository + Send + Sync + 'static,
{
    let filters = filters.to_filters()?;
    let format = parse_log_export_format(format.format.as_deref())?;

    let payload = usecase.export(filters, format, Utc::now()).await?;
    Ok(attachment(payload))
}
