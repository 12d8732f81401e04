use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::{
    application::usecases::subscriptions::SubscriptionUseCase,
    config::config_model::Reporting,
    domain::{
        errors::{ReportingError, ReportingResult},
        repositories::{
            subscriptions::{PlanRepository, SubscriptionRepository},
            transactions::TransactionRepository,
        },
        value_objects::{
            enums::subscription_statuses::SubscriptionStatus,
            subscriptions::{
                PlanCard, SubscriptionPage, SubscriptionStats, SubscriptionSummary,
                SubscriptionViewModel,
            },
        },
    },
    infrastructure::{
        axum_http::{
            auth::AuthUser,
            error_responses::AppError,
            query_params::{PageQuery, non_empty},
        },
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                subscriptions::{PlanPostgres, SubscriptionPostgres},
                transactions::TransactionPostgres,
            },
        },
    },
};

type PostgresSubscriptionUseCase =
    SubscriptionUseCase<SubscriptionPostgres, PlanPostgres, TransactionPostgres>;

#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionListQuery {
    pub status: Option<String>,
}

impl SubscriptionListQuery {
    fn status(&self) -> ReportingResult<Option<SubscriptionStatus>> {
        match non_empty(self.status.as_deref()) {
            Some(raw) => Ok(Some(SubscriptionStatus::parse(raw).ok_or_else(|| {
                ReportingError::validation("status", format!("unknown subscription status `{raw}`"))
            })?)),
            None => Ok(None),
        }
    }
}

fn usecase(db_pool: Arc<PgPoolSquad>, reporting: Reporting) -> Arc<PostgresSubscriptionUseCase> {
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let plan_repository = PlanPostgres::new(Arc::clone(&db_pool));
    let transaction_repository = TransactionPostgres::new(Arc::clone(&db_pool));

    Arc::new(SubscriptionUseCase::new(
        Arc::new(subscription_repository),
        Arc::new(plan_repository),
        Arc::new(transaction_repository),
        reporting,
    ))
}

/// Routes for the signed-in user's own subscription.
pub fn routes(db_pool: Arc<PgPoolSquad>, reporting: Reporting) -> Router {
    user_router(usecase(db_pool, reporting))
}

pub fn admin_routes(db_pool: Arc<PgPoolSquad>, reporting: Reporting) -> Router {
    admin_router(usecase(db_pool, reporting))
}

pub fn user_router<S, P, T>(usecase: Arc<SubscriptionUseCase<S, P, T>>) -> Router
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    T: TransactionRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/current", get(current_subscription::<S, P, T>))
        .route("/plans", get(list_plans::<S, P, T>))
        .route("/summary", get(subscription_summary::<S, P, T>))
        .with_state(usecase)
}

pub fn admin_router<S, P, T>(usecase: Arc<SubscriptionUseCase<S, P, T>>) -> Router
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    T: TransactionRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list_subscriptions::<S, P, T>))
        .route("/stats", get(subscription_stats::<S, P, T>))
        .with_state(usecase)
}

pub async fn current_subscription<S, P, T>(
    State(usecase): State<Arc<SubscriptionUseCase<S, P, T>>>,
    AuthUser { user_id }: AuthUser,
) -> Result<Json<SubscriptionViewModel>, AppError>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    T: TransactionRepository + Send + Sync + 'static,
{
    info!(%user_id, "subscriptions: current subscription requested");
    Ok(Json(usecase.current(user_id, Utc::now()).await?))
}

pub async fn list_plans<S, P, T>(
    State(usecase): State<Arc<SubscriptionUseCase<S, P, T>>>,
    AuthUser { user_id }: AuthUser,
) -> Result<Json<Vec<PlanCard>>, AppError>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    T: TransactionRepository + Send + Sync + 'static,
{
    Ok(Json(usecase.plan_cards(user_id).await?))
}

pub async fn subscription_summary<S, P, T>(
    State(usecase): State<Arc<SubscriptionUseCase<S, P, T>>>,
    AuthUser { user_id }: AuthUser,
) -> Result<Json<SubscriptionSummary>, AppError>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    T: TransactionRepository + Send + Sync + 'static,
{
    Ok(Json(usecase.summary(user_id, Utc::now()).await?))
}

pub async fn list_subscriptions<S, P, T>(
    State(usecase): State<Arc<SubscriptionUseCase<S, P, T>>>,
    Query(filter): Query<SubscriptionListQuery>,
    Query(paging): Query<PageQuery>,
) -> Result<Json<SubscriptionPage>, AppError>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    T: TransactionRepository + Send + Sync + 'static,
{
    let status = filter.status()?;
    let (page, page_size) = paging.resolve(usecase.default_page_size())?;

    Ok(Json(usecase.list(status, page, page_size).await?))
}

pub async fn subscription_stats<S, P, T>(
    State(usecase): State<Arc<SubscriptionUseCase<S, P, T>>>,
) -> Result<Json<SubscriptionStats>, AppError>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    T: TransactionRepository + Send + Sync + 'static,
{
    Ok(Json(usecase.stats().await?))
}
