use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    response::Response,
    routing::get,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::{
    application::usecases::{log_query::LogQueryUseCase, transactions::TransactionUseCase},
    config::config_model::Reporting,
    domain::{
        errors::ReportingError,
        repositories::{
            system_logs::SystemLogRepository, transactions::TransactionRepository,
        },
        value_objects::enums::report_types::ReportType,
    },
    infrastructure::{
        axum_http::{
            attachments::attachment,
            error_responses::AppError,
            query_params::{RangeQuery, parse_report_format},
        },
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{system_logs::SystemLogPostgres, transactions::TransactionPostgres},
        },
    },
};

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub report_type: Option<String>,
    pub format: Option<String>,
}

pub struct ReportSources<R, T>
where
    R: SystemLogRepository + Send + Sync + 'static,
    T: TransactionRepository + Send + Sync + 'static,
{
    pub logs: LogQueryUseCase<R>,
    pub transactions: TransactionUseCase<T>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>, reporting: Reporting) -> Router {
    let system_log_repository = SystemLogPostgres::new(Arc::clone(&db_pool));
    let transaction_repository = TransactionPostgres::new(Arc::clone(&db_pool));

    router(Arc::new(ReportSources {
        logs: LogQueryUseCase::new(Arc::new(system_log_repository), reporting),
        transactions: TransactionUseCase::new(Arc::new(transaction_repository), reporting),
    }))
}

pub fn router<R, T>(sources: Arc<ReportSources<R, T>>) -> Router
where
    R: SystemLogRepository + Send + Sync + 'static,
    T: TransactionRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(generate_report::<R, T>))
        .with_state(sources)
}

pub async fn generate_report<R, T>(
    State(sources): State<Arc<ReportSources<R, T>>>,
    Query(query): Query<ReportQuery>,
    Query(range): Query<RangeQuery>,
) -> Result<Response, AppError>
where
    R: SystemLogRepository + Send + Sync + 'static,
    T: TransactionRepository + Send + Sync + 'static,
{
    let raw_type = query.report_type.as_deref().unwrap_or_default();
    let report_type = ReportType::from_str(raw_type).ok_or_else(|| {
        ReportingError::validation("report_type", format!("unknown report type `{raw_type}`"))
    })?;
    let format = parse_report_format(query.format.as_deref())?;
    let range = range.to_range()?;

    info!(%report_type, %format, range = %range.preset, "reports: generating report");

    let now = Utc::now();
    let payload = match report_type {
        ReportType::Logs => sources.logs.report(range, format, now).await?,
        ReportType::Transactions => sources.transactions.report(range, format, now).await?,
    };

    Ok(attachment(payload))
}
