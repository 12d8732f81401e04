use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::{
    application::usecases::backups::BackupUseCase,
    domain::{
        errors::ReportingError,
        repositories::backups::BackupRepository,
        value_objects::{backups::BackupView, enums::backup_types::BackupType},
    },
    infrastructure::{
        axum_http::error_responses::AppError,
        postgres::{postgres_connection::PgPoolSquad, repositories::backups::BackupPostgres},
    },
};

#[derive(Debug, Default, Deserialize)]
pub struct BackupQuery {
    #[serde(rename = "type")]
    pub backup_type: Option<String>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let backup_repository = BackupPostgres::new(Arc::clone(&db_pool));
    router(Arc::new(BackupUseCase::new(Arc::new(backup_repository))))
}

pub fn router<B>(usecase: Arc<BackupUseCase<B>>) -> Router
where
    B: BackupRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list_backups::<B>))
        .with_state(usecase)
}

pub async fn list_backups<B>(
    State(usecase): State<Arc<BackupUseCase<B>>>,
    Query(query): Query<BackupQuery>,
) -> Result<Json<Vec<BackupView>>, AppError>
where
    B: BackupRepository + Send + Sync + 'static,
{
    let backup_type = match query.backup_type.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(BackupType::from_str(raw).ok_or_else(|| {
            ReportingError::validation("type", format!("unknown backup type `{raw}`"))
        })?),
    };

    Ok(Json(usecase.list(backup_type).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::backups::BackupEntity, repositories::backups::MockBackupRepository,
    };
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use chrono::Utc;
    use mockall::predicate::eq;
    use tower::ServiceExt;
    use uuid::Uuid;

    #[tokio::test]
    async fn lists_backups_of_one_type() {
        let mut repo = MockBackupRepository::new();
        repo.expect_list_backups()
            .with(eq(Some(BackupType::Users)))
            .returning(|_| {
                Ok(vec![BackupEntity {
                    id: Uuid::new_v4(),
                    filename: "users_20250101.json".to_string(),
                    backup_type: "users".to_string(),
                    size_bytes: 2048,
                    storage_location: None,
                    created_at: Utc::now(),
                }])
            });

        let response = router(Arc::new(BackupUseCase::new(Arc::new(repo))))
            .oneshot(
                Request::builder()
                    .uri("/?type=users")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json[0]["filename"], "users_20250101.json");
    }

    #[tokio::test]
    async fn unknown_type_is_bad_request() {
        let response = router(Arc::new(BackupUseCase::new(Arc::new(
            MockBackupRepository::new(),
        ))))
        .oneshot(
            Request::builder()
                .uri("/?type=media")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
