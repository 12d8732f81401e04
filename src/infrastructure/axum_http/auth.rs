use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;
use uuid::Uuid;

use crate::{config::config_model::Admin, infrastructure::axum_http::error_responses::AppError};

/// Set by the upstream session layer once the caller is authenticated.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let user_id = Uuid::parse_str(raw.trim()).map_err(|_| AppError::Unauthorized)?;

        Ok(AuthUser { user_id })
    }
}

pub async fn require_admin(
    State(admin): State<Arc<Admin>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected_token) = admin.api_token.as_deref() else {
        warn!("auth: ADMIN_API_TOKEN is not set, rejecting admin request");
        return AppError::AdminDisabled.into_response();
    };

    if authorize_bearer(request.headers(), expected_token).is_err() {
        return AppError::Unauthorized.into_response();
    }

    next.run(request).await
}

fn authorize_bearer(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized)?;

    if token == expected_token {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}
