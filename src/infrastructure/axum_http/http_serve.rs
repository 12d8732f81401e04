use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Result;
use axum::{Router, http::Method, middleware, routing::get};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    config::config_model::DotEnvyConfig,
    infrastructure::{
        axum_http::{auth::require_admin, default_routers, routers},
        postgres::postgres_connection::PgPoolSquad,
    },
};

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    let reporting = config.reporting;

    if config.admin.api_token.is_none() {
        warn!("http: ADMIN_API_TOKEN is not set, admin routes will answer 503");
    }

    let admin = Router::new()
        .nest(
            "/logs",
            routers::system_logs::routes(Arc::clone(&db_pool), reporting),
        )
        .nest(
            "/transactions",
            routers::transactions::routes(Arc::clone(&db_pool), reporting),
        )
        .nest(
            "/subscriptions",
            routers::subscriptions::admin_routes(Arc::clone(&db_pool), reporting),
        )
        .nest("/backups", routers::backups::routes(Arc::clone(&db_pool)))
        .nest(
            "/reports",
            routers::reports::routes(Arc::clone(&db_pool), reporting),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::new(config.admin.clone()),
            require_admin,
        ));

    let app = Router::new()
        .fallback(default_routers::not_found)
        .nest("/api/v1/admin", admin)
        .nest(
            "/api/v1/subscriptions",
            routers::subscriptions::routes(Arc::clone(&db_pool), reporting),
        )
        .nest(
            "/api/v1/transactions",
            routers::transactions::user_routes(Arc::clone(&db_pool), reporting),
        )
        .nest(
            "/api/v1/activity",
            routers::activity_logs::routes(Arc::clone(&db_pool), reporting),
        )
        .route("/api/v1/health-check", get(default_routers::health_check))
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.timeout)))
        .layer(RequestBodyLimitLayer::new(
            (config.server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "http: failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "http: failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
