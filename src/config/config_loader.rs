use std::str::FromStr;

use anyhow::{Context, Result};

use crate::config::{
    config_model::{Admin, Database, DotEnvyConfig, Reporting, Server},
    stage::Stage,
};

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 5;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: required("SERVER_PORT")?,
        body_limit: required("SERVER_BODY_LIMIT")?,
        timeout: required("SERVER_TIMEOUT")?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").context("DATABASE_URL is invalid")?,
        max_connections: optional("DATABASE_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
        connect_timeout: optional("DATABASE_CONNECT_TIMEOUT", DEFAULT_DB_CONNECT_TIMEOUT_SECS)?,
    };

    if database.max_connections == 0 || database.connect_timeout == 0 {
        anyhow::bail!("DATABASE_MAX_CONNECTIONS and DATABASE_CONNECT_TIMEOUT must be positive");
    }

    let admin = Admin {
        api_token: std::env::var("ADMIN_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty()),
    };

    let defaults = Reporting::default();
    let reporting = Reporting {
        default_page_size: optional("REPORTING_DEFAULT_PAGE_SIZE", defaults.default_page_size)?,
        max_page_size: optional("REPORTING_MAX_PAGE_SIZE", defaults.max_page_size)?,
        export_row_limit: optional("REPORTING_EXPORT_ROW_LIMIT", defaults.export_row_limit)?,
        timeline_point_limit: optional(
            "REPORTING_TIMELINE_POINT_LIMIT",
            defaults.timeline_point_limit,
        )?,
    };

    if reporting.default_page_size < 1 || reporting.default_page_size > reporting.max_page_size {
        anyhow::bail!(
            "REPORTING_DEFAULT_PAGE_SIZE must be between 1 and REPORTING_MAX_PAGE_SIZE ({})",
            reporting.max_page_size
        );
    }

    Ok(DotEnvyConfig {
        server,
        database,
        admin,
        reporting,
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or_default();
    Stage::try_from(&stage_str).unwrap_or_default()
}

fn required<T>(key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    std::env::var(key)
        .with_context(|| format!("{key} is invalid"))?
        .parse()
        .with_context(|| format!("{key} is invalid"))
}

fn optional<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} is invalid")),
        _ => Ok(default),
    }
}
