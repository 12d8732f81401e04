use crate::domain::value_objects::pagination::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
    pub admin: Admin,
    pub reporting: Reporting,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    /// MiB
    pub body_limit: u64,
    /// seconds
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection before failing the request.
    pub connect_timeout: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Admin {
    /// Admin routes answer 503 while this is unset.
    pub api_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reporting {
    pub default_page_size: i64,
    pub max_page_size: i64,
    pub export_row_limit: i64,
    pub timeline_point_limit: i64,
}

impl Default for Reporting {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: 100,
            export_row_limit: 10_000,
            timeline_point_limit: 50_000,
        }
    }
}
