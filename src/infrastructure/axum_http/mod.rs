pub mod attachments;
pub mod auth;
pub mod default_routers;
pub mod error_responses;
pub mod http_serve;
pub mod query_params;
pub mod routers;
