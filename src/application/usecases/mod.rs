pub mod activity_logs;
pub mod backups;
pub mod export_formatter;
pub mod log_query;
pub mod subscription_projector;
pub mod subscriptions;
pub mod transactions;
