pub mod activity_logs;
pub mod backups;
pub mod reports;
pub mod subscriptions;
pub mod system_logs;
pub mod transactions;
