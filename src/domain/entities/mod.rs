pub mod activity_logs;
pub mod backups;
pub mod plans;
pub mod subscriptions;
pub mod system_logs;
pub mod transactions;
