pub mod activity_filters;
pub mod activity_logs;
pub mod backups;
pub mod date_ranges;
pub mod enums;
pub mod exports;
pub mod log_filters;
pub mod pagination;
pub mod plans;
pub mod subscriptions;
pub mod system_logs;
pub mod time_windows;
pub mod timeline;
pub mod transaction_filters;
pub mod transactions;
