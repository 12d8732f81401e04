pub mod activity_statuses;
pub mod activity_types;
pub mod backup_types;
pub mod billing_periods;
pub mod date_range_presets;
pub mod export_formats;
pub mod log_levels;
pub mod payment_methods;
pub mod report_types;
pub mod subscription_statuses;
pub mod transaction_statuses;
