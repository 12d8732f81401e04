use uuid::Uuid;

use crate::domain::value_objects::{
    enums::transaction_statuses::TransactionStatus, time_windows::TimeWindow,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilters {
    pub status: Option<TransactionStatus>,
    pub user_id: Option<Uuid>,
    pub window: TimeWindow,
}
