use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::transactions::TransactionEntity,
    value_objects::{
        time_windows::TimeWindow, transaction_filters::TransactionFilters,
        transactions::PeriodTotals,
    },
};

#[automock]
#[async_trait]
pub trait TransactionRepository {
    async fn find_transactions(
        &self,
        filters: TransactionFilters,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<TransactionEntity>, i64)>;
    async fn find_transaction(&self, id: Uuid) -> Result<Option<TransactionEntity>>;
    async fn list_transactions(
        &self,
        filters: TransactionFilters,
        limit: i64,
    ) -> Result<Vec<TransactionEntity>>;
    async fn count_transactions(&self, filters: TransactionFilters) -> Result<i64>;
    async fn count_by_status(&self) -> Result<Vec<(String, i64)>>;
    async fn list_user_transactions(&self, user_id: Uuid) -> Result<Vec<TransactionEntity>>;
    async fn period_totals(&self, window: TimeWindow) -> Result<PeriodTotals>;
}
