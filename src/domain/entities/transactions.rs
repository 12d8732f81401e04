use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::transactions;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = transactions)]
pub struct TransactionEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub plan_name: String,
    pub amount_minor: i64,
    pub billing_period: String,
    pub payment_method: String,
    pub payment_id: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
