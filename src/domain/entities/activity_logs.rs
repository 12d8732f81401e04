use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::activity_logs;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = activity_logs)]
pub struct ActivityLogEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub logged_at: DateTime<Utc>,
    pub activity_type: String,
    pub details: String,
    pub village: Option<String>,
    pub status: String,
}
