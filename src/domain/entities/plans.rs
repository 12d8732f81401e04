use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    domain::value_objects::plans::PlanFeatures, infrastructure::postgres::schema::plans,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PlanEntity {
    pub id: Uuid,
    pub name: String,
    pub monthly_price_minor: i64,
    pub yearly_price_minor: i64,
    pub features: PlanFeatures,
    pub is_active: bool,
}

/// Raw row used for Diesel queries. Features stay as JSON and are parsed into PlanFeatures.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = plans)]
pub struct PlanRow {
    pub id: Uuid,
    pub name: String,
    pub monthly_price_minor: i64,
    pub yearly_price_minor: i64,
    pub features: serde_json::Value,
    pub is_active: bool,
}

impl From<PlanRow> for PlanEntity {
    fn from(value: PlanRow) -> Self {
        let features = serde_json::from_value(value.features).unwrap_or_default();

        Self {
            id: value.id,
            name: value.name,
            monthly_price_minor: value.monthly_price_minor,
            yearly_price_minor: value.yearly_price_minor,
            features,
            is_active: value.is_active,
        }
    }
}
