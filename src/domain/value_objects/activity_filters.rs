use crate::domain::value_objects::enums::{
    activity_statuses::ActivityStatus, activity_types::ActivityType,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFilters {
    pub activity_type: Option<ActivityType>,
    pub status: Option<ActivityStatus>,
}
