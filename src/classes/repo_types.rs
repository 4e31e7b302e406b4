use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{OffsetDateTime, UtcOffset};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FitnessClass {
    pub id: i64,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date_time: OffsetDateTime,
    pub instructor: String,
    pub available_slots: i32,
}

impl FitnessClass {
    /// Re-express the stored instant in the catalog's fixed zone.
    pub fn in_offset(mut self, offset: UtcOffset) -> Self {
        self.date_time = self.date_time.to_offset(offset);
        self
    }
}

#[derive(Debug, Clone)]
pub struct NewClass {
    pub name: String,
    pub date_time: OffsetDateTime,
    pub instructor: String,
    pub available_slots: i32,
}
