use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One reserved slot. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    pub class_id: i64,
}
