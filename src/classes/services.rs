use time::{
    format_description::well_known::{Iso8601, Rfc3339},
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
};
use tracing::info;

use super::{
    dto::CreateClassRequest,
    repo_types::{FitnessClass, NewClass},
};
use crate::{
    auth::repo_types::User,
    error::{AppError, AppResult},
    store::Store,
};

/// Parse an ISO-8601 timestamp and express it in `zone`.
/// A timestamp without an offset is taken as wall-clock time in `zone`,
/// and a bare date as midnight there.
pub fn normalize_class_time(raw: &str, zone: UtcOffset) -> AppResult<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(t) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(t.to_offset(zone));
    }
    if let Ok(t) = OffsetDateTime::parse(raw, &Iso8601::DEFAULT) {
        return Ok(t.to_offset(zone));
    }
    if let Ok(local) = PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT) {
        return Ok(local.assume_offset(zone));
    }
    Date::parse(raw, &Iso8601::DEFAULT)
        .map(|day| day.midnight().assume_offset(zone))
        .map_err(|_| AppError::Validation(format!("invalid dateTime {raw:?}")))
}

pub async fn create_class(
    store: &dyn Store,
    zone: UtcOffset,
    creator: &User,
    req: CreateClassRequest,
) -> AppResult<FitnessClass> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".into()));
    }
    if req.instructor.trim().is_empty() {
        return Err(AppError::Validation("instructor must not be empty".into()));
    }
    if req.available_slots < 0 {
        return Err(AppError::Validation(
            "availableSlots must not be negative".into(),
        ));
    }
    let date_time = normalize_class_time(&req.date_time, zone)?;

    let class = store
        .insert_class(NewClass {
            name: req.name,
            date_time,
            instructor: req.instructor,
            available_slots: req.available_slots,
        })
        .await?;
    info!(
        class_id = class.id,
        created_by = creator.id,
        slots = class.available_slots,
        "class created"
    );
    Ok(class)
}
