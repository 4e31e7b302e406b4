use tracing::{info, warn};

use super::repo_types::Booking;
use crate::{
    auth::repo_types::User,
    error::{AppError, AppResult},
    store::Store,
};

/// Reserve one slot. Not idempotent: each call that finds capacity books again.
pub async fn book(store: &dyn Store, user: &User, class_id: i64) -> AppResult<Booking> {
    match store.book_slot(user.id, class_id).await {
        Ok(booking) => {
            info!(booking_id = booking.id, user_id = user.id, class_id, "class booked");
            Ok(booking)
        }
        Err(e @ (AppError::ClassNotFound | AppError::NoSlotsAvailable)) => {
            warn!(user_id = user.id, class_id, reason = %e, "booking refused");
            Err(e)
        }
        Err(e) => Err(e),
    }
}

pub async fn list_for_user(store: &dyn Store, user: &User) -> AppResult<Vec<Booking>> {
    store.list_bookings_for_user(user.id).await
}
