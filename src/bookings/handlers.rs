use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::BookRequest,
    repo_types::Booking,
    services::{book, list_for_user},
};
use crate::{
    auth::{dto::MessageResponse, AuthUser},
    error::AppResult,
    extract::AppJson,
    state::AppState,
};

pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/book", post(book_class))
        .route("/bookings", get(my_bookings))
}

#[instrument(skip(state, user), fields(user_id = user.id, class_id = payload.class_id))]
pub async fn book_class(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppJson(payload): AppJson<BookRequest>,
) -> AppResult<Json<MessageResponse>> {
    book(state.store.as_ref(), &user, payload.class_id).await?;
    Ok(Json(MessageResponse {
        message: "Class booked successfully",
    }))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn my_bookings(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<Vec<Booking>>> {
    Ok(Json(list_for_user(state.store.as_ref(), &user).await?))
}
