use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::{dto::CreateClassRequest, repo_types::FitnessClass, services::create_class};
use crate::{auth::AuthUser, error::AppResult, extract::AppJson, state::AppState};

pub fn class_routes() -> Router<AppState> {
    Router::new().route("/classes", get(list_classes).post(create))
}

#[instrument(skip(state, user, payload), fields(user_id = user.id))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppJson(payload): AppJson<CreateClassRequest>,
) -> AppResult<Json<FitnessClass>> {
    let class = create_class(
        state.store.as_ref(),
        state.config.class_offset,
        &user,
        payload,
    )
    .await?;
    Ok(Json(class))
}

#[instrument(skip(state))]
pub async fn list_classes(State(state): State<AppState>) -> AppResult<Json<Vec<FitnessClass>>> {
    Ok(Json(state.store.list_classes().await?))
}
