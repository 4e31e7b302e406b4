use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginForm, MessageResponse, SignupRequest, TokenResponse},
        services::{authenticate, register},
    },
    error::AppResult,
    extract::{AppForm, AppJson},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn signup(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SignupRequest>,
) -> AppResult<Json<MessageResponse>> {
    register(
        state.store.as_ref(),
        &payload.name,
        &payload.email,
        &payload.password,
    )
    .await?;
    Ok(Json(MessageResponse {
        message: "User registered successfully",
    }))
}

#[instrument(skip(state, form), fields(email = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    AppForm(form): AppForm<LoginForm>,
) -> AppResult<Json<TokenResponse>> {
    let user = authenticate(state.store.as_ref(), &form.username, &form.password).await?;
    let token = state.jwt.issue(&user)?;
    Ok(Json(TokenResponse::bearer(token)))
}
