mod dto;
pub mod handlers;
pub mod repo_types;
pub mod services;

pub use dto::CreateClassRequest;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::class_routes())
}
