use axum::extract::FromRequest;

use crate::error::AppError;

/// `Json` body whose rejection renders as an `AppError` with a `detail` body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Form-encoded counterpart of [`AppJson`].
#[derive(FromRequest)]
#[from_request(via(axum::Form), rejection(AppError))]
pub struct AppForm<T>(pub T);
