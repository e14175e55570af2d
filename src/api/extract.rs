use crate::types::AppError;
use axum::extract::FromRequest;

/// `axum::Json` whose rejection is an [`AppError`], so malformed bodies get
/// the same `{success: false, detail}` shape as every other failure.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
