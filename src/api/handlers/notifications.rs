use crate::{
    auth::middleware::AuthAdmin,
    types::{ApiResponse, AppError, Notification, Result},
    AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};

/// Newest first
pub async fn list_notifications(
    State(state): State<AppState>,
    AuthAdmin(_claims): AuthAdmin,
) -> Result<Json<ApiResponse<Vec<Notification>>>> {
    Ok(Json(ApiResponse::list(
        state.store.list_notifications().await?,
    )))
}

pub async fn mark_notification_read(
    State(state): State<AppState>,
    AuthAdmin(_claims): AuthAdmin,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    if !state.store.mark_notification_read(&id).await? {
        return Err(AppError::NotFound(format!(
            "Notification '{}' not found",
            id
        )));
    }

    Ok(Json(ApiResponse::done("Notification marked as read")))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    AuthAdmin(_claims): AuthAdmin,
) -> Result<Json<ApiResponse<()>>> {
    let updated = state.store.mark_all_notifications_read().await?;

    Ok(Json(ApiResponse::done(format!(
        "{} notifications marked as read",
        updated
    ))))
}

pub async fn clear_notifications(
    State(state): State<AppState>,
    AuthAdmin(claims): AuthAdmin,
) -> Result<Json<ApiResponse<()>>> {
    let removed = state.store.clear_notifications().await?;
    tracing::info!(admin = %claims.sub, removed, "notifications cleared");

    Ok(Json(ApiResponse::done("Notifications cleared")))
}
