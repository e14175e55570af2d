use crate::{
    api::extract::AppJson,
    auth::middleware::AuthAdmin,
    types::{
        ApiResponse, AppError, ContactMessage, ContactMessageCreate, NotificationKind, Result,
    },
    AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Message '{}' not found", id))
}

/// Public contact form; every submission also raises a notification
pub async fn submit_contact(
    State(state): State<AppState>,
    AppJson(input): AppJson<ContactMessageCreate>,
) -> Result<Json<ApiResponse<()>>> {
    input.validate()?;

    let message = state.store.create_message(input).await?;
    state
        .store
        .create_notification(
            NotificationKind::NewMessage,
            format!("New message from {}", message.name),
        )
        .await?;
    tracing::info!(id = %message.id, "contact message received");

    Ok(Json(
        ApiResponse::done("Message sent successfully!").with_id(message.id),
    ))
}

pub async fn list_messages(
    State(state): State<AppState>,
    AuthAdmin(_claims): AuthAdmin,
) -> Result<Json<ApiResponse<Vec<ContactMessage>>>> {
    Ok(Json(ApiResponse::list(state.store.list_messages().await?)))
}

pub async fn mark_message_read(
    State(state): State<AppState>,
    AuthAdmin(_claims): AuthAdmin,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    if !state.store.mark_message_read(&id).await? {
        return Err(not_found(&id));
    }

    Ok(Json(ApiResponse::done("Message marked as read")))
}

pub async fn delete_message(
    State(state): State<AppState>,
    AuthAdmin(claims): AuthAdmin,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    if !state.store.delete_message(&id).await? {
        return Err(not_found(&id));
    }
    tracing::info!(admin = %claims.sub, %id, "message deleted");

    Ok(Json(ApiResponse::done("Message deleted successfully")))
}
